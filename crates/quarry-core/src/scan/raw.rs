use super::assign_row;
use crate::{
    handler::Codec,
    schema::{parse_fields, FieldMetadata, Fields},
    stmt::{Rows, Value},
    Error, FieldType, Result,
};

use indexmap::IndexMap;

/// Scans rows without registered metadata.
///
/// Result columns are matched to fields ignoring ASCII case: first against
/// explicit `column:` names, then serde names, then Rust field names.
/// Columns that match nothing are discarded and fields that match no column
/// keep their default value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawScanner;

impl RawScanner {
    /// Scans the first row into a `T`.
    pub fn scan_struct<T: Fields + Default>(rows: Rows) -> Result<T> {
        let fields = parse_fields(T::fields()).fields;
        let plan = plan(&fields, rows.columns());
        let row = rows.into_first().ok_or_else(no_rows)?;

        let mut dst = T::default();
        assign_row(&fields, &plan, row, &mut dst)?;
        Ok(dst)
    }

    /// Scans every row into a `T`.
    pub fn scan_slice<T: Fields + Default>(rows: Rows) -> Result<Vec<T>> {
        let fields = parse_fields(T::fields()).fields;
        let plan = plan(&fields, rows.columns());

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut dst = T::default();
            assign_row(&fields, &plan, row, &mut dst)?;
            out.push(dst);
        }
        Ok(out)
    }

    /// Returns the first row keyed by column name, in result order.
    pub fn scan_map(rows: Rows) -> Result<IndexMap<String, Value>> {
        let row = rows.into_first().ok_or_else(no_rows)?;
        let columns = row.columns().to_vec();
        Ok(columns.into_iter().zip(row.into_values()).collect())
    }

    /// Reads the first column of the first row.
    pub fn scan_value<T: FieldType>(rows: Rows) -> Result<T> {
        let codec = first_column_codec::<T>(&rows)?;
        let mut row = rows.into_first().ok_or_else(no_rows)?;

        let mut dst = T::default();
        codec.scan_target(&mut dst).assign(row.take(0))?;
        Ok(dst)
    }

    /// Reads the first column of every row.
    pub fn scan_values<T: FieldType>(rows: Rows) -> Result<Vec<T>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let codec = first_column_codec::<T>(&rows)?;
        let mut out = Vec::with_capacity(rows.len());
        for mut row in rows {
            let mut dst = T::default();
            codec.scan_target(&mut dst).assign(row.take(0))?;
            out.push(dst);
        }
        Ok(out)
    }
}

fn no_rows() -> Error {
    Error::record_not_found("")
}

fn first_column_codec<T: FieldType>(rows: &Rows) -> Result<Codec> {
    let column = rows
        .columns()
        .first()
        .ok_or_else(|| crate::err!("query returned no columns"))?;
    Ok(Codec::resolve(T::type_info(), column.as_str()))
}

fn plan(fields: &[FieldMetadata], columns: &[String]) -> Vec<Option<usize>> {
    columns
        .iter()
        .map(|column| find_field(fields, column))
        .collect()
}

fn find_field(fields: &[FieldMetadata], column: &str) -> Option<usize> {
    let by = |name: fn(&FieldMetadata) -> Option<&str>| {
        fields
            .iter()
            .position(|field| name(field).is_some_and(|name| name.eq_ignore_ascii_case(column)))
    };

    by(|field| field.explicit_column.then_some(field.column.as_str()))
        .or_else(|| by(|field| field.json_name))
        .or_else(|| by(|field| Some(field.name)))
}
