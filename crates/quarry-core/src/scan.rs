//! Turning result rows into structs.
//!
//! [`Scanner`] is driven by registered model metadata. [`RawScanner`] needs
//! nothing but a [`Fields`](crate::Fields) implementation and matches columns
//! by name, for ad hoc queries and types that were never registered.

mod raw;
pub use raw::RawScanner;

use crate::{
    schema::{FieldMetadata, Model, ModelMetadata},
    stmt::{Row, Rows},
    Error, Result,
};

use std::any::Any;

/// Scans rows into a registered model.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    metadata: &'a ModelMetadata,
    strict: bool,
}

impl<'a> Scanner<'a> {
    /// A strict scanner: every mapped field must be present in the result.
    pub fn new(metadata: &'a ModelMetadata) -> Self {
        Scanner {
            metadata,
            strict: true,
        }
    }

    /// Allows results that project a subset of the mapped columns. Fields
    /// whose column is absent keep their default value.
    pub fn lenient(self) -> Self {
        Scanner {
            strict: false,
            ..self
        }
    }

    /// Maps each result column to the field it fills, if any.
    ///
    /// Columns the model does not map are discarded.
    pub fn plan(&self, columns: &[String]) -> Result<Vec<Option<usize>>> {
        let plan: Vec<Option<usize>> = columns
            .iter()
            .map(|column| self.field_index(column))
            .collect();

        if self.strict {
            if let Some(missing) = self
                .metadata
                .fields
                .iter()
                .enumerate()
                .find(|(i, _)| !plan.contains(&Some(*i)))
            {
                return Err(Error::missing_column(
                    &self.metadata.table,
                    &missing.1.column,
                ));
            }
        }

        Ok(plan)
    }

    /// Scans one row into `dst`.
    pub fn scan_row<T: Model>(&self, row: &Row, dst: &mut T) -> Result<()> {
        let plan = self.plan(row.columns())?;
        self.apply(&plan, row.clone(), dst)
    }

    /// Scans the first row, or fails with [`Error::record_not_found`] when
    /// there is none.
    pub fn scan_one<T: Model>(&self, rows: Rows) -> Result<T> {
        let plan = self.plan(rows.columns())?;
        let row = rows
            .into_first()
            .ok_or_else(|| Error::record_not_found(format!("table={}", self.metadata.table)))?;

        let mut model = T::default();
        self.apply(&plan, row, &mut model)?;
        Ok(model)
    }

    /// Scans every row. An empty result yields an empty vector.
    pub fn scan_rows<T: Model>(&self, rows: Rows) -> Result<Vec<T>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let plan = self.plan(rows.columns())?;
        let mut models = Vec::with_capacity(rows.len());

        for row in rows {
            let mut model = T::default();
            self.apply(&plan, row, &mut model)?;
            models.push(model);
        }

        Ok(models)
    }

    fn apply(&self, plan: &[Option<usize>], row: Row, dst: &mut dyn Any) -> Result<()> {
        assign_row(&self.metadata.fields, plan, row, dst)
    }

    fn field_index(&self, column: &str) -> Option<usize> {
        self.metadata.field_map.get(column).copied().or_else(|| {
            self.metadata
                .fields
                .iter()
                .position(|field| field.column.eq_ignore_ascii_case(column))
        })
    }
}

/// Column-to-field assignment shared with the raw scanner.
pub(crate) fn assign_row(
    fields: &[FieldMetadata],
    plan: &[Option<usize>],
    mut row: Row,
    dst: &mut dyn Any,
) -> Result<()> {
    for (index, field) in plan.iter().enumerate() {
        if let Some(field) = field {
            fields[*field].assign(dst, row.take(index))?;
        }
    }
    Ok(())
}
