use chrono::SecondsFormat;
use quarry_core::{stmt::Value as CoreValue, Error, Result};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

/// Binds a core value as a SQLite parameter.
///
/// SQLite has no UUID, timestamp or JSON storage class. UUIDs are stored as
/// hyphenated text and timestamps as RFC 3339 text with microsecond
/// precision, which sorts chronologically.
#[derive(Debug)]
pub struct Value<'a>(&'a CoreValue);

impl<'a> From<&'a CoreValue> for Value<'a> {
    fn from(value: &'a CoreValue) -> Self {
        Self(value)
    }
}

impl Value<'_> {
    /// Reads column `index` of a SQLite row as a core value.
    pub fn from_sql(row: &Row<'_>, index: usize) -> Result<CoreValue> {
        let value = row
            .get_ref(index)
            .map_err(Error::driver_operation_failed)?;

        Ok(match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(v) => CoreValue::I64(v),
            ValueRef::Real(v) => CoreValue::F64(v),
            ValueRef::Text(v) => CoreValue::String(
                std::str::from_utf8(v)
                    .map_err(|err| quarry_core::err!("column {index} is not UTF-8: {err}"))?
                    .to_string(),
            ),
            ValueRef::Blob(v) => CoreValue::Bytes(v.to_vec()),
        })
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            CoreValue::Null => ToSqlOutput::Owned(SqlValue::Null),
            CoreValue::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(*v as i64)),
            CoreValue::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            CoreValue::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            CoreValue::String(v) | CoreValue::Json(v) => {
                ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))
            }
            CoreValue::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(&v[..])),
            CoreValue::Uuid(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            CoreValue::Timestamp(v) => ToSqlOutput::Owned(SqlValue::Text(
                v.to_rfc3339_opts(SecondsFormat::Micros, true),
            )),
        })
    }
}
