use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use postgres_types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use quarry_core::{stmt::Value as CoreValue, Error, Result};
use tokio_postgres::{Column, Row};
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// Binds a core value as a PostgreSQL parameter.
///
/// Statements are prepared without parameter types, so the server infers
/// each parameter's type from the statement and the value is converted to
/// match it: an `I64` bound to an `int4` column is narrowed, a `Json` string
/// bound to `jsonb` is sent as a document, and so on.
#[derive(Debug)]
pub struct Value<'a>(&'a CoreValue);

impl<'a> From<&'a CoreValue> for Value<'a> {
    fn from(value: &'a CoreValue) -> Self {
        Self(value)
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(v) => match *ty {
                Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(*v as i64, ty, out),
                _ => v.to_sql(ty, out),
            },
            CoreValue::I64(v) => int_to_sql(*v, ty, out),
            CoreValue::F64(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 if v.fract() == 0.0 => {
                    int_to_sql(*v as i64, ty, out)
                }
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => v.to_string().to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            CoreValue::String(v) => text_to_sql(v, ty, out),
            CoreValue::Json(v) => match *ty {
                Type::JSON | Type::JSONB => {
                    serde_json::from_str::<serde_json::Value>(v)?.to_sql(ty, out)
                }
                _ => text_to_sql(v, ty, out),
            },
            CoreValue::Bytes(v) => match *ty {
                Type::JSON | Type::JSONB => {
                    serde_json::from_slice::<serde_json::Value>(v)?.to_sql(ty, out)
                }
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => {
                    std::str::from_utf8(v)?.to_sql(ty, out)
                }
                _ => v.as_slice().to_sql(ty, out),
            },
            CoreValue::Uuid(v) => match *ty {
                Type::UUID => v.to_sql(ty, out),
                _ => v.to_string().to_sql(ty, out),
            },
            CoreValue::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql(ty, out),
                Type::DATE => v.date_naive().to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => v
                    .to_rfc3339_opts(SecondsFormat::Micros, true)
                    .to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR => v.to_string().to_sql(ty, out),
        _ => v.to_sql(ty, out),
    }
}

fn text_to_sql(v: &str, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::UUID => v.parse::<Uuid>()?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(v)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(v)?
            .with_timezone(&Utc)
            .to_sql(ty, out),
        Type::TIMESTAMP => v.parse::<NaiveDateTime>()?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(v.parse()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => v.parse::<f64>()?.to_sql(ty, out),
        Type::BOOL => v.parse::<bool>()?.to_sql(ty, out),
        _ => v.to_sql(ty, out),
    }
}

impl Value<'_> {
    /// Reads column `index` of a PostgreSQL row as a core value.
    pub fn from_sql(row: &Row, index: usize, column: &Column) -> Result<CoreValue> {
        let ty = column.type_();

        let value = match *ty {
            Type::BOOL => get::<bool>(row, index)?.map(CoreValue::Bool),
            Type::INT2 => get::<i16>(row, index)?.map(|v| CoreValue::I64(v.into())),
            Type::INT4 => get::<i32>(row, index)?.map(|v| CoreValue::I64(v.into())),
            Type::INT8 => get::<i64>(row, index)?.map(CoreValue::I64),
            Type::OID => get::<u32>(row, index)?.map(|v| CoreValue::I64(v.into())),
            Type::FLOAT4 => get::<f32>(row, index)?.map(|v| CoreValue::F64(v.into())),
            Type::FLOAT8 => get::<f64>(row, index)?.map(CoreValue::F64),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                get::<String>(row, index)?.map(CoreValue::String)
            }
            Type::UUID => get::<Uuid>(row, index)?.map(CoreValue::Uuid),
            Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, index)?.map(CoreValue::Timestamp),
            Type::TIMESTAMP => {
                get::<NaiveDateTime>(row, index)?.map(|v| CoreValue::Timestamp(v.and_utc()))
            }
            Type::JSON | Type::JSONB => {
                get::<serde_json::Value>(row, index)?.map(|v| CoreValue::Json(v.to_string()))
            }
            Type::BYTEA => get::<Vec<u8>>(row, index)?.map(CoreValue::Bytes),
            _ => {
                return Err(quarry_core::err!(
                    "unsupported PostgreSQL type `{ty}` for column `{}`",
                    column.name()
                ))
            }
        };

        Ok(value.unwrap_or(CoreValue::Null))
    }
}

fn get<'a, T>(row: &'a Row, index: usize) -> Result<Option<T>>
where
    T: postgres_types::FromSql<'a>,
{
    row.try_get(index).map_err(Error::driver_operation_failed)
}
