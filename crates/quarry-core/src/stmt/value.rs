use crate::{Error, Result};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A value as it crosses the driver boundary.
///
/// Drivers bind these as statement parameters and produce them when reading
/// result columns. Type handlers convert model fields to and from this form.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,

    Bool(bool),

    /// Signed 64-bit integer. Narrower integers are widened on the way in.
    I64(i64),

    F64(f64),

    String(String),

    Bytes(Vec<u8>),

    Uuid(Uuid),

    Timestamp(DateTime<Utc>),

    /// Serialized JSON text, bound as a JSON parameter where the database has one
    Json(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in conversion error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I64(_) => "I64",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Uuid(_) => "Uuid",
            Value::Timestamp(_) => "Timestamp",
            Value::Json(_) => "Json",
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Value::Bool(v) => Ok(v),
            // SQLite has no boolean storage class
            Value::I64(v) => Ok(v != 0),
            Value::String(ref v) => match v.as_str() {
                "true" | "t" | "TRUE" | "1" => Ok(true),
                "false" | "f" | "FALSE" | "0" => Ok(false),
                _ => Err(Error::type_conversion(self, "bool")),
            },
            value => Err(Error::type_conversion(value, "bool")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Value::I64(v) => Ok(v),
            Value::Bool(v) => Ok(v as i64),
            Value::F64(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
            Value::String(ref v) => v
                .parse()
                .map_err(|_| Error::type_conversion(self, "i64")),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            Value::String(ref v) => v
                .parse()
                .map_err(|_| Error::type_conversion(self, "f64")),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }

    pub fn to_string_value(self) -> Result<String> {
        match self {
            Value::String(v) | Value::Json(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v)
                .map_err(|err| Error::type_conversion(Value::Bytes(err.into_bytes()), "String")),
            Value::Uuid(v) => Ok(v.to_string()),
            Value::I64(v) => Ok(v.to_string()),
            Value::F64(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Timestamp(v) => Ok(v.to_rfc3339_opts(SecondsFormat::Micros, true)),
            value => Err(Error::type_conversion(value, "String")),
        }
    }

    pub fn to_uuid(self) -> Result<Uuid> {
        match self {
            Value::Uuid(v) => Ok(v),
            Value::String(ref v) => v
                .parse()
                .map_err(|_| Error::type_conversion(self, "Uuid")),
            Value::Bytes(ref v) => {
                Uuid::from_slice(v).map_err(|_| Error::type_conversion(self, "Uuid"))
            }
            value => Err(Error::type_conversion(value, "Uuid")),
        }
    }

    pub fn to_timestamp(self) -> Result<DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => Ok(v),
            Value::String(ref v) => {
                parse_timestamp(v).ok_or_else(|| Error::type_conversion(self, "DateTime<Utc>"))
            }
            value => Err(Error::type_conversion(value, "DateTime<Utc>")),
        }
    }

    pub fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            Value::Bytes(v) => Ok(v),
            Value::String(v) | Value::Json(v) => Ok(v.into_bytes()),
            value => Err(Error::type_conversion(value, "Vec<u8>")),
        }
    }

    /// Returns the JSON text of a value read from a JSON, text or blob column.
    pub fn to_json_text(self) -> Result<String> {
        match self {
            Value::Json(v) | Value::String(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v)
                .map_err(|err| Error::type_conversion(Value::Bytes(err.into_bytes()), "json")),
            value => Err(Error::type_conversion(value, "json")),
        }
    }
}

/// Text timestamps come back from SQLite either in RFC 3339 form (how they are
/// written) or in SQLite's own `CURRENT_TIMESTAMP` form.
fn parse_timestamp(src: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(src) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(src, fmt).ok())
        .map(|naive| naive.and_utc())
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

macro_rules! impl_from_int {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for Value {
                fn from(src: $t) -> Self {
                    Self::I64(src as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F64(src as f64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Self {
        Self::Timestamp(src)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        Self::Json(src.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}
