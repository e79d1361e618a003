use super::{FieldType, OptionOps, Primitive, RawJson, ScalarOps, Shape, TypeInfo};
use crate::{stmt::Value, Error, Result};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
};
use uuid::Uuid;

/// A type that can appear inside a JSON column (`Vec<T>`, map values).
///
/// `u8` deliberately does not implement this: `Vec<u8>` is a byte string,
/// not a JSON array.
pub trait JsonElement: Serialize + DeserializeOwned + Send + Sync + 'static {}

macro_rules! json_element {
    ( $( $t:ty ),* ) => {
        $( impl JsonElement for $t {} )*
    };
}

json_element!(
    String,
    bool,
    i8,
    i16,
    i32,
    i64,
    u16,
    u32,
    u64,
    f32,
    f64,
    Uuid,
    DateTime<Utc>,
    serde_json::Value
);

impl<T: JsonElement> JsonElement for Option<T> {}
impl<T: JsonElement> JsonElement for Vec<T> {}
impl<V: JsonElement> JsonElement for HashMap<String, V> {}
impl<V: JsonElement> JsonElement for BTreeMap<String, V> {}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

impl FieldType for String {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Primitive(Primitive::String))
    }
}

impl FieldType for i64 {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Primitive(Primitive::I64))
    }
}

impl FieldType for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Primitive(Primitive::Bool))
    }
}

impl FieldType for f64 {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Primitive(Primitive::F64))
    }
}

// ---------------------------------------------------------------------------
// Narrow scalars, converted with range checks
// ---------------------------------------------------------------------------

macro_rules! scalar_int {
    ( $( $t:ty ),* ) => {
        $(
            impl FieldType for $t {
                fn type_info() -> TypeInfo {
                    fn to_value(value: &dyn Any) -> Result<Value> {
                        let value = *value
                            .downcast_ref::<$t>()
                            .ok_or_else(|| crate::err!("field value is not a `{}`", stringify!($t)))?;
                        i64::try_from(value)
                            .map(Value::I64)
                            .map_err(|_| crate::err!("{value} does not fit in a 64-bit column"))
                    }

                    fn from_value(dst: &mut dyn Any, value: Value) -> Result<()> {
                        let dst = dst
                            .downcast_mut::<$t>()
                            .ok_or_else(|| crate::err!("field value is not a `{}`", stringify!($t)))?;
                        if value.is_null() {
                            *dst = <$t>::default();
                            return Ok(());
                        }
                        let wide = value.to_i64()?;
                        *dst = <$t>::try_from(wide)
                            .map_err(|_| Error::type_conversion(Value::I64(wide), stringify!($t)))?;
                        Ok(())
                    }

                    TypeInfo::of::<Self>(Shape::Scalar(ScalarOps { to_value, from_value }))
                }
            }
        )*
    };
}

scalar_int!(i8, i16, i32, u8, u16, u32, u64);

impl FieldType for f32 {
    fn type_info() -> TypeInfo {
        fn to_value(value: &dyn Any) -> Result<Value> {
            let value = value
                .downcast_ref::<f32>()
                .ok_or_else(|| crate::err!("field value is not a `f32`"))?;
            Ok(Value::F64(*value as f64))
        }

        fn from_value(dst: &mut dyn Any, value: Value) -> Result<()> {
            let dst = dst
                .downcast_mut::<f32>()
                .ok_or_else(|| crate::err!("field value is not a `f32`"))?;
            *dst = match value {
                Value::Null => 0.0,
                value => value.to_f64()? as f32,
            };
            Ok(())
        }

        TypeInfo::of::<Self>(Shape::Scalar(ScalarOps {
            to_value,
            from_value,
        }))
    }
}

// ---------------------------------------------------------------------------
// Option
// ---------------------------------------------------------------------------

fn option_get<T: 'static>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<Option<T>>()?
        .as_ref()
        .map(|inner| inner as &dyn Any)
}

fn option_clear<T: 'static>(value: &mut dyn Any) {
    if let Some(value) = value.downcast_mut::<Option<T>>() {
        *value = None;
    }
}

fn option_fill<T: Default + 'static>(value: &mut dyn Any) -> Option<&mut dyn Any> {
    let value = value.downcast_mut::<Option<T>>()?;
    Some(value.insert(T::default()) as &mut dyn Any)
}

impl<T: FieldType> FieldType for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Option(
            Box::new(T::type_info()),
            OptionOps {
                get: option_get::<T>,
                clear: option_clear::<T>,
                fill: option_fill::<T>,
            },
        ))
    }
}

// ---------------------------------------------------------------------------
// Special types
// ---------------------------------------------------------------------------

impl FieldType for Uuid {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Uuid)
    }
}

impl FieldType for DateTime<Utc> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Timestamp)
    }
}

impl FieldType for RawJson {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::RawJson)
    }
}

impl FieldType for Vec<u8> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>(Shape::Bytes)
    }
}

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

impl<T: JsonElement> FieldType for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::json::<Self>(Shape::Seq)
    }
}

impl<V: JsonElement> FieldType for HashMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::json::<Self>(Shape::Map)
    }
}

impl<V: JsonElement> FieldType for BTreeMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::json::<Self>(Shape::Map)
    }
}

impl FieldType for serde_json::Value {
    fn type_info() -> TypeInfo {
        TypeInfo::json::<Self>(Shape::Struct)
    }
}
