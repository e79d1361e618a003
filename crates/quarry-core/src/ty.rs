//! Runtime descriptions of model field types.
//!
//! Every field type implements [`FieldType`], which hands out a [`TypeInfo`]:
//! the type's identity, its [`Shape`] and the type-erased operations the
//! handler chain needs to read and write a value behind `&dyn Any`.

mod impls;
pub use impls::JsonElement;

mod raw_json;
pub use raw_json::RawJson;

use crate::{stmt::Value, Result};

use serde::{de::DeserializeOwned, Serialize};
use std::any::{Any, TypeId};

/// A type that can be stored in a model field.
pub trait FieldType: Default + Send + Sync + 'static {
    fn type_info() -> TypeInfo;
}

/// A type that converts itself to and from a driver value.
///
/// Implement this for newtypes and enums with a natural column encoding, then
/// implement [`FieldType`] with [`TypeInfo::custom`].
pub trait DriverValue: Sized {
    fn to_value(&self) -> Result<Value>;

    fn from_value(value: Value) -> Result<Self>;
}

#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Rust type name, for error messages
    pub name: &'static str,

    pub type_id: TypeId,

    pub shape: Shape,

    /// Present when the type converts itself via [`DriverValue`]
    pub driver: Option<DriverOps>,

    /// Present when the type has a JSON encoding
    pub json: Option<JsonOps>,
}

#[derive(Debug, Clone)]
pub enum Shape {
    /// `String`, `i64`, `bool` or `f64`
    Primitive(Primitive),

    /// `Option<T>`
    Option(Box<TypeInfo>, OptionOps),

    Uuid,

    Timestamp,

    RawJson,

    /// `Vec<u8>`
    Bytes,

    /// A sequence that is not a byte string
    Seq,

    /// A string-keyed map
    Map,

    /// A structured value stored as a single column
    Struct,

    /// Integers and floats narrower than the driver's 64-bit values
    Scalar(ScalarOps),

    /// No known layout; only custom conversions can handle it
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    I64,
    Bool,
    F64,
}

/// Operations on an `Option<T>` behind `&dyn Any`.
#[derive(Clone, Copy)]
pub struct OptionOps {
    /// Borrows the contained value, `None` for `None`.
    pub get: fn(&dyn Any) -> Option<&dyn Any>,

    /// Sets the option to `None`.
    pub clear: fn(&mut dyn Any),

    /// Sets the option to `Some(T::default())` and borrows the new value.
    pub fill: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

#[derive(Clone, Copy)]
pub struct DriverOps {
    pub to_value: fn(&dyn Any) -> Result<Value>,
    pub from_value: fn(&mut dyn Any, Value) -> Result<()>,
}

#[derive(Clone, Copy)]
pub struct JsonOps {
    pub encode: fn(&dyn Any) -> Result<String>,
    pub decode: fn(&mut dyn Any, &str) -> Result<()>,

    /// Resets the value to its empty default.
    pub reset: fn(&mut dyn Any),
}

#[derive(Clone, Copy)]
pub struct ScalarOps {
    pub to_value: fn(&dyn Any) -> Result<Value>,
    pub from_value: fn(&mut dyn Any, Value) -> Result<()>,
}

impl TypeInfo {
    /// Describes `T` with the given shape and no extra capabilities.
    pub fn of<T: 'static>(shape: Shape) -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            shape,
            driver: None,
            json: None,
        }
    }

    /// Describes a type stored as a JSON document.
    pub fn json<T>(shape: Shape) -> Self
    where
        T: Serialize + DeserializeOwned + Default + 'static,
    {
        Self {
            json: Some(JsonOps {
                encode: json_encode::<T>,
                decode: json_decode::<T>,
                reset: reset::<T>,
            }),
            ..Self::of::<T>(shape)
        }
    }

    /// Describes a type that converts itself through [`DriverValue`].
    pub fn custom<T>() -> Self
    where
        T: DriverValue + 'static,
    {
        Self {
            driver: Some(DriverOps {
                to_value: custom_to_value::<T>,
                from_value: custom_from_value::<T>,
            }),
            ..Self::of::<T>(Shape::Opaque)
        }
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn is_option(&self) -> bool {
        matches!(self.shape, Shape::Option(..))
    }
}

pub(crate) fn downcast<'a, T: 'static>(value: &'a dyn Any, ty: &TypeInfo) -> Result<&'a T> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", ty.name))
}

pub(crate) fn downcast_mut<'a, T: 'static>(
    value: &'a mut dyn Any,
    ty: &TypeInfo,
) -> Result<&'a mut T> {
    value
        .downcast_mut::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", ty.name))
}

fn reset<T: Default + 'static>(value: &mut dyn Any) {
    if let Some(value) = value.downcast_mut::<T>() {
        *value = T::default();
    }
}

fn json_encode<T: Serialize + 'static>(value: &dyn Any) -> Result<String> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", std::any::type_name::<T>()))?;
    Ok(serde_json::to_string(value)?)
}

fn json_decode<T: DeserializeOwned + 'static>(dst: &mut dyn Any, src: &str) -> Result<()> {
    let dst = dst
        .downcast_mut::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", std::any::type_name::<T>()))?;
    *dst = serde_json::from_str(src)?;
    Ok(())
}

fn custom_to_value<T: DriverValue + 'static>(value: &dyn Any) -> Result<Value> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", std::any::type_name::<T>()))?
        .to_value()
}

fn custom_from_value<T: DriverValue + 'static>(dst: &mut dyn Any, value: Value) -> Result<()> {
    let dst = dst
        .downcast_mut::<T>()
        .ok_or_else(|| crate::err!("field value is not a `{}`", std::any::type_name::<T>()))?;
    *dst = T::from_value(value)?;
    Ok(())
}

macro_rules! opaque_debug {
    ( $( $t:ident ),* ) => {
        $(
            impl core::fmt::Debug for $t {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.write_str(stringify!($t))
                }
            }
        )*
    };
}

opaque_debug!(OptionOps, DriverOps, JsonOps, ScalarOps);

