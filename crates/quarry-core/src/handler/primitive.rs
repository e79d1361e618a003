use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{downcast, downcast_mut, Primitive, Shape, TypeInfo},
    Result,
};

use std::any::Any;

/// `String`, `i64`, `bool` and `f64`, copied directly.
pub(super) struct PrimitiveHandler;

fn primitive(codec: &Codec) -> Result<Primitive> {
    match codec.ty().shape {
        Shape::Primitive(primitive) => Ok(primitive),
        _ => Err(crate::err!("`{}` is not a primitive", codec.ty().name)),
    }
}

impl TypeHandler for PrimitiveHandler {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        matches!(ty.shape, Shape::Primitive(_))
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        let ty = codec.ty();
        Ok(match primitive(codec)? {
            Primitive::String => Value::String(downcast::<String>(value, ty)?.clone()),
            Primitive::I64 => Value::I64(*downcast::<i64>(value, ty)?),
            Primitive::Bool => Value::Bool(*downcast::<bool>(value, ty)?),
            Primitive::F64 => Value::F64(*downcast::<f64>(value, ty)?),
        })
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let ty = codec.ty();
        let null = value.is_null();

        match primitive(codec)? {
            Primitive::String => {
                let dst = downcast_mut::<String>(dst, ty)?;
                *dst = if null {
                    String::new()
                } else {
                    value.to_string_value()?
                };
            }
            Primitive::I64 => {
                let dst = downcast_mut::<i64>(dst, ty)?;
                *dst = if null { 0 } else { value.to_i64()? };
            }
            Primitive::Bool => {
                let dst = downcast_mut::<bool>(dst, ty)?;
                *dst = !null && value.to_bool()?;
            }
            Primitive::F64 => {
                let dst = downcast_mut::<f64>(dst, ty)?;
                *dst = if null { 0.0 } else { value.to_f64()? };
            }
        }

        Ok(())
    }
}
