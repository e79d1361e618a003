use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{Shape, TypeInfo},
    Error, Result,
};

use std::any::Any;

/// Claims every type. Narrow scalars convert through their own range-checked
/// operations; anything else is reported as unsupported instead of dropped.
pub(super) struct FallbackHandler;

impl TypeHandler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn can_handle(&self, _ty: &TypeInfo) -> bool {
        true
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        match &codec.ty().shape {
            Shape::Scalar(ops) => (ops.to_value)(value),
            _ => Err(Error::unsupported_type(codec.ty().name, codec.column())),
        }
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        match &codec.ty().shape {
            Shape::Scalar(ops) => (ops.from_value)(dst, value),
            _ => Err(Error::unsupported_type(codec.ty().name, codec.column())),
        }
    }
}
