use super::{Codec, TypeHandler};
use crate::{stmt::Value, ty::TypeInfo, Result};

use std::any::Any;

/// Types implementing [`DriverValue`](crate::ty::DriverValue) convert themselves.
pub(super) struct ValuerHandler;

impl TypeHandler for ValuerHandler {
    fn name(&self) -> &'static str {
        "valuer"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        ty.driver.is_some()
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        match &codec.ty().driver {
            Some(ops) => (ops.to_value)(value),
            None => Err(crate::err!("`{}` has no driver conversion", codec.ty().name)),
        }
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        match &codec.ty().driver {
            Some(ops) => (ops.from_value)(dst, value),
            None => Err(crate::err!("`{}` has no driver conversion", codec.ty().name)),
        }
    }
}
