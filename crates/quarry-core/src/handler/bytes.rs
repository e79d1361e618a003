use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{downcast, downcast_mut, Shape, TypeInfo},
    Result,
};

use std::any::Any;

/// `Vec<u8>`, stored as a blob. Byte strings never take the JSON path.
pub(super) struct BytesHandler;

impl TypeHandler for BytesHandler {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        matches!(ty.shape, Shape::Bytes)
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        Ok(Value::Bytes(downcast::<Vec<u8>>(value, codec.ty())?.clone()))
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let dst = downcast_mut::<Vec<u8>>(dst, codec.ty())?;
        *dst = match value {
            Value::Null => Vec::new(),
            value => value.to_bytes()?,
        };
        Ok(())
    }
}
