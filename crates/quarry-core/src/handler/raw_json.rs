use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{downcast, downcast_mut, RawJson, Shape, TypeInfo},
    Result,
};

use std::any::Any;

/// Pre-serialized JSON, passed through verbatim.
///
/// A null document is written as SQL NULL and SQL NULL reads back as a null
/// document, never as an error.
pub(super) struct RawJsonHandler;

impl TypeHandler for RawJsonHandler {
    fn name(&self) -> &'static str {
        "raw_json"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        matches!(ty.shape, Shape::RawJson)
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        let raw = downcast::<RawJson>(value, codec.ty())?;
        Ok(match raw.as_str() {
            Some(src) => Value::Json(src.to_string()),
            None => Value::Null,
        })
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let dst = downcast_mut::<RawJson>(dst, codec.ty())?;
        *dst = match value {
            Value::Null => RawJson::null(),
            value => RawJson::from_string(value.to_json_text()?),
        };
        Ok(())
    }
}
