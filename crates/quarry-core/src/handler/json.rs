use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{JsonOps, Shape, TypeInfo},
    Result,
};

use std::any::Any;

/// Sequences, maps and structs stored as JSON documents.
///
/// An empty collection is written as `[]` or `{}`, never as NULL. Reading
/// NULL resets the field to its empty value, so a scanned collection is
/// always usable.
pub(super) struct JsonHandler;

fn ops(codec: &Codec) -> Result<JsonOps> {
    codec
        .ty()
        .json
        .ok_or_else(|| crate::err!("`{}` has no JSON encoding", codec.ty().name))
}

impl TypeHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        ty.json.is_some() && matches!(ty.shape, Shape::Seq | Shape::Map | Shape::Struct)
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        Ok(Value::Json((ops(codec)?.encode)(value)?))
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let ops = ops(codec)?;
        match value {
            Value::Null => {
                (ops.reset)(dst);
                Ok(())
            }
            value => (ops.decode)(dst, &value.to_json_text()?),
        }
    }
}
