use super::{inner_codec, Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{OptionOps, Shape, TypeInfo},
    Result,
};

use std::any::Any;

/// `Option<T>`: `None` is SQL NULL, anything else goes through `T`'s handler.
pub(super) struct PointerHandler;

fn ops(codec: &Codec) -> Result<OptionOps> {
    match &codec.ty().shape {
        Shape::Option(_, ops) => Ok(*ops),
        _ => Err(crate::err!("`{}` is not an option", codec.ty().name)),
    }
}

impl TypeHandler for PointerHandler {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        ty.is_option()
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        match (ops(codec)?.get)(value) {
            Some(inner) => inner_codec(codec)?.extract(inner),
            None => Ok(Value::Null),
        }
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let ops = ops(codec)?;

        if value.is_null() {
            (ops.clear)(dst);
            return Ok(());
        }

        let inner = inner_codec(codec)?;
        let res = match (ops.fill)(dst) {
            Some(slot) => inner.scan(slot, value),
            None => Err(crate::err!("field value is not a `{}`", codec.ty().name)),
        };

        if res.is_err() {
            (ops.clear)(dst);
        }

        res
    }
}
