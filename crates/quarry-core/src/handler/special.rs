use super::{Codec, TypeHandler};
use crate::{
    stmt::Value,
    ty::{downcast, downcast_mut, Shape, TypeInfo},
    Result,
};

use chrono::{DateTime, Utc};
use std::any::Any;
use uuid::Uuid;

/// UUIDs and UTC timestamps, bound natively rather than as JSON.
pub(super) struct SpecialTypeHandler;

impl TypeHandler for SpecialTypeHandler {
    fn name(&self) -> &'static str {
        "special"
    }

    fn can_handle(&self, ty: &TypeInfo) -> bool {
        matches!(ty.shape, Shape::Uuid | Shape::Timestamp)
    }

    fn extract(&self, value: &dyn Any, codec: &Codec) -> Result<Value> {
        let ty = codec.ty();
        match ty.shape {
            Shape::Uuid => Ok(Value::Uuid(*downcast::<Uuid>(value, ty)?)),
            Shape::Timestamp => Ok(Value::Timestamp(*downcast::<DateTime<Utc>>(value, ty)?)),
            _ => Err(crate::err!("`{}` is not a special type", ty.name)),
        }
    }

    fn scan(&self, dst: &mut dyn Any, codec: &Codec, value: Value) -> Result<()> {
        let ty = codec.ty();
        let null = value.is_null();

        match ty.shape {
            Shape::Uuid => {
                let dst = downcast_mut::<Uuid>(dst, ty)?;
                *dst = if null { Uuid::nil() } else { value.to_uuid()? };
            }
            Shape::Timestamp => {
                let dst = downcast_mut::<DateTime<Utc>>(dst, ty)?;
                *dst = if null {
                    DateTime::<Utc>::default()
                } else {
                    value.to_timestamp()?
                };
            }
            _ => crate::bail!("`{}` is not a special type", ty.name),
        }

        Ok(())
    }
}
