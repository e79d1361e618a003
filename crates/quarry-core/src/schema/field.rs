use super::Accessor;
use crate::{handler::Codec, stmt::Value, ty::TypeInfo, Result};

use std::any::Any;

/// A column-backed field of a model, flattened out of any embedded structs.
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    /// Rust field name
    pub name: &'static str,

    pub json_name: Option<&'static str>,

    /// SQL column name
    pub column: String,

    /// `true` when the column name came from the tag rather than the field name
    pub explicit_column: bool,

    pub ty: TypeInfo,

    /// The field type resolved against the handler chain
    pub codec: Codec,

    pub pk: bool,
    pub auto_increment: bool,
    pub nullable: bool,
    pub unique: bool,
    pub sql_type: Option<String>,
    pub default: Option<String>,

    pub(crate) path: Vec<Accessor>,
}

impl FieldMetadata {
    /// Borrows this field out of a model value.
    pub fn get<'a>(&self, model: &'a dyn Any) -> Option<&'a dyn Any> {
        self.path
            .iter()
            .try_fold(model, |value, accessor| (accessor.get)(value))
    }

    /// Mutably borrows this field out of a model value.
    pub fn get_mut<'a>(&self, model: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let mut value = model;
        for accessor in &self.path {
            value = (accessor.get_mut)(value)?;
        }
        Some(value)
    }

    /// Reads this field from `model` as a driver value.
    pub fn extract(&self, model: &dyn Any) -> Result<Value> {
        let value = self.get(model).ok_or_else(|| self.unreachable())?;
        self.codec
            .extract(value)
            .map_err(|err| err.context(crate::err!("extracting `{}`", self.name)))
    }

    /// Writes a driver value into this field of `model`.
    pub fn assign(&self, model: &mut dyn Any, value: Value) -> Result<()> {
        let dst = self.get_mut(model).ok_or_else(|| self.unreachable())?;
        self.codec
            .scan_target(dst)
            .assign(value)
            .map_err(|err| err.context(crate::err!("scanning column `{}`", self.column)))
    }

    fn unreachable(&self) -> crate::Error {
        crate::err!("field `{}` is not reachable from this value", self.name)
    }
}
