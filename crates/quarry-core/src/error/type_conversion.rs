use super::Error;
use crate::stmt::Value;

/// A driver value whose kind the target Rust type cannot be read from.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    value: Value,
    target: &'static str,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let source = self.value.kind_name();
        write!(f, "cannot convert {source} to {}", self.target)
    }
}

impl Error {
    /// `target` names the Rust type being read, e.g. `"bool"`.
    pub fn type_conversion(value: Value, target: &'static str) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            value,
            target,
        }))
    }

    pub fn is_type_conversion(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TypeConversion(_)))
    }
}
