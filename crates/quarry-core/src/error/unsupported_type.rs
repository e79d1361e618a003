use super::Error;

/// Error when no type handler can move a field's value to or from the driver.
///
/// These indicate a mistake in the model definition, not a data condition.
#[derive(Debug)]
pub(super) struct UnsupportedType {
    type_name: Box<str>,
    column: Box<str>,
}

impl std::error::Error for UnsupportedType {}

impl core::fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported field type `{}` for column `{}`",
            self.type_name, self.column
        )
    }
}

impl Error {
    /// Creates an unsupported type error naming the field type and column.
    pub fn unsupported_type(type_name: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            type_name: type_name.into().into(),
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported type error.
    pub fn is_unsupported_type(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedType(_)))
    }
}
