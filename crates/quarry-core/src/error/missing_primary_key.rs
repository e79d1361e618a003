use super::Error;

/// Error when an operation needs a primary key the model does not have.
#[derive(Debug)]
pub(super) struct MissingPrimaryKey {
    table: Box<str>,
    operation: &'static str,
}

impl std::error::Error for MissingPrimaryKey {}

impl core::fmt::Display for MissingPrimaryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "`{}` requires a primary key but `{}` declares none",
            self.operation, self.table
        )
    }
}

impl Error {
    /// Creates a missing primary key error for `operation` on `table`.
    pub fn missing_primary_key(table: impl Into<String>, operation: &'static str) -> Error {
        Error::from(super::ErrorKind::MissingPrimaryKey(MissingPrimaryKey {
            table: table.into().into(),
            operation,
        }))
    }

    /// Returns `true` if this error is a missing primary key error.
    pub fn is_missing_primary_key(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::MissingPrimaryKey(_)))
    }
}
