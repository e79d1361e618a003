use super::Error;

/// Error when a strict scan finds a mapped field with no matching result column.
#[derive(Debug)]
pub(super) struct MissingColumn {
    table: Box<str>,
    column: Box<str>,
}

impl std::error::Error for MissingColumn {}

impl core::fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "column `{}` of `{}` is missing from the result set",
            self.column, self.table
        )
    }
}

impl Error {
    /// Creates a missing column error.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingColumn(MissingColumn {
            table: table.into().into(),
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing column error.
    pub fn is_missing_column(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::MissingColumn(_)))
    }
}
