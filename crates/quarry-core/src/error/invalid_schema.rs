use super::Error;

/// A model that cannot be used against the live database, such as one whose
/// table is missing. Column-level disagreements are only reported.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    reason: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.reason)
    }
}

impl Error {
    pub fn invalid_schema(reason: impl Into<String>) -> Error {
        let reason = reason.into().into_boxed_str();
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema { reason }))
    }

    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
