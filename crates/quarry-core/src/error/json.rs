use super::Error;

/// Error when a JSON column value cannot be encoded or decoded.
#[derive(Debug)]
pub(super) struct JsonError {
    pub(super) inner: serde_json::Error,
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl core::fmt::Display for JsonError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "json: {}", self.inner)
    }
}

impl Error {
    /// Creates an error from a JSON encode/decode failure.
    pub fn json(err: serde_json::Error) -> Error {
        Error::from(super::ErrorKind::Json(JsonError { inner: err }))
    }

    /// Returns `true` if this error is a JSON encode/decode failure.
    pub fn is_json(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Json(_)))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::json(err)
    }
}
