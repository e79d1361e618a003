use super::Error;

/// A connection URL that names no supported driver or lacks a required part.
#[derive(Debug)]
pub(super) struct InvalidConnectionUrl {
    reason: Box<str>,
}

impl std::error::Error for InvalidConnectionUrl {}

impl core::fmt::Display for InvalidConnectionUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid connection URL: {}", self.reason)
    }
}

impl Error {
    pub fn invalid_connection_url(reason: impl Into<String>) -> Error {
        let reason = reason.into().into_boxed_str();
        Error::from(super::ErrorKind::InvalidConnectionUrl(InvalidConnectionUrl { reason }))
    }

    pub fn is_invalid_connection_url(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidConnectionUrl(_)))
    }
}
