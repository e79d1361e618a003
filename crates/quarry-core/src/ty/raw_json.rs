use crate::Result;

use serde::{de::DeserializeOwned, Serialize};

/// Pre-serialized JSON, stored and loaded verbatim.
///
/// Unlike JSON-encoded collections, a null `RawJson` is written as SQL NULL
/// and SQL NULL reads back as null, so "no document" survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJson(Option<String>);

impl RawJson {
    pub const fn null() -> Self {
        Self(None)
    }

    /// Wraps JSON text without validating it.
    pub fn from_string(src: impl Into<String>) -> Self {
        Self(Some(src.into()))
    }

    /// Serializes `value` into a new document.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self(Some(serde_json::to_string(value)?)))
    }

    /// Deserializes the document, `None` when it is null.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.0
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_string(self) -> Option<String> {
        self.0
    }
}

impl From<serde_json::Value> for RawJson {
    fn from(value: serde_json::Value) -> Self {
        Self(Some(value.to_string()))
    }
}
