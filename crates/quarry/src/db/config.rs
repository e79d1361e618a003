use serde::Deserialize;
use std::time::Duration;

/// Connection settings, typically loaded from a configuration file.
///
/// Every field is optional; missing fields take their defaults.
///
/// ```
/// let config: quarry::db::Config = serde_json::from_str(r#"{
///     "url": "sqlite::memory:",
///     "query_timeout_ms": 250
/// }"#).unwrap();
///
/// assert_eq!(config.query_timeout(), Some(std::time::Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database connection URL
    pub url: String,

    /// Upper bound on pooled connections. Defaults to the pool's own default.
    pub max_connections: Option<usize>,

    /// Deadline applied to every statement
    pub query_timeout_ms: Option<u64>,

    /// Check every registered model against the database on connect
    pub validate_schema: bool,
}

impl Config {
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}
