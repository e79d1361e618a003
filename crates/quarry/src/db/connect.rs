use crate::Result;

use quarry_core::{
    async_trait,
    driver::{Connection, Driver, Flavor},
    Error,
};
use std::borrow::Cow;
use url::Url;

/// A driver chosen by the scheme of a connection URL.
///
/// Each scheme is available when the matching Cargo feature is enabled.
#[derive(Debug)]
pub enum Connect {
    #[cfg(feature = "postgresql")]
    PostgreSQL(quarry_driver_postgresql::PostgreSQL),

    #[cfg(feature = "sqlite")]
    Sqlite(quarry_driver_sqlite::Sqlite),
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        match parsed.scheme() {
            "postgresql" | "postgres" => connect_postgresql(url),
            "sqlite" => connect_sqlite(url),
            scheme => Err(Error::invalid_connection_url(format!(
                "unsupported database; scheme={scheme}; url={url}"
            ))),
        }
    }
}

#[async_trait]
impl Driver for Connect {
    fn url(&self) -> Cow<'_, str> {
        match *self {
            #[cfg(feature = "postgresql")]
            Connect::PostgreSQL(ref driver) => driver.url(),
            #[cfg(feature = "sqlite")]
            Connect::Sqlite(ref driver) => driver.url(),
        }
    }

    fn flavor(&self) -> Flavor {
        match *self {
            #[cfg(feature = "postgresql")]
            Connect::PostgreSQL(ref driver) => driver.flavor(),
            #[cfg(feature = "sqlite")]
            Connect::Sqlite(ref driver) => driver.flavor(),
        }
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        match *self {
            #[cfg(feature = "postgresql")]
            Connect::PostgreSQL(ref driver) => driver.connect().await,
            #[cfg(feature = "sqlite")]
            Connect::Sqlite(ref driver) => driver.connect().await,
        }
    }

    fn max_connections(&self) -> Option<usize> {
        match *self {
            #[cfg(feature = "postgresql")]
            Connect::PostgreSQL(ref driver) => driver.max_connections(),
            #[cfg(feature = "sqlite")]
            Connect::Sqlite(ref driver) => driver.max_connections(),
        }
    }
}

#[cfg(feature = "postgresql")]
fn connect_postgresql(url: &str) -> Result<Connect> {
    quarry_driver_postgresql::PostgreSQL::new(url).map(Connect::PostgreSQL)
}

#[cfg(not(feature = "postgresql"))]
fn connect_postgresql(_url: &str) -> Result<Connect> {
    Err(Error::invalid_connection_url("`postgresql` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Connect> {
    quarry_driver_sqlite::Sqlite::new(url).map(Connect::Sqlite)
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Connect> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}
