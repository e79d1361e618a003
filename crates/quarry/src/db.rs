mod builder;
pub use builder::Builder;

mod config;
pub use config::Config;

mod connect;
pub use connect::Connect;

mod pool;
pub use pool::{Pool, PoolConnection};

use crate::{validate, Model, Query, Result, ValidationReport};

use quarry_core::{driver::Driver, schema::registry, Error};
use std::{sync::Arc, time::Duration};

/// Shared state between all `Db` clones.
#[derive(Debug)]
struct Shared {
    pool: Pool,
    query_timeout: Option<Duration>,
}

/// A handle to a database. Cloning is cheap and clones share one pool.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(pool: Pool, query_timeout: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(Shared {
                pool,
                query_timeout,
            }),
        }
    }

    /// Acquires a connection that runs each statement in autocommit mode.
    pub async fn query(&self) -> Result<Query> {
        let connection = self.shared.pool.get().await?;
        Ok(Query::new(connection, false, self.shared.query_timeout))
    }

    /// Acquires a connection and begins a transaction on it.
    ///
    /// The returned handle must be closed with [`Query::commit`] or
    /// [`Query::rollback`]. A handle dropped while still open is rolled back
    /// before its connection is handed out again.
    pub async fn begin(&self) -> Result<Query> {
        let connection = self.shared.pool.get().await?;
        let mut query = Query::new(connection, true, self.shared.query_timeout);
        query.connection().begin().await?;
        Ok(query)
    }

    /// Checks the table of `T` against the database.
    pub async fn validate_schema<T: Model>(&self) -> Result<ValidationReport> {
        let metadata = registry::metadata::<T>()
            .ok_or_else(|| Error::model_not_registered(std::any::type_name::<T>()))?;
        let mut query = self.query().await?;
        validate::validate_schema(&mut query, &metadata).await
    }

    pub fn driver(&self) -> &dyn Driver {
        self.shared.pool.driver()
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.shared.query_timeout
    }
}
