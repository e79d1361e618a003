use quarry_core::{
    driver::{Connection, Driver},
    Error,
};
use std::ops::{Deref, DerefMut};

use deadpool::managed::{self, PoolError, RecycleError, RecycleResult};

/// Connections opened by one driver, shared by every clone of a `Db`.
#[derive(Debug)]
pub struct Pool {
    inner: managed::Pool<ConnectionManager>,
}

impl Pool {
    /// Builds the pool and opens its first connection, so a bad URL or an
    /// unreachable server fails here rather than on first use.
    ///
    /// `max_connections` never exceeds the driver's own limit.
    pub async fn new(driver: impl Driver, max_connections: Option<usize>) -> crate::Result<Self> {
        let max_size = match (max_connections, driver.max_connections()) {
            (Some(requested), Some(limit)) => Some(requested.min(limit)),
            (requested, limit) => requested.or(limit),
        };

        let manager = ConnectionManager {
            driver: Box::new(driver),
        };
        let mut builder = managed::Pool::builder(manager).runtime(deadpool::Runtime::Tokio1);
        if let Some(max_size) = max_size {
            builder = builder.max_size(max_size);
        }

        let pool = Self {
            inner: builder.build().map_err(Error::connection_pool)?,
        };
        drop(pool.get().await?);

        log::debug!(
            "opened pool for {} with up to {} connections",
            pool.driver().url(),
            pool.max_size()
        );
        Ok(pool)
    }

    /// Waits for an idle connection, opening a new one while below capacity.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        let inner = self.inner.get().await.map_err(pool_error)?;
        Ok(PoolConnection { inner })
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.inner.manager().driver
    }

    pub fn max_size(&self) -> usize {
        self.inner.status().max_size
    }
}

/// Driver errors pass through untouched so callers can still match on them.
fn pool_error(err: PoolError<Error>) -> Error {
    match err {
        PoolError::Backend(err) => err,
        err => Error::connection_pool(err),
    }
}

#[derive(Debug)]
struct ConnectionManager {
    driver: Box<dyn Driver>,
}

impl managed::Manager for ConnectionManager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Box<dyn Connection>, Error> {
        self.driver.connect().await
    }

    /// A handle dropped mid-transaction leaves its transaction open; close
    /// it before the connection is reused.
    async fn recycle(
        &self,
        connection: &mut Box<dyn Connection>,
        _: &managed::Metrics,
    ) -> RecycleResult<Error> {
        if !connection.is_in_transaction() {
            return Ok(());
        }

        log::warn!("rolling back a transaction that was neither committed nor rolled back");
        connection.rollback().await.map_err(RecycleError::Backend)
    }
}

/// A connection checked out of a [`Pool`]. Dropping it checks it back in.
#[derive(Debug)]
pub struct PoolConnection {
    inner: managed::Object<ConnectionManager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Box<dyn Connection> {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Box<dyn Connection> {
        &mut self.inner
    }
}
