mod introspect;
pub use introspect::{ColumnInfo, TableInfo};

pub use quarry_sql::Flavor;

use crate::{async_trait, stmt::Rows, stmt::Value};

use std::{borrow::Cow, fmt::Debug};

/// Opens connections to one database.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// The SQL dialect connections of this driver speak.
    fn flavor(&self) -> Flavor;

    /// Creates a new connection to the database.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on concurrent connections, if the database imposes one.
    ///
    /// An in-memory SQLite database only exists on the connection that created it.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// A live database connection.
///
/// SQL passed in uses `$N` placeholders; connections rewrite them for their
/// own flavor.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Executes a statement and returns the number of affected rows.
    async fn exec(&mut self, sql: &str, params: &[Value]) -> crate::Result<u64>;

    /// Executes a query and buffers its result rows.
    async fn query(&mut self, sql: &str, params: &[Value]) -> crate::Result<Rows>;

    /// Starts a transaction. Fails if one is already open.
    async fn begin(&mut self) -> crate::Result<()>;

    /// Fails with [`Error::no_active_transaction`](crate::Error::no_active_transaction)
    /// when no transaction is open.
    async fn commit(&mut self) -> crate::Result<()>;

    /// Fails with [`Error::no_active_transaction`](crate::Error::no_active_transaction)
    /// when no transaction is open.
    async fn rollback(&mut self) -> crate::Result<()>;

    /// Returns `true` while a transaction is open on this connection,
    /// however it was started.
    fn is_in_transaction(&self) -> bool;

    /// A handle that aborts whatever statement this connection is running.
    ///
    /// Used when a statement misses its deadline. `None` when the driver
    /// cannot abort statements.
    fn interrupt_handle(&self) -> Option<Box<dyn Interrupt>> {
        None
    }

    /// Describes a table as the database sees it, or `None` if it does not exist.
    async fn describe_table(&mut self, schema: &str, table: &str)
        -> crate::Result<Option<TableInfo>>;
}

/// Aborts the statement running on a connection, from outside that
/// connection's own future.
#[async_trait]
pub trait Interrupt: Debug + Send + Sync + 'static {
    /// Asks the database to stop the running statement. A no-op when
    /// nothing is running.
    async fn interrupt(&self) -> crate::Result<()>;
}
