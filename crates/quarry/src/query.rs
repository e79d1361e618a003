use crate::{db::PoolConnection, Result};

use indexmap::IndexMap;
use quarry_core::{
    driver::{Connection, Interrupt, TableInfo},
    scan::RawScanner,
    stmt::{Rows, Value},
    Error, FieldType, Fields,
};
use std::{future::Future, time::Duration};

/// One pooled connection, optionally inside a transaction.
///
/// Every CRUD helper takes the handle explicitly. A transactional handle is
/// closed exactly once, by [`commit`](Self::commit) or
/// [`rollback`](Self::rollback), both of which consume it.
///
/// Each statement runs under the handle's deadline, if it has one. A
/// statement that misses its deadline is aborted in the database and fails
/// with [`Error::query_timed_out`].
#[derive(Debug)]
pub struct Query {
    connection: PoolConnection,
    transactional: bool,
    timeout: Option<Duration>,
}

impl Query {
    pub(crate) fn new(
        connection: PoolConnection,
        transactional: bool,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            connection,
            transactional,
            timeout,
        }
    }

    /// `true` for handles created by [`Db::begin`](crate::Db::begin).
    pub fn is_transaction(&self) -> bool {
        self.transactional
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Replaces the deadline applied to each following statement.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Runs a query that returns a single integer, such as `SELECT COUNT(*)`.
    pub async fn count(&mut self, sql: &str, args: &[Value]) -> Result<i64> {
        let rows = self.query(sql, args).await?;
        RawScanner::scan_value(rows)
    }

    /// Returns `true` when `sql` matches at least one row.
    ///
    /// The query is wrapped in `SELECT EXISTS(...)`.
    pub async fn exists(&mut self, sql: &str, args: &[Value]) -> Result<bool> {
        let rows = self.query(&quarry_sql::stmt::exists(sql), args).await?;
        RawScanner::scan_value(rows)
    }

    /// Scans the first row into a `T`, matching columns by name.
    ///
    /// Fails with [`Error::record_not_found`] when there is no row.
    pub async fn query_row<T: Fields + Default>(&mut self, sql: &str, args: &[Value]) -> Result<T> {
        let rows = self.query(sql, args).await?;
        RawScanner::scan_struct(rows)
    }

    /// Scans every row into a `T`, matching columns by name.
    pub async fn query_rows<T: Fields + Default>(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<T>> {
        let rows = self.query(sql, args).await?;
        RawScanner::scan_slice(rows)
    }

    /// Returns the first row keyed by column name.
    pub async fn query_map(&mut self, sql: &str, args: &[Value]) -> Result<IndexMap<String, Value>> {
        let rows = self.query(sql, args).await?;
        RawScanner::scan_map(rows)
    }

    /// Reads the first column of the first row.
    pub async fn query_value<T: FieldType>(&mut self, sql: &str, args: &[Value]) -> Result<T> {
        let rows = self.query(sql, args).await?;
        RawScanner::scan_value(rows)
    }

    /// Runs a query and returns its rows as the driver produced them.
    pub async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Rows> {
        let (timeout, interrupt) = self.armed_deadline();
        deadline(timeout, interrupt, self.connection.query(sql, args)).await
    }

    /// Runs a statement and returns the number of affected rows.
    pub async fn exec(&mut self, sql: &str, args: &[Value]) -> Result<u64> {
        let (timeout, interrupt) = self.armed_deadline();
        deadline(timeout, interrupt, self.connection.exec(sql, args)).await
    }

    /// Describes `table` or `schema.table`, `None` when it does not exist.
    pub async fn describe_table(&mut self, table_name: &str) -> Result<Option<TableInfo>> {
        let (schema, table) = quarry_sql::split_table_name(table_name);
        let (timeout, interrupt) = self.armed_deadline();
        deadline(timeout, interrupt, self.connection.describe_table(&schema, &table)).await
    }

    pub async fn commit(mut self) -> Result<()> {
        if !self.transactional {
            return Err(Error::no_active_transaction("commit"));
        }
        self.connection().commit().await
    }

    pub async fn rollback(mut self) -> Result<()> {
        if !self.transactional {
            return Err(Error::no_active_transaction("roll back"));
        }
        self.connection().rollback().await
    }

    pub(crate) fn connection(&mut self) -> &mut dyn Connection {
        &mut **self.connection
    }

    fn armed_deadline(&self) -> (Option<Duration>, Option<Box<dyn Interrupt>>) {
        let interrupt = self
            .timeout
            .and_then(|_| self.connection.interrupt_handle());
        (self.timeout, interrupt)
    }
}

/// Awaits `fut` for at most `timeout`. On expiry the future is dropped and
/// the statement it started is interrupted before the error is returned, so
/// the connection is free for the next statement.
async fn deadline<T>(
    timeout: Option<Duration>,
    interrupt: Option<Box<dyn Interrupt>>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(duration) = timeout else {
        return fut.await;
    };

    match tokio::time::timeout(duration, fut).await {
        Ok(res) => res,
        Err(_) => {
            if let Some(interrupt) = interrupt {
                if let Err(err) = interrupt.interrupt().await {
                    log::warn!("failed to interrupt a statement past its deadline: {err}");
                }
            }
            Err(Error::query_timed_out(duration))
        }
    }
}
