mod statement_cache;
use statement_cache::StatementCache;

mod value;
pub(crate) use value::Value;

use postgres_types::ToSql;
use quarry_core::{
    async_trait,
    driver::{ColumnInfo, Driver, Flavor, Interrupt, TableInfo},
    stmt::{Rows, Value as CoreValue},
    Error, Result,
};
use std::borrow::Cow;
use tokio_postgres::{CancelToken, Client, Config, NoTls};
use url::Url;

#[derive(Debug)]
pub struct PostgreSQL {
    url: String,
    config: Config,
}

impl PostgreSQL {
    /// Creates a driver from a `postgresql://` connection URL.
    ///
    /// A `search_path` query parameter is applied to every connection.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={url_str}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url_str}"))
        })?;

        let dbname = url.path().trim_start_matches('/');
        if dbname.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url_str}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        for (key, value) in url.query_pairs() {
            match &*key {
                "search_path" => {
                    config.options(&format!("-c search_path={value}"));
                }
                "application_name" => {
                    config.application_name(&*value);
                }
                _ => log::warn!("ignoring unknown connection parameter `{key}`"),
            }
        }

        Ok(Self {
            url: url_str,
            config,
        })
    }

    /// Creates a driver from an existing [`tokio_postgres::Config`].
    pub fn with_config(config: Config) -> Self {
        Self {
            url: "postgresql://".to_string(),
            config,
        }
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn flavor(&self) -> Flavor {
        Flavor::Postgresql
    }

    async fn connect(&self) -> Result<Box<dyn quarry_core::Connection>> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                log::error!("postgresql connection error: {err}");
            }
        });

        Ok(Box::new(Connection::new(client)))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    statements: StatementCache,

    /// Set once `BEGIN` succeeds, cleared once `COMMIT` or `ROLLBACK` does
    in_transaction: bool,
}

impl Connection {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            statements: StatementCache::new(),
            in_transaction: false,
        }
    }

    async fn batch_execute(&self, sql: &str) -> Result<()> {
        log::trace!("postgresql: {sql}");
        self.client
            .batch_execute(sql)
            .await
            .map_err(Error::driver_operation_failed)
    }

    /// Resolves the schema an unqualified or qualified table name lives in,
    /// following the connection's search path.
    async fn resolve_schema(&self, schema: &str, table: &str) -> Result<Option<String>> {
        let name = quarry_sql::qualified_name(schema, table);
        let row = self
            .client
            .query_opt(
                "SELECT n.nspname::text FROM pg_catalog.pg_class c \
                 JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                 WHERE c.oid = to_regclass($1::text)",
                &[&name],
            )
            .await
            .map_err(Error::driver_operation_failed)?;

        row.map(|row| row.try_get::<_, String>(0))
            .transpose()
            .map_err(Error::driver_operation_failed)
    }
}

fn bind(params: &[CoreValue]) -> Vec<Value<'_>> {
    params.iter().map(Value::from).collect()
}

fn refs<'a>(params: &'a [Value<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
    params.iter().map(|param| param as &(dyn ToSql + Sync)).collect()
}

#[async_trait]
impl quarry_core::driver::Connection for Connection {
    async fn exec(&mut self, sql: &str, params: &[CoreValue]) -> Result<u64> {
        log::trace!("postgresql: {sql}; params={params:?}");

        let statement = self
            .statements
            .prepare(&self.client, sql)
            .await
            .map_err(Error::driver_operation_failed)?;

        let params = bind(params);
        self.client
            .execute(&statement, &refs(&params))
            .await
            .map_err(Error::driver_operation_failed)
    }

    async fn query(&mut self, sql: &str, params: &[CoreValue]) -> Result<Rows> {
        log::trace!("postgresql: {sql}; params={params:?}");

        let statement = self
            .statements
            .prepare(&self.client, sql)
            .await
            .map_err(Error::driver_operation_failed)?;

        let params = bind(params);
        let rows = self
            .client
            .query(&statement, &refs(&params))
            .await
            .map_err(Error::driver_operation_failed)?;

        let columns = statement.columns();
        let mut ret = Rows::new(columns.iter().map(|c| c.name().to_string()).collect());

        for row in &rows {
            let values = columns
                .iter()
                .enumerate()
                .map(|(index, column)| Value::from_sql(row, index, column))
                .collect::<Result<Vec<_>>>()?;
            ret.push(values);
        }

        Ok(ret)
    }

    async fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            quarry_core::bail!("a transaction is already open on this connection");
        }
        self.batch_execute("BEGIN").await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::no_active_transaction("commit"));
        }
        self.batch_execute("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::no_active_transaction("roll back"));
        }
        self.batch_execute("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }

    fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn interrupt_handle(&self) -> Option<Box<dyn Interrupt>> {
        Some(Box::new(Canceller(self.client.cancel_token())))
    }

    async fn describe_table(&mut self, schema: &str, table: &str) -> Result<Option<TableInfo>> {
        let Some(schema) = self.resolve_schema(schema, table).await? else {
            return Ok(None);
        };

        let rows = self
            .client
            .query(
                "SELECT column_name::text, data_type::text, is_nullable::text, \
                        column_default::text, character_maximum_length::int8, is_identity::text \
                 FROM information_schema.columns \
                 WHERE table_schema = $1 AND table_name = $2 \
                 ORDER BY ordinal_position",
                &[&schema, &table],
            )
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let default: Option<String> = row.try_get(3).map_err(Error::driver_operation_failed)?;
            let identity: Option<String> = row.try_get(5).map_err(Error::driver_operation_failed)?;

            columns.push(ColumnInfo {
                name: row.try_get(0).map_err(Error::driver_operation_failed)?,
                data_type: row.try_get(1).map_err(Error::driver_operation_failed)?,
                nullable: row.try_get::<_, String>(2).map_err(Error::driver_operation_failed)?
                    == "YES",
                auto_increment: identity.as_deref() == Some("YES")
                    || default.as_deref().is_some_and(|d| d.starts_with("nextval(")),
                default,
                max_length: row.try_get(4).map_err(Error::driver_operation_failed)?,
            });
        }

        let primary_key = self
            .client
            .query(
                "SELECT kcu.column_name::text \
                 FROM information_schema.table_constraints tc \
                 JOIN information_schema.key_column_usage kcu \
                   ON tc.constraint_name = kcu.constraint_name \
                  AND tc.table_schema = kcu.table_schema \
                  AND tc.table_name = kcu.table_name \
                 WHERE tc.constraint_type = 'PRIMARY KEY' \
                   AND tc.table_schema = $1 AND tc.table_name = $2 \
                 ORDER BY kcu.ordinal_position",
                &[&schema, &table],
            )
            .await
            .map_err(Error::driver_operation_failed)?
            .iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::driver_operation_failed)?;

        Ok(Some(TableInfo {
            columns,
            primary_key,
        }))
    }
}

/// Sends a cancel request for the statement the server is running on a
/// connection. The request travels over a separate connection.
struct Canceller(CancelToken);

impl std::fmt::Debug for Canceller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Canceller")
    }
}

#[async_trait]
impl Interrupt for Canceller {
    async fn interrupt(&self) -> Result<()> {
        log::debug!("postgresql: cancelling the running statement");
        self.0
            .cancel_query(NoTls)
            .await
            .map_err(Error::driver_operation_failed)
    }
}
