mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait,
    driver::{ColumnInfo, Driver, Flavor, Interrupt, TableInfo},
    stmt::{Rows, Value as CoreValue},
    Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use url::Url;

/// Where a SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sqlite {
    /// A private database per connection, discarded when it closes
    Memory,

    File(PathBuf),
}

impl Sqlite {
    /// Parses `sqlite::memory:` or `sqlite:<path>`.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        if parsed.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "expected a `sqlite:` URL; url={url}"
            )));
        }

        match parsed.path() {
            ":memory:" => Ok(Sqlite::Memory),
            "" => Err(Error::invalid_connection_url(format!(
                "missing database path; url={url}"
            ))),
            path => Ok(Sqlite::File(PathBuf::from(path))),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Sqlite::File(path.into())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::Memory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => format!("sqlite:{}", path.display()).into(),
        }
    }

    fn flavor(&self) -> Flavor {
        Flavor::Sqlite
    }

    async fn connect(&self) -> Result<Box<dyn quarry_core::Connection>> {
        Ok(Box::new(match self {
            Sqlite::Memory => Connection::in_memory()?,
            Sqlite::File(path) => Connection::open(path)?,
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        // A second in-memory connection would see an empty database
        matches!(self, Sqlite::Memory).then_some(1)
    }
}

/// A SQLite connection.
///
/// rusqlite blocks the calling thread, so every call runs on tokio's
/// blocking pool. The awaiting task stays free to give up on a slow
/// statement and interrupt it.
#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
    interrupt: Interrupter,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self::new(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self::new(connection))
    }

    fn new(connection: RusqliteConnection) -> Self {
        let interrupt = Interrupter(Arc::new(connection.get_interrupt_handle()));
        Self {
            connection: Arc::new(Mutex::new(connection)),
            interrupt,
        }
    }

    async fn run<T: Send + 'static>(
        &self,
        f: impl FnOnce(&RusqliteConnection) -> Result<T> + Send + 'static,
    ) -> Result<T> {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || f(&lock(&connection)))
            .await
            .map_err(Error::driver_operation_failed)?
    }

    /// Runs `sql` if a transaction is open, whoever started it.
    async fn end_transaction(&self, sql: &'static str, action: &'static str) -> Result<()> {
        self.run(move |connection| {
            if connection.is_autocommit() {
                return Err(Error::no_active_transaction(action));
            }
            execute_batch(connection, sql)
        })
        .await
    }
}

fn lock(connection: &Mutex<RusqliteConnection>) -> MutexGuard<'_, RusqliteConnection> {
    connection.lock().unwrap_or_else(PoisonError::into_inner)
}

fn execute_batch(connection: &RusqliteConnection, sql: &str) -> Result<()> {
    log::trace!("sqlite: {sql}");
    connection
        .execute_batch(sql)
        .map_err(Error::driver_operation_failed)
}

#[async_trait]
impl quarry_core::driver::Connection for Connection {
    async fn exec(&mut self, sql: &str, params: &[CoreValue]) -> Result<u64> {
        let sql = Flavor::Sqlite.rewrite(sql);
        log::trace!("sqlite: {sql}; params={params:?}");

        let params = params.to_vec();
        self.run(move |connection| {
            let mut stmt = connection
                .prepare_cached(&sql)
                .map_err(Error::driver_operation_failed)?;

            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter().map(Value::from)))
                .map_err(Error::driver_operation_failed)?;

            Ok(count as u64)
        })
        .await
    }

    async fn query(&mut self, sql: &str, params: &[CoreValue]) -> Result<Rows> {
        let sql = Flavor::Sqlite.rewrite(sql);
        log::trace!("sqlite: {sql}; params={params:?}");

        let params = params.to_vec();
        self.run(move |connection| query_rows(connection, &sql, &params))
            .await
    }

    async fn begin(&mut self) -> Result<()> {
        self.run(|connection| execute_batch(connection, "BEGIN"))
            .await
    }

    async fn commit(&mut self) -> Result<()> {
        self.end_transaction("COMMIT", "commit").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.end_transaction("ROLLBACK", "roll back").await
    }

    fn is_in_transaction(&self) -> bool {
        !lock(&self.connection).is_autocommit()
    }

    fn interrupt_handle(&self) -> Option<Box<dyn Interrupt>> {
        Some(Box::new(self.interrupt.clone()))
    }

    async fn describe_table(&mut self, _schema: &str, table: &str) -> Result<Option<TableInfo>> {
        let table = table.to_string();
        self.run(move |connection| describe_table(connection, &table))
            .await
    }
}

/// Stops the statement running on a connection's blocking thread.
#[derive(Clone)]
struct Interrupter(Arc<rusqlite::InterruptHandle>);

impl fmt::Debug for Interrupter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interrupter")
    }
}

#[async_trait]
impl Interrupt for Interrupter {
    async fn interrupt(&self) -> Result<()> {
        self.0.interrupt();
        Ok(())
    }
}

fn query_rows(connection: &RusqliteConnection, sql: &str, params: &[CoreValue]) -> Result<Rows> {
    let mut stmt = connection
        .prepare_cached(sql)
        .map_err(Error::driver_operation_failed)?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let width = columns.len();
    let mut ret = Rows::new(columns);

    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter().map(Value::from)))
        .map_err(Error::driver_operation_failed)?;

    while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
        let values = (0..width)
            .map(|index| Value::from_sql(row, index))
            .collect::<Result<Vec<_>>>()?;
        ret.push(values);
    }

    Ok(ret)
}

fn describe_table(connection: &RusqliteConnection, table: &str) -> Result<Option<TableInfo>> {
    let mut stmt = connection
        .prepare(r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1)"#)
        .map_err(Error::driver_operation_failed)?;

    let mut columns = vec![];
    let mut pk = vec![];

    let mut rows = stmt
        .query([table])
        .map_err(Error::driver_operation_failed)?;

    while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
        let name: String = row.get(0).map_err(Error::driver_operation_failed)?;
        let declared: String = row.get(1).map_err(Error::driver_operation_failed)?;
        let not_null: bool = row.get(2).map_err(Error::driver_operation_failed)?;
        let default: Option<String> = row.get(3).map_err(Error::driver_operation_failed)?;
        let pk_position: i64 = row.get(4).map_err(Error::driver_operation_failed)?;

        let (data_type, max_length) = parse_declared_type(&declared);

        if pk_position > 0 {
            pk.push((pk_position, name.clone()));
        }

        columns.push(ColumnInfo {
            name,
            data_type,
            nullable: !not_null && pk_position == 0,
            default,
            max_length,
            auto_increment: false,
        });
    }

    if columns.is_empty() {
        return Ok(None);
    }

    pk.sort();
    let primary_key: Vec<String> = pk.into_iter().map(|(_, name)| name).collect();

    // A lone `INTEGER PRIMARY KEY` column aliases the rowid
    if let [pk] = &primary_key[..] {
        if let Some(column) = columns.iter_mut().find(|column| &column.name == pk) {
            column.auto_increment = column.data_type == "integer";
        }
    }

    Ok(Some(TableInfo {
        columns,
        primary_key,
    }))
}

/// Splits `VARCHAR(255)` into `("varchar", Some(255))`.
fn parse_declared_type(declared: &str) -> (String, Option<i64>) {
    let declared = declared.trim().to_ascii_lowercase();
    match declared.split_once('(') {
        Some((base, rest)) => {
            let max_length = rest
                .trim_end_matches(')')
                .split(',')
                .next()
                .and_then(|len| len.trim().parse().ok());
            (base.trim().to_string(), max_length)
        }
        None => (declared, None),
    }
}
