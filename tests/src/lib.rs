#[macro_use]
mod macros;

pub mod db;
mod isolation;

// Public for macro expansion
pub use quarry_test::QuarryTest;

use quarry::{db::Builder, Db};

pub use std_util::prelude::*;

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Connects and creates `tables`, given as `CREATE TABLE` statements with
    /// `{placeholder}` column types.
    async fn setup(&self, mut builder: Builder, tables: &[&str]) -> Db {
        let db = self.connect(&mut builder).await.unwrap();

        let mut query = db.query().await.unwrap();
        for table in tables {
            query.exec(&self.ddl(table), &[]).await.unwrap();
        }

        db
    }

    async fn connect(&self, builder: &mut Builder) -> quarry::Result<Db>;

    /// Column types for this database.
    fn types(&self) -> &ColumnTypes;

    /// Fills in the column type placeholders of a `CREATE TABLE` statement.
    fn ddl(&self, sql: &str) -> String {
        let types = self.types();
        sql.replace("{serial}", types.serial)
            .replace("{timestamp}", types.timestamp)
            .replace("{json}", types.json)
            .replace("{bytes}", types.bytes)
            .replace("{uuid}", types.uuid)
            .replace("{float}", types.float)
    }

    /// Drops whatever this setup created.
    async fn cleanup_my_tables(&self) -> quarry::Result<()>;
}

/// Database-specific spellings of column types.
#[derive(Debug)]
pub struct ColumnTypes {
    /// Auto-incrementing integer primary key
    pub serial: &'static str,
    pub timestamp: &'static str,
    pub json: &'static str,
    pub bytes: &'static str,
    pub uuid: &'static str,
    pub float: &'static str,
}

impl ColumnTypes {
    pub const SQLITE: ColumnTypes = ColumnTypes {
        serial: "INTEGER PRIMARY KEY AUTOINCREMENT",
        timestamp: "TEXT",
        json: "TEXT",
        bytes: "BLOB",
        uuid: "TEXT",
        float: "REAL",
    };

    pub const POSTGRESQL: ColumnTypes = ColumnTypes {
        serial: "BIGSERIAL PRIMARY KEY",
        timestamp: "TIMESTAMPTZ",
        json: "JSONB",
        bytes: "BYTEA",
        uuid: "UUID",
        float: "DOUBLE PRECISION",
    };
}
