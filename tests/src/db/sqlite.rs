use quarry::{db::Builder, Db};

use crate::{ColumnTypes, Setup};

/// A fresh in-memory database per test.
pub struct SetupSqlite;

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn connect(&self, builder: &mut Builder) -> quarry::Result<Db> {
        builder.connect("sqlite::memory:").await
    }

    fn types(&self) -> &ColumnTypes {
        &ColumnTypes::SQLITE
    }

    async fn cleanup_my_tables(&self) -> quarry::Result<()> {
        // The database goes away with its last connection
        Ok(())
    }
}
