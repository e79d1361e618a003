use quarry::{db::Builder, Db, Error};

use crate::{isolation::TestSchema, ColumnTypes, Setup};

/// Runs each test in a schema of its own, selected through `search_path`
/// so unqualified table names resolve into it.
pub struct SetupPostgreSQL {
    schema: TestSchema,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            schema: TestSchema::new(),
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

fn server_url() -> String {
    std::env::var("QUARRY_TEST_POSTGRES_URL")
        .unwrap_or_else(|_| "postgresql://localhost:5432/quarry_test".to_string())
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    async fn connect(&self, builder: &mut Builder) -> quarry::Result<Db> {
        run_outside_pool(&self.schema.create_sql()).await?;

        let url = server_url();
        let separator = if url.contains('?') { '&' } else { '?' };
        builder
            .connect(&format!("{url}{separator}search_path={}", self.schema.name()))
            .await
    }

    fn types(&self) -> &ColumnTypes {
        &ColumnTypes::POSTGRESQL
    }

    async fn cleanup_my_tables(&self) -> quarry::Result<()> {
        run_outside_pool(&self.schema.drop_sql()).await
    }
}

/// Schema setup and teardown use a short-lived client of their own.
async fn run_outside_pool(sql: &str) -> quarry::Result<()> {
    let (client, connection) = tokio_postgres::connect(&server_url(), tokio_postgres::NoTls)
        .await
        .map_err(Error::driver_operation_failed)?;

    let connection = tokio::spawn(connection);
    let result = client
        .batch_execute(sql)
        .await
        .map_err(Error::driver_operation_failed);

    drop(client);
    let _ = connection.await;
    result
}
