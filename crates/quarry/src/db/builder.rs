use super::{Config, Connect, Db, Pool};
use crate::{validate, Model, Result};

use quarry_core::{driver::Driver, schema::registry, Error};
use std::{any::TypeId, time::Duration};

#[derive(Debug, Default)]
pub struct Builder {
    /// Models registered through this builder, validated on connect
    models: Vec<(TypeId, &'static str)>,

    url: Option<String>,
    max_connections: Option<usize>,
    query_timeout: Option<Duration>,
    validate_schema: bool,
}

impl Builder {
    /// Registers `T` in the process-wide registry.
    pub fn register<T: Model>(&mut self) -> &mut Self {
        registry::register::<T>();
        self.models
            .push((TypeId::of::<T>(), std::any::type_name::<T>()));
        self
    }

    pub fn max_connections(&mut self, max_connections: usize) -> &mut Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// Sets the deadline applied to every statement.
    pub fn query_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Checks every model registered through this builder against the
    /// database before the connection is handed out.
    pub fn validate_schema(&mut self, validate_schema: bool) -> &mut Self {
        self.validate_schema = validate_schema;
        self
    }

    /// Applies settings loaded from configuration. The URL is used by
    /// [`open`](Self::open).
    pub fn config(&mut self, config: Config) -> &mut Self {
        if !config.url.is_empty() {
            self.url = Some(config.url.clone());
        }
        if config.max_connections.is_some() {
            self.max_connections = config.max_connections;
        }
        if let Some(timeout) = config.query_timeout() {
            self.query_timeout = Some(timeout);
        }
        self.validate_schema = config.validate_schema;
        self
    }

    /// Connects to the URL set through [`config`](Self::config).
    pub async fn open(&mut self) -> Result<Db> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| Error::invalid_connection_url("no connection URL configured"))?;
        self.connect(&url).await
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let pool = Pool::new(driver, self.max_connections).await?;
        let db = Db::new(pool, self.query_timeout);

        if self.validate_schema {
            self.validate(&db).await?;
        }

        Ok(db)
    }

    async fn validate(&self, db: &Db) -> Result<()> {
        let mut query = db.query().await?;

        for &(type_id, type_name) in &self.models {
            let metadata = registry::metadata_by_id(type_id)
                .ok_or_else(|| Error::model_not_registered(type_name))?;
            validate::validate_schema(&mut query, &metadata).await?;
        }

        Ok(())
    }
}
