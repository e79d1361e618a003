//! Generic create/read/update/delete over registered models.

use crate::{Query, Result};

use quarry_core::{
    schema::{registry, Model, ModelMetadata},
    scan::Scanner,
    stmt::Value,
    Error,
};
use quarry_sql::{stmt, CREATED_AT};
use std::{marker::PhantomData, sync::Arc};

/// CRUD operations for one model type.
///
/// Statements come from the model's precomputed templates. Every operation
/// runs on the [`Query`] it is handed, so several operations share a
/// transaction by sharing the handle.
#[derive(Debug)]
pub struct Crud<T> {
    metadata: Arc<ModelMetadata>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for Crud<T> {
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            _model: PhantomData,
        }
    }
}

impl<T: Model> Crud<T> {
    /// Looks up the registered metadata of `T`.
    pub fn new() -> Result<Self> {
        registry::metadata::<T>()
            .map(Self::from_metadata)
            .ok_or_else(|| Error::model_not_registered(std::any::type_name::<T>()))
    }

    /// Uses `metadata` instead of the registry's current entry.
    pub fn from_metadata(metadata: Arc<ModelMetadata>) -> Self {
        Self {
            metadata,
            _model: PhantomData,
        }
    }

    pub fn metadata(&self) -> &Arc<ModelMetadata> {
        &self.metadata
    }

    /// Inserts `entity`.
    ///
    /// When the database generates the key, it is written back into
    /// `entity`.
    pub async fn create(&self, query: &mut Query, entity: &mut T) -> Result<()> {
        let values = self.metadata.extract_values(&*entity)?;
        let insert = &self.metadata.templates.insert;

        if !self.metadata.has_auto_primary_key() {
            query.exec(insert, &values).await?;
            return Ok(());
        }

        let sql = stmt::returning(insert, &self.metadata.pk_columns);
        let row = query
            .query(&sql, &values)
            .await?
            .into_first()
            .ok_or_else(|| Error::record_not_found(format!("table={}", self.metadata.table)))?;
        self.metadata.set_pk(entity, row.into_values())
    }

    /// Inserts every entity with one statement.
    ///
    /// With a primary key, the statement returns the key of each inserted row
    /// and row *i* is written back into `entities[i]`. This relies on the
    /// database returning rows in insertion order, which PostgreSQL and
    /// SQLite do for a single multi-row `VALUES` insert.
    pub async fn create_multiple(&self, query: &mut Query, entities: &mut [T]) -> Result<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let Some(batch) = self.metadata.templates.batch_insert(entities.len()) else {
            // `DEFAULT VALUES` inserts a single row per statement
            for entity in entities.iter_mut() {
                self.create(query, entity).await?;
            }
            return Ok(());
        };

        let mut values = Vec::with_capacity(entities.len() * self.metadata.insert_indices.len());
        for entity in entities.iter() {
            values.extend(self.metadata.extract_values(entity)?);
        }

        if !self.metadata.has_primary_key() {
            query.exec(&batch, &values).await?;
            return Ok(());
        }

        let sql = stmt::returning(&batch, &self.metadata.pk_columns);
        let rows = query.query(&sql, &values).await?;

        if rows.len() != entities.len() {
            quarry_core::bail!(
                "inserted {} rows into `{}` but {} keys were returned",
                entities.len(),
                self.metadata.table,
                rows.len()
            );
        }

        for (entity, row) in entities.iter_mut().zip(rows) {
            self.metadata.set_pk(entity, row.into_values())?;
        }
        Ok(())
    }

    /// Updates the row of `entity`, matched by primary key. Returns the
    /// number of rows changed.
    pub async fn update(&self, query: &mut Query, entity: &T) -> Result<u64> {
        let sql = self.update_sql()?;
        let values = self.metadata.extract_update_values(entity)?;
        query.exec(sql, &values).await
    }

    /// Updates each entity in turn, stopping at the first failure.
    ///
    /// Each update is its own statement. Updates that ran before a failure
    /// stay applied; run inside a transaction to make the batch atomic.
    pub async fn update_multiple(&self, query: &mut Query, entities: &[T]) -> Result<u64> {
        let sql = self.update_sql()?;
        let mut changed = 0;
        for entity in entities {
            let values = self.metadata.extract_update_values(entity)?;
            changed += query.exec(sql, &values).await?;
        }
        Ok(changed)
    }

    /// Deletes the row of `entity`, matched by primary key.
    pub async fn delete(&self, query: &mut Query, entity: &T) -> Result<u64> {
        let values = self.metadata.extract_pk(entity, "delete")?;
        let sql = self
            .metadata
            .templates
            .delete
            .as_deref()
            .ok_or_else(|| self.missing_primary_key("delete"))?;
        query.exec(sql, &values).await
    }

    /// Deletes the rows of every entity with one statement.
    pub async fn delete_multiple(&self, query: &mut Query, entities: &[T]) -> Result<u64> {
        if entities.is_empty() {
            return Ok(0);
        }

        let sql = stmt::delete_in(
            &self.metadata.templates.table_name,
            &self.metadata.pk_columns,
            entities.len(),
        )
        .ok_or_else(|| self.missing_primary_key("delete_multiple"))?;

        let mut values = Vec::with_capacity(entities.len() * self.metadata.pk_columns.len());
        for entity in entities {
            values.extend(self.metadata.extract_pk(entity, "delete_multiple")?);
        }

        query.exec(&sql, &values).await
    }

    /// Loads the row whose single-column primary key equals `pk`.
    ///
    /// Fails with [`Error::record_not_found`] when there is no such row.
    pub async fn find_by_pk(&self, query: &mut Query, pk: impl Into<Value>) -> Result<T> {
        if self.metadata.pk_columns.len() > 1 {
            quarry_core::bail!(
                "`{}` has a composite primary key; use `find_by_key`",
                self.metadata.table
            );
        }
        self.find_by_key(query, vec![pk.into()]).await
    }

    /// Loads the row whose primary key equals `key`, one value per key
    /// column.
    pub async fn find_by_key(&self, query: &mut Query, key: Vec<Value>) -> Result<T> {
        let sql = self
            .metadata
            .templates
            .select_by_pk
            .as_deref()
            .ok_or_else(|| self.missing_primary_key("find_by_pk"))?;

        if key.len() != self.metadata.pk_columns.len() {
            quarry_core::bail!(
                "`{}` has {} key columns, got {} values",
                self.metadata.table,
                self.metadata.pk_columns.len(),
                key.len()
            );
        }

        let rows = query.query(sql, &key).await?;
        Scanner::new(&self.metadata).scan_one(rows)
    }

    /// Runs caller-supplied SQL and scans every row into a `T`.
    pub async fn find_by_query(&self, query: &mut Query, sql: &str, args: &[Value]) -> Result<Vec<T>> {
        let rows = query.query(sql, args).await?;
        Scanner::new(&self.metadata).scan_rows(rows)
    }

    pub async fn find_all(&self, query: &mut Query) -> Result<Vec<T>> {
        let rows = query.query(&self.metadata.templates.select_all, &[]).await?;
        Scanner::new(&self.metadata).scan_rows(rows)
    }

    /// Inserts `entity`, or resolves a conflict on `conflict_columns`.
    ///
    /// - Without conflict columns this is [`create`](Self::create).
    /// - When [`Model::update_columns`] is `Some(&[])`, a conflicting row is
    ///   left untouched and loaded into `entity` instead.
    /// - Otherwise the conflicting row is updated, either with the model's
    ///   update columns or with every inserted column except the conflict
    ///   columns and `created_at`.
    ///
    /// In every case `entity` ends up holding the row as stored.
    pub async fn upsert(
        &self,
        query: &mut Query,
        entity: &mut T,
        conflict_columns: &[&str],
    ) -> Result<()> {
        if conflict_columns.is_empty() {
            return self.create(query, entity).await;
        }

        let conflict: Vec<String> = conflict_columns.iter().map(|c| c.to_string()).collect();
        let values = self.metadata.extract_values(&*entity)?;
        let templates = &self.metadata.templates;
        let returning = templates.all_columns();

        let update_columns: Vec<String> = match self.metadata.update_columns {
            Some(columns) => columns.iter().map(|c| c.to_string()).collect(),
            None => templates
                .insert_columns()
                .iter()
                .filter(|column| !conflict.contains(column) && column.as_str() != CREATED_AT)
                .cloned()
                .collect(),
        };

        if let Some(sql) =
            stmt::upsert_do_update(&templates.insert, &conflict, &update_columns, returning)
        {
            let rows = query.query(&sql, &values).await?;
            *entity = Scanner::new(&self.metadata).scan_one(rows)?;
            return Ok(());
        }

        let sql = stmt::upsert_do_nothing(&templates.insert, &conflict, returning);
        let rows = query.query(&sql, &values).await?;
        if !rows.is_empty() {
            *entity = Scanner::new(&self.metadata).scan_one(rows)?;
            return Ok(());
        }

        // The row already existed and was left alone; load it
        let key = self.conflict_values(&conflict, &values)?;
        let sql = stmt::select_where(returning, &templates.table_name, &conflict);
        let rows = query.query(&sql, &key).await?;
        *entity = Scanner::new(&self.metadata).scan_one(rows)?;
        Ok(())
    }

    /// Picks the values bound to `conflict` out of the insert values.
    fn conflict_values(&self, conflict: &[String], values: &[Value]) -> Result<Vec<Value>> {
        let insert_columns = self.metadata.templates.insert_columns();
        conflict
            .iter()
            .map(|column| {
                insert_columns
                    .iter()
                    .position(|c| c == column)
                    .and_then(|i| values.get(i).cloned())
                    .ok_or_else(|| {
                        quarry_core::err!(
                            "conflict column `{column}` is not inserted into `{}`",
                            self.metadata.table
                        )
                    })
            })
            .collect()
    }

    fn update_sql(&self) -> Result<&str> {
        if !self.metadata.has_primary_key() {
            return Err(self.missing_primary_key("update"));
        }
        self.metadata.templates.update.as_deref().ok_or_else(|| {
            quarry_core::err!(
                "`{}` has no columns to update besides its key",
                self.metadata.table
            )
        })
    }

    fn missing_primary_key(&self, operation: &'static str) -> Error {
        Error::missing_primary_key(&self.metadata.table, operation)
    }
}
