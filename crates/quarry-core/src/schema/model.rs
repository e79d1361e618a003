use super::{parse_fields, FieldMetadata, Fields};
use crate::{
    scan::Scanner,
    stmt::{Row, Rows, Value},
    Error, Result,
};

use quarry_sql::{split_table_name, SqlTemplates, DEFAULT_SCHEMA};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

/// Key column assumed when a model tags no field `pk`.
const DEFAULT_ID_COLUMN: &str = "id";

/// A struct mapped to one database table.
///
/// Usually derived with `#[derive(Model)]`, which also implements [`Fields`].
/// Both capabilities are optional and set through `#[model(...)]`.
pub trait Model: Fields + Default + Send + Sync {
    /// `table` or `schema.table`. Defaults to the pluralized type name.
    fn table_name() -> Option<&'static str> {
        None
    }

    /// Columns an upsert assigns on conflict.
    ///
    /// `None` assigns every inserted column except the conflict columns and
    /// `created_at`. `Some(&[])` leaves a conflicting row untouched.
    fn update_columns() -> Option<&'static [&'static str]> {
        None
    }
}

/// Everything Quarry knows about a registered model, computed once.
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub type_name: &'static str,

    pub type_id: TypeId,

    pub schema: String,

    pub table: String,

    /// Column-backed fields in declaration order, embedded fields flattened
    pub fields: Vec<FieldMetadata>,

    /// Column name to index in `fields`
    pub field_map: HashMap<String, usize>,

    pub pk_columns: Vec<String>,

    /// The single key column, `id` when the model declares no key
    pub id_column: String,

    pub templates: SqlTemplates,

    /// Indices into `fields` of the columns `templates.insert` binds
    pub insert_indices: Vec<usize>,

    pub update_columns: Option<&'static [&'static str]>,
}

impl ModelMetadata {
    pub fn build<T: Model>() -> ModelMetadata {
        let type_name = std::any::type_name::<T>();
        let (schema, table) = match T::table_name() {
            Some(name) => split_table_name(name),
            None => (DEFAULT_SCHEMA.to_string(), default_table_name(type_name)),
        };

        let parsed = parse_fields(T::fields());
        let mut fields = parsed.fields;

        // Without a tagged key, a column named `id` is the key
        if parsed.pk_index.is_none() {
            if let Some(field) = fields
                .iter_mut()
                .find(|field| field.column == DEFAULT_ID_COLUMN)
            {
                field.pk = true;
            }
        }

        ModelMetadata::new(
            type_name,
            TypeId::of::<T>(),
            schema,
            table,
            fields,
            T::update_columns(),
        )
    }

    fn new(
        type_name: &'static str,
        type_id: TypeId,
        schema: String,
        table: String,
        fields: Vec<FieldMetadata>,
        update_columns: Option<&'static [&'static str]>,
    ) -> ModelMetadata {
        let field_map = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.column.clone(), i))
            .collect();

        let pk_columns: Vec<String> = fields
            .iter()
            .filter(|field| field.pk)
            .map(|field| field.column.clone())
            .collect();

        let id_column = pk_columns
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_ID_COLUMN.to_string());

        let insert_indices: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.auto_increment)
            .map(|(i, _)| i)
            .collect();

        let insert_columns: Vec<String> = insert_indices
            .iter()
            .map(|&i| fields[i].column.clone())
            .collect();

        let all_columns: Vec<String> = fields.iter().map(|field| field.column.clone()).collect();

        let templates =
            SqlTemplates::build(&schema, &table, &insert_columns, &all_columns, &pk_columns);

        ModelMetadata {
            type_name,
            type_id,
            schema,
            table,
            fields,
            field_map,
            pk_columns,
            id_column,
            templates,
            insert_indices,
            update_columns,
        }
    }

    /// Returns a copy keyed on `pk_columns` instead of the declared key, with
    /// templates rendered again.
    ///
    /// Columns the model does not map are ignored.
    pub fn with_primary_key(&self, pk_columns: &[String]) -> ModelMetadata {
        let mut fields = self.fields.clone();
        for field in &mut fields {
            field.pk = pk_columns.contains(&field.column);
        }

        ModelMetadata::new(
            self.type_name,
            self.type_id,
            self.schema.clone(),
            self.table.clone(),
            fields,
            self.update_columns,
        )
    }

    pub fn field(&self, column: &str) -> Option<&FieldMetadata> {
        self.field_map.get(column).map(|&i| &self.fields[i])
    }

    pub fn has_primary_key(&self) -> bool {
        !self.pk_columns.is_empty()
    }

    /// `true` when the database generates the key on insert.
    pub fn has_auto_primary_key(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.pk && field.auto_increment)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.column.clone()).collect()
    }

    /// Values for `templates.insert`, in bind order.
    pub fn extract_values(&self, model: &dyn Any) -> Result<Vec<Value>> {
        self.insert_indices
            .iter()
            .map(|&i| self.fields[i].extract(model))
            .collect()
    }

    /// Values for `templates.update`: the key first, then the assigned columns.
    pub fn extract_update_values(&self, model: &dyn Any) -> Result<Vec<Value>> {
        let mut values = self.extract_pk(model, "update")?;
        for column in self.templates.update_columns() {
            values.push(self.extract_column(model, column)?);
        }
        Ok(values)
    }

    /// The key values of `model`, one per key column.
    pub fn extract_pk(&self, model: &dyn Any, operation: &'static str) -> Result<Vec<Value>> {
        if !self.has_primary_key() {
            return Err(Error::missing_primary_key(&self.table, operation));
        }

        self.pk_columns
            .iter()
            .map(|column| self.extract_column(model, column))
            .collect()
    }

    pub fn extract_column(&self, model: &dyn Any, column: &str) -> Result<Value> {
        self.field(column)
            .ok_or_else(|| Error::missing_column(&self.table, column))?
            .extract(model)
    }

    /// Writes generated key values back into `model`.
    pub fn set_pk(&self, model: &mut dyn Any, values: Vec<Value>) -> Result<()> {
        if values.len() != self.pk_columns.len() {
            crate::bail!(
                "expected {} key values for `{}`, got {}",
                self.pk_columns.len(),
                self.table,
                values.len()
            );
        }

        for (column, value) in self.pk_columns.iter().zip(values) {
            self.set_column(model, column, value)?;
        }
        Ok(())
    }

    pub fn set_column(&self, model: &mut dyn Any, column: &str, value: Value) -> Result<()> {
        self.field(column)
            .ok_or_else(|| Error::missing_column(&self.table, column))?
            .assign(model, value)
    }

    /// Scans one row into a new `T`.
    pub fn scan_row<T: Model>(&self, row: &Row) -> Result<T> {
        self.check_type::<T>()?;
        let mut model = T::default();
        Scanner::new(self).scan_row(row, &mut model)?;
        Ok(model)
    }

    /// Scans every row into a new `T`.
    pub fn scan_rows<T: Model>(&self, rows: Rows) -> Result<Vec<T>> {
        self.check_type::<T>()?;
        Scanner::new(self).scan_rows(rows)
    }

    fn check_type<T: 'static>(&self) -> Result<()> {
        if self.type_id != TypeId::of::<T>() {
            crate::bail!(
                "metadata for `{}` cannot scan into `{}`",
                self.type_name,
                std::any::type_name::<T>()
            );
        }
        Ok(())
    }
}

/// `app::models::OrderItem` maps to `order_items` and `Person` to `people`.
fn default_table_name(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.rsplit("::").next().unwrap_or(base);
    std_util::str::pluralize(&std_util::str::snake_case(base))
}
