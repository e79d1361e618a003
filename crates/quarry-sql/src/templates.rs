use crate::{placeholders, qualified_name};

/// Column never rewritten by the update template.
pub const CREATED_AT: &str = "created_at";

/// Parameterized statements rendered once per model.
///
/// Templates that need a primary key are `None` when the model has none, and
/// `update` is `None` when every column is either part of the key or
/// `created_at`. Callers turn a missing template into an error instead of
/// executing malformed SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTemplates {
    /// Table name as statements address it
    pub table_name: String,

    /// `INSERT INTO t (c1,c2) VALUES ($1,$2)`
    pub insert: String,

    /// `UPDATE t SET c2=$2,c3=$3 WHERE pk=$1`, key values bound first
    pub update: Option<String>,

    /// `DELETE FROM t WHERE pk=$1`
    pub delete: Option<String>,

    /// `SELECT c1,c2 FROM t WHERE pk=$1`
    pub select_by_pk: Option<String>,

    /// `SELECT c1,c2 FROM t`
    pub select_all: String,

    insert_columns: Vec<String>,
    update_columns: Vec<String>,
    pk_columns: Vec<String>,
    all_columns: Vec<String>,
}

impl SqlTemplates {
    pub fn build(
        schema: &str,
        table: &str,
        insert_columns: &[String],
        all_columns: &[String],
        pk_columns: &[String],
    ) -> Self {
        let table_name = qualified_name(schema, table);

        let update_columns: Vec<String> = all_columns
            .iter()
            .filter(|column| !pk_columns.contains(column) && column.as_str() != CREATED_AT)
            .cloned()
            .collect();

        let insert = insert_sql(&table_name, insert_columns);

        let pk_condition = (!pk_columns.is_empty()).then(|| key_condition(pk_columns, 1));

        let update = pk_condition
            .as_ref()
            .filter(|_| !update_columns.is_empty())
            .map(|condition| {
                let first = pk_columns.len() + 1;
                let pairs = update_columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| format!("{column}=${}", first + i))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("UPDATE {table_name} SET {pairs} WHERE {condition}")
            });

        let delete = pk_condition
            .as_ref()
            .map(|condition| format!("DELETE FROM {table_name} WHERE {condition}"));

        let select_by_pk = pk_condition.as_ref().map(|condition| {
            format!(
                "SELECT {} FROM {table_name} WHERE {condition}",
                all_columns.join(",")
            )
        });

        let select_all = format!("SELECT {} FROM {table_name}", all_columns.join(","));

        Self {
            table_name,
            insert,
            update,
            delete,
            select_by_pk,
            select_all,
            insert_columns: insert_columns.to_vec(),
            update_columns,
            pk_columns: pk_columns.to_vec(),
            all_columns: all_columns.to_vec(),
        }
    }

    /// Renders a multi-row insert for `count` rows.
    ///
    /// Rendered per call since the placeholder count depends on `count`.
    /// Returns `None` for zero rows, and for more than one row of a model
    /// with no insertable columns (`DEFAULT VALUES` takes a single row).
    pub fn batch_insert(&self, count: usize) -> Option<String> {
        match (count, self.insert_columns.is_empty()) {
            (0, _) => None,
            (1, _) => Some(self.insert.clone()),
            (_, true) => None,
            (count, false) => {
                let width = self.insert_columns.len();
                let groups = (0..count)
                    .map(|row| format!("({})", placeholders(row * width + 1, width)))
                    .collect::<Vec<_>>()
                    .join(",");
                Some(format!(
                    "INSERT INTO {} ({}) VALUES {groups}",
                    self.table_name,
                    self.insert_columns.join(",")
                ))
            }
        }
    }

    /// Columns bound by `insert`, in bind order.
    pub fn insert_columns(&self) -> &[String] {
        &self.insert_columns
    }

    /// Columns assigned by `update`, in bind order after the key.
    pub fn update_columns(&self) -> &[String] {
        &self.update_columns
    }

    pub fn pk_columns(&self) -> &[String] {
        &self.pk_columns
    }

    pub fn all_columns(&self) -> &[String] {
        &self.all_columns
    }
}

fn insert_sql(table_name: &str, columns: &[String]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {table_name} DEFAULT VALUES");
    }

    format!(
        "INSERT INTO {table_name} ({}) VALUES ({})",
        columns.join(","),
        placeholders(1, columns.len())
    )
}

/// `a=$1 AND b=$2`
fn key_condition(columns: &[String], start: usize) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column}=${}", start + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}
