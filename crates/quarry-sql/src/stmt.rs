//! Statements rendered per call on top of [`SqlTemplates`](crate::SqlTemplates).

use crate::placeholders;

/// Appends `RETURNING c1,c2`. Without columns the statement is returned as is.
pub fn returning(sql: &str, columns: &[String]) -> String {
    if columns.is_empty() {
        return sql.to_string();
    }
    format!("{sql} RETURNING {}", columns.join(","))
}

/// `<insert> ON CONFLICT (c) DO NOTHING RETURNING ...`
pub fn upsert_do_nothing(insert: &str, conflict: &[String], returning_columns: &[String]) -> String {
    returning(
        &format!("{insert} ON CONFLICT ({}) DO NOTHING", conflict.join(",")),
        returning_columns,
    )
}

/// `<insert> ON CONFLICT (c) DO UPDATE SET a=EXCLUDED.a RETURNING ...`
///
/// Returns `None` when there is nothing to assign, since an empty `SET` list
/// is not valid SQL.
pub fn upsert_do_update(
    insert: &str,
    conflict: &[String],
    update_columns: &[String],
    returning_columns: &[String],
) -> Option<String> {
    if update_columns.is_empty() {
        return None;
    }

    let assignments = update_columns
        .iter()
        .map(|column| format!("{column}=EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(",");

    Some(returning(
        &format!(
            "{insert} ON CONFLICT ({}) DO UPDATE SET {assignments}",
            conflict.join(",")
        ),
        returning_columns,
    ))
}

/// `SELECT c1,c2 FROM t WHERE k1 = $1 AND k2 = $2`
pub fn select_where(columns: &[String], table_name: &str, keys: &[String]) -> String {
    let select = format!("SELECT {} FROM {table_name}", columns.join(","));
    if keys.is_empty() {
        return select;
    }

    let conditions = keys
        .iter()
        .enumerate()
        .map(|(i, key)| format!("{key} = ${}", i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");

    format!("{select} WHERE {conditions}")
}

/// Deletes `rows` rows by key in a single statement.
///
/// A single key column renders `WHERE pk IN ($1,$2)`. Composite keys use a
/// row-value list: `WHERE (a,b) IN (($1,$2),($3,$4))`. Returns `None` when
/// there is no key or no row to delete.
pub fn delete_in(table_name: &str, pk_columns: &[String], rows: usize) -> Option<String> {
    if pk_columns.is_empty() || rows == 0 {
        return None;
    }

    if let [pk] = pk_columns {
        return Some(format!(
            "DELETE FROM {table_name} WHERE {pk} IN ({})",
            placeholders(1, rows)
        ));
    }

    let width = pk_columns.len();
    let tuples = (0..rows)
        .map(|row| format!("({})", placeholders(row * width + 1, width)))
        .collect::<Vec<_>>()
        .join(",");

    Some(format!(
        "DELETE FROM {table_name} WHERE ({}) IN ({tuples})",
        pk_columns.join(",")
    ))
}

/// Wraps a query in an existence check: `SELECT EXISTS(<query>)`.
pub fn exists(query: &str) -> String {
    format!("SELECT EXISTS({query})")
}
