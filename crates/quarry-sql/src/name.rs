/// Schema assumed when a table name carries no schema qualifier.
pub const DEFAULT_SCHEMA: &str = "public";

/// Splits `schema.table` into its parts. A bare table name gets [`DEFAULT_SCHEMA`].
pub fn split_table_name(name: &str) -> (String, String) {
    match name.split_once('.') {
        Some((schema, table)) if !schema.is_empty() => (schema.to_string(), table.to_string()),
        Some((_, table)) => (DEFAULT_SCHEMA.to_string(), table.to_string()),
        None => (DEFAULT_SCHEMA.to_string(), name.to_string()),
    }
}

/// The name statements address a table by.
///
/// The default schema is left implicit so unqualified names resolve through
/// the connection's search path.
pub fn qualified_name(schema: &str, table: &str) -> String {
    if schema.is_empty() || schema == DEFAULT_SCHEMA {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}
