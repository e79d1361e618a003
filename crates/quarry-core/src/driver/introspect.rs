/// A table as reported by the database catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableInfo {
    /// Columns in ordinal order
    pub columns: Vec<ColumnInfo>,

    /// Primary key columns in key order
    pub primary_key: Vec<String>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    pub name: String,

    /// Declared type, lower case (`integer`, `character varying`, `jsonb`, ...)
    pub data_type: String,

    pub nullable: bool,

    /// Default expression, if any
    pub default: Option<String>,

    pub max_length: Option<i64>,

    /// The database generates values for this column (sequence default,
    /// identity column or SQLite rowid alias).
    pub auto_increment: bool,
}
