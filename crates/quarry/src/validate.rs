//! Checks model metadata against the live database schema.
//!
//! Validation is advisory: apart from a missing table, every mismatch is
//! logged and reported but does not fail. A model that declares no primary
//! key adopts the key the database declares.

use crate::{Query, Result};

use quarry_core::{
    driver::{ColumnInfo, TableInfo},
    schema::{registry, FieldMetadata, ModelMetadata},
    ty::{Primitive, Shape, TypeInfo},
    Error,
};
use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub model: &'static str,

    /// Table name as statements address it
    pub table: String,

    pub issues: Vec<ValidationIssue>,

    /// Metadata installed in the registry when the model adopted the
    /// database's primary key
    pub adopted: Option<Arc<ModelMetadata>>,
}

impl ValidationReport {
    /// `true` when the model matches the database.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A mapped column does not exist
    MissingColumn { column: String },

    /// The column accepts NULL but the field cannot hold it
    NullableColumn { column: String },

    TypeMismatch {
        column: String,
        rust_type: &'static str,
        db_type: String,
    },

    /// The database generates the column but the field is not tagged `auto`
    UndeclaredAutoIncrement { column: String },

    PrimaryKeyMismatch {
        model: Vec<String>,
        database: Vec<String>,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingColumn { column } => {
                write!(f, "column `{column}` not found")
            }
            ValidationIssue::NullableColumn { column } => write!(
                f,
                "column `{column}` is nullable in the database but required by the model"
            ),
            ValidationIssue::TypeMismatch {
                column,
                rust_type,
                db_type,
            } => write!(
                f,
                "potential type mismatch for column `{column}`: Rust type `{rust_type}`, database type `{db_type}`"
            ),
            ValidationIssue::UndeclaredAutoIncrement { column } => write!(
                f,
                "column `{column}` is generated by the database but not tagged `auto`"
            ),
            ValidationIssue::PrimaryKeyMismatch { model, database } => write!(
                f,
                "primary key mismatch: model {model:?}, database {database:?}"
            ),
        }
    }
}

/// Checks `metadata` against the table it maps.
///
/// Fails only when the table does not exist.
pub async fn validate_schema(
    query: &mut Query,
    metadata: &ModelMetadata,
) -> Result<ValidationReport> {
    let table_name = &metadata.templates.table_name;
    let table = query.describe_table(table_name).await?.ok_or_else(|| {
        Error::invalid_schema(format!(
            "table `{table_name}` of `{}` does not exist in the database",
            metadata.type_name
        ))
    })?;

    let mut report = ValidationReport {
        model: metadata.type_name,
        table: table_name.clone(),
        issues: vec![],
        adopted: None,
    };

    for field in &metadata.fields {
        match table.column(&field.column) {
            Some(column) => check_column(field, column, &mut report.issues),
            None => report.issues.push(ValidationIssue::MissingColumn {
                column: field.column.clone(),
            }),
        }
    }

    check_primary_key(metadata, &table, &mut report);

    for issue in &report.issues {
        log::warn!("`{table_name}`: {issue}");
    }

    Ok(report)
}

fn check_column(field: &FieldMetadata, column: &ColumnInfo, issues: &mut Vec<ValidationIssue>) {
    if column.nullable && !field.nullable && !field.ty.is_option() {
        issues.push(ValidationIssue::NullableColumn {
            column: field.column.clone(),
        });
    }

    if !is_type_compatible(&field.ty, &column.data_type) {
        issues.push(ValidationIssue::TypeMismatch {
            column: field.column.clone(),
            rust_type: field.ty.name,
            db_type: column.data_type.clone(),
        });
    }

    if column.auto_increment && field.pk && !field.auto_increment {
        issues.push(ValidationIssue::UndeclaredAutoIncrement {
            column: field.column.clone(),
        });
    }
}

fn check_primary_key(metadata: &ModelMetadata, table: &TableInfo, report: &mut ValidationReport) {
    if metadata.pk_columns == table.primary_key {
        return;
    }

    let mappable = table
        .primary_key
        .iter()
        .all(|column| metadata.field(column).is_some());

    if metadata.pk_columns.is_empty() && !table.primary_key.is_empty() && mappable {
        log::info!(
            "using database primary key {:?} for `{}`",
            table.primary_key,
            report.table
        );
        let adopted = registry::replace(metadata.with_primary_key(&table.primary_key));
        report.adopted = Some(adopted);
        return;
    }

    report.issues.push(ValidationIssue::PrimaryKeyMismatch {
        model: metadata.pk_columns.clone(),
        database: table.primary_key.clone(),
    });
}

/// Whether a column of `db_type` can plausibly hold a field of type `ty`.
///
/// Matching is by substring, so `character varying(255)` and SQLite's
/// free-form declared types are covered. Types with custom conversions are
/// always accepted.
fn is_type_compatible(ty: &TypeInfo, db_type: &str) -> bool {
    let db_type = db_type.to_ascii_lowercase();

    let accepted: &[&str] = match &ty.shape {
        Shape::Option(inner, _) => return is_type_compatible(inner, &db_type),
        Shape::Opaque => return true,
        Shape::Primitive(Primitive::String) => &["char", "text", "uuid", "clob", "name"],
        Shape::Primitive(Primitive::I64) | Shape::Scalar(_) => {
            &["int", "serial", "numeric", "decimal", "real", "double", "float"]
        }
        Shape::Primitive(Primitive::Bool) => &["bool", "int"],
        Shape::Primitive(Primitive::F64) => &["real", "double", "float", "numeric", "decimal"],
        Shape::Uuid => &["uuid", "char", "text", "blob"],
        Shape::Timestamp => &["timestamp", "datetime", "date", "text"],
        Shape::RawJson | Shape::Seq | Shape::Map | Shape::Struct => &["json", "text"],
        Shape::Bytes => &["bytea", "blob"],
    };

    // An untyped SQLite column takes anything
    db_type.is_empty() || accepted.iter().any(|candidate| db_type.contains(candidate))
}
