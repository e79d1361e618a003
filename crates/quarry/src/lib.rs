pub mod crud;
pub use crud::Crud;

pub mod db;
pub use db::Db;

pub mod query;
pub use query::Query;

pub mod validate;
pub use validate::{validate_schema, ValidationIssue, ValidationReport};

pub use quarry_core::{
    args, driver,
    schema::{self, registry, Fields, Model, ModelMetadata},
    scan::{RawScanner, Scanner},
    stmt::{Row, Rows, Value},
    ty::{DriverValue, FieldType, RawJson, TypeInfo},
    Error, Result,
};

pub use quarry_macros::{Fields, JsonField, Model};

#[doc(hidden)]
pub mod codegen_support {
    pub use quarry_core::{
        schema::{Accessor, FieldDef, FieldKind, Fields, Model},
        ty::{FieldType, JsonElement, Shape, TypeInfo},
    };
    pub use std::{
        any::Any,
        option::Option::{self, None, Some},
        vec::Vec,
    };
}
