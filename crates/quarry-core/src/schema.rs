//! Model metadata.
//!
//! A model describes its fields through [`Fields`]. Registration parses the
//! field definitions once, resolves each field's codec, renders the SQL
//! templates and stores the result in the process-wide registry.

mod field;
pub use field::FieldMetadata;

mod model;
pub use model::{Model, ModelMetadata};

mod parse;
pub use parse::{parse_fields, ParsedFields};

pub mod registry;
pub use registry::{is_registered, metadata, register, registered};

mod tag;
pub use tag::Tag;

use crate::ty::TypeInfo;

use std::{any::Any, fmt};

/// A struct whose fields can be read and written by name.
///
/// Usually derived with `#[derive(Fields)]` or `#[derive(Model)]`.
pub trait Fields: 'static {
    fn fields() -> Vec<FieldDef>;
}

/// One field of a struct, as declared.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The Rust field name
    pub name: &'static str,

    /// The raw `#[orm("...")]` tag, empty when absent
    pub tag: &'static str,

    /// The name the field serializes under, from `#[serde(rename)]`
    pub json_name: Option<&'static str>,

    pub kind: FieldKind,
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A column-backed field
    Leaf {
        ty: fn() -> TypeInfo,
        accessor: Accessor,
    },

    /// A struct whose fields are flattened into the parent
    Embedded {
        accessor: Accessor,
        fields: fn() -> Vec<FieldDef>,
    },
}

/// Borrows one field out of its parent struct.
///
/// A flattened field is reached through a path of accessors, one per level
/// of embedding.
#[derive(Clone, Copy)]
pub struct Accessor {
    pub get: fn(&dyn Any) -> Option<&dyn Any>,
    pub get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor")
    }
}
