//! Rendering of the parameterized SQL strings quarry executes.
//!
//! Every statement is rendered with PostgreSQL-style `$N` placeholders.
//! Drivers for other flavors rewrite them with [`Flavor::rewrite`].

mod flavor;
pub use flavor::Flavor;

mod name;
pub use name::{qualified_name, split_table_name, DEFAULT_SCHEMA};

pub mod stmt;

mod templates;
pub use templates::{SqlTemplates, CREATED_AT};

/// Renders `count` placeholders starting at `$start`, comma separated.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(",")
}
