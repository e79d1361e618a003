pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod handler;

pub mod scan;
pub use scan::{RawScanner, Scanner};

pub mod schema;
pub use schema::{Fields, Model, ModelMetadata};

pub mod stmt;

pub mod ty;
pub use ty::FieldType;

/// A Result type alias that uses Quarry's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
