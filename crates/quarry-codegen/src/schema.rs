mod error;
pub(crate) use error::ErrorSet;

mod field;
pub(crate) use field::{Field, FieldKind};

mod model;
pub(crate) use model::Model;

mod model_attr;
pub(crate) use model_attr::ModelAttr;
