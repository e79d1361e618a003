//! The process-wide model registry.
//!
//! Models are registered during startup, before any query runs. Lookups take
//! a read lock only long enough to clone an `Arc`.

use super::{Model, ModelMetadata};

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

static REGISTRY: LazyLock<RwLock<HashMap<TypeId, Arc<ModelMetadata>>>> =
    LazyLock::new(Default::default);

/// Registers `T`, returning its metadata.
///
/// Registration is idempotent: the first registration wins and later calls
/// return the stored metadata without parsing `T` again.
pub fn register<T: Model>() -> Arc<ModelMetadata> {
    if let Some(existing) = metadata::<T>() {
        return existing;
    }

    let built = Arc::new(ModelMetadata::build::<T>());

    let mut models = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    let entry = models.entry(TypeId::of::<T>()).or_insert_with(|| {
        log::debug!(
            "registered model `{}` as table `{}`",
            built.type_name,
            built.templates.table_name
        );
        built.clone()
    });
    entry.clone()
}

/// Returns the metadata of `T`, if it has been registered.
pub fn metadata<T: 'static>() -> Option<Arc<ModelMetadata>> {
    metadata_by_id(TypeId::of::<T>())
}

pub fn metadata_by_id(type_id: TypeId) -> Option<Arc<ModelMetadata>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .cloned()
}

pub fn is_registered<T: 'static>() -> bool {
    metadata::<T>().is_some()
}

/// Metadata of every registered model, in no particular order.
pub fn registered() -> Vec<Arc<ModelMetadata>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .values()
        .cloned()
        .collect()
}

/// Replaces a model's metadata.
///
/// Used by schema validation to install a primary key discovered from the
/// database. Callers holding the previous `Arc` keep seeing the old metadata.
pub fn replace(metadata: ModelMetadata) -> Arc<ModelMetadata> {
    let metadata = Arc::new(metadata);
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(metadata.type_id, metadata.clone());
    metadata
}
