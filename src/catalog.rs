//! Catalog
//!
//! Per-product metadata storage owned by the host platform.

use rustc_hash::FxHashMap;

use crate::products::ProductId;

/// Host catalog metadata store.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogStore {
    /// Read a metadata entry for a product. Missing entries return `None`.
    fn get_meta(&self, product: ProductId, key: &str) -> Option<String>;

    /// Write a metadata entry for a product, replacing any previous value.
    fn set_meta(&mut self, product: ProductId, key: &str, value: String);
}

impl<T: CatalogStore + ?Sized> CatalogStore for &mut T {
    fn get_meta(&self, product: ProductId, key: &str) -> Option<String> {
        (**self).get_meta(product, key)
    }

    fn set_meta(&mut self, product: ProductId, key: &str, value: String) {
        (**self).set_meta(product, key, value);
    }
}

/// In-memory catalog, keyed by product id then meta key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    meta: FxHashMap<ProductId, FxHashMap<String, String>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`CatalogStore::set_meta`].
    #[must_use]
    pub fn with_meta(mut self, product: ProductId, key: &str, value: impl Into<String>) -> Self {
        self.set_meta(product, key, value.into());
        self
    }

    /// Number of products with at least one metadata entry.
    pub fn len(&self) -> usize {
        self.meta.len()
    }

    /// Whether no product has metadata.
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn get_meta(&self, product: ProductId, key: &str) -> Option<String> {
        self.meta.get(&product)?.get(key).cloned()
    }

    fn set_meta(&mut self, product: ProductId, key: &str, value: String) {
        self.meta
            .entry(product)
            .or_default()
            .insert(key.to_string(), value);
    }
}
