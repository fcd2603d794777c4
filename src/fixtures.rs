//! Fixtures
//!
//! YAML catalogs for seeding an [`InMemoryCatalog`]. Pricing settings are written exactly as given,
//! so malformed stored values can be reproduced.
//!
//! ```yaml
//! products:
//!   donation:
//!     id: 42
//!     allow_customer_price: true
//!     minimum_price: "5.00"
//!   mug:
//!     id: 7
//!     price: "12.00"
//! ```

use std::{fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{CatalogStore, InMemoryCatalog},
    config::{ALLOW_CUSTOMER_PRICE_KEY, MINIMUM_PRICE_KEY, encode_flag},
    products::{Product, ProductId, ProductStatus},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFixture {
    products: FxHashMap<String, ProductFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProductFixture {
    id: ProductId,

    #[serde(default)]
    status: ProductStatus,

    #[serde(default)]
    price: Option<String>,

    #[serde(default)]
    allow_customer_price: Option<bool>,

    #[serde(default)]
    minimum_price: Option<String>,

    #[serde(default)]
    meta: FxHashMap<String, String>,
}

/// Catalog and products loaded from a fixture.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    catalog: InMemoryCatalog,
    products: FxHashMap<String, Product>,
}

impl Fixture {
    /// Parse a fixture from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, a catalog price does not parse, or two products
    /// share an id.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut loaded = Self::default();
        let mut seen = FxHashSet::default();

        for (name, product) in fixture.products {
            if !seen.insert(product.id) {
                return Err(FixtureError::DuplicateId(product.id));
            }

            let price = product
                .price
                .as_deref()
                .map(parse_price)
                .transpose()?
                .flatten();

            if let Some(enabled) = product.allow_customer_price {
                loaded.catalog.set_meta(
                    product.id,
                    ALLOW_CUSTOMER_PRICE_KEY,
                    encode_flag(enabled).to_string(),
                );
            }

            if let Some(minimum) = product.minimum_price {
                loaded
                    .catalog
                    .set_meta(product.id, MINIMUM_PRICE_KEY, minimum);
            }

            for (key, value) in product.meta {
                loaded.catalog.set_meta(product.id, &key, value);
            }

            loaded
                .products
                .insert(name, Product::new(product.id, product.status, price));
        }

        Ok(loaded)
    }

    /// Read and parse a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or see [`Fixture::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Look up a product by its fixture name.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] if the fixture has no such product.
    pub fn product(&self, name: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(name)
            .ok_or_else(|| FixtureError::ProductNotFound(name.to_string()))
    }

    /// The seeded catalog.
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Split into the catalog and the named products.
    pub fn into_parts(self) -> (InMemoryCatalog, FxHashMap<String, Product>) {
        (self.catalog, self.products)
    }
}

/// Parse a fixture catalog price; blank means no price.
fn parse_price(raw: &str) -> Result<Option<Decimal>, FixtureError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(raw)
        .map(Some)
        .map_err(|_err| FixtureError::InvalidPrice(raw.to_string()))
}
