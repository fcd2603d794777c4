//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Host identifier for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw host product id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw host product id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible to everyone.
    #[default]
    Publish,

    /// Scheduled for future publication.
    Future,

    /// Unpublished draft.
    Draft,

    /// Awaiting review.
    Pending,

    /// Visible only to users who can edit it.
    Private,

    /// Moved to the bin.
    Trash,
}

/// Snapshot of the product fields the purchasability check needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Whether the product exists in the catalog
    pub exists: bool,

    /// Publication status
    pub status: ProductStatus,

    /// Catalog price; `None` when the host has no price set
    pub price: Option<Decimal>,
}

impl Product {
    /// Creates an existing product.
    pub fn new(id: ProductId, status: ProductStatus, price: Option<Decimal>) -> Self {
        Self {
            id,
            exists: true,
            status,
            price,
        }
    }

    /// Creates a placeholder for a product id the catalog does not know.
    pub fn missing(id: ProductId) -> Self {
        Self {
            id,
            exists: false,
            status: ProductStatus::Trash,
            price: None,
        }
    }

    /// Whether the product is published.
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Publish
    }
}
