//! Customer Pricing
//!
//! Lifecycle hooks that let shoppers choose what they pay for a product, with an optional minimum
//! enforced when the product is added to the cart.
//!
//! A host platform drives the crate through [`hooks::LifecycleHooks`]: it fires one event per
//! point in its admin, product page, cart and totals pipeline, and the
//! [`lifecycle::CustomPriceLifecycle`] handler answers each one using product settings read from the
//! host [`catalog::CatalogStore`].

pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod hooks;
pub mod lifecycle;
pub mod money;
pub mod notices;
pub mod pipeline;
pub mod prelude;
pub mod products;
pub mod purchasability;
pub mod render;
pub mod request;
pub mod settings;
