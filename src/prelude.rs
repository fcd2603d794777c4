//! Customer pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartLineData, CartLineKey},
    catalog::{CatalogStore, InMemoryCatalog},
    config::{ConfigError, ProductPricingConfig},
    fixtures::{Fixture, FixtureError},
    hooks::{HookChain, LifecycleEvent, LifecycleHooks},
    lifecycle::CustomPriceLifecycle,
    money::{CurrencyFormatter, PriceFormatter},
    notices::{Notice, NoticeKind, NoticeLog, Notices},
    pipeline::{AddToCart, AddToCartError, add_to_cart, display_prices, recompute_totals},
    products::{Product, ProductId, ProductStatus},
    purchasability::{Actor, Permissions},
    render::RenderError,
    request::{FormFields, RequestContext},
    settings::{PricingSettings, SettingsError},
};
