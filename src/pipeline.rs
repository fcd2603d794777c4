//! Pipeline
//!
//! Storefront flows for hosts that do not sequence the lifecycle events themselves.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartError, CartLine, CartLineData, CartLineKey},
    hooks::LifecycleHooks,
    notices::Notices,
    products::{Product, ProductId},
    purchasability::{self, Actor, Permissions},
    request::RequestContext,
};

/// Notice shown when a product cannot be bought.
pub const NOT_PURCHASABLE: &str = "Sorry, this product cannot be purchased.";

/// Reasons an add-to-cart request was turned down.
#[derive(Debug, Error)]
pub enum AddToCartError {
    /// The product cannot be bought by this actor.
    #[error("product {0} cannot be purchased")]
    NotPurchasable(ProductId),

    /// A validation handler rejected the request.
    #[error("add to cart for product {0} failed validation")]
    Rejected(ProductId),

    /// The cart refused the line.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Everything an add-to-cart request carries besides the cart itself.
#[derive(Debug, Clone, Copy)]
pub struct AddToCart<'a> {
    /// Product being added
    pub product: &'a Product,

    /// Quantity requested
    pub quantity: u32,

    /// Request the add arrived in
    pub request: &'a RequestContext,

    /// User making the request
    pub actor: &'a Actor,
}

/// Add a product to the cart.
///
/// Runs the purchasability check, then validation, then builds the line data. A rejected request
/// leaves the cart untouched; the handler that rejected it is responsible for the notice, except
/// for purchasability, which queues [`NOT_PURCHASABLE`].
///
/// # Errors
///
/// - [`AddToCartError::NotPurchasable`]: the product cannot be bought.
/// - [`AddToCartError::Rejected`]: a validation handler rejected the request.
/// - [`AddToCartError::Cart`]: the cart refused the line.
pub fn add_to_cart<H: LifecycleHooks + ?Sized>(
    hooks: &H,
    cart: &mut Cart,
    add: AddToCart<'_>,
    permissions: &dyn Permissions,
    notices: &mut dyn Notices,
) -> Result<CartLineKey, AddToCartError> {
    let AddToCart {
        product,
        quantity,
        request,
        actor,
    } = add;

    let verdict = purchasability::default_verdict(product, actor, permissions);

    if !hooks.on_purchasability_check(verdict, product, actor, permissions) {
        info!(product = %product.id, "product not purchasable");
        notices.add_error_notice(NOT_PURCHASABLE);

        return Err(AddToCartError::NotPurchasable(product.id));
    }

    if !hooks.on_add_to_cart_validate(true, product.id, quantity, request, notices) {
        return Err(AddToCartError::Rejected(product.id));
    }

    let data = hooks.on_cart_line_create(CartLineData::new(), request);
    let key = cart.add(CartLine::new(product.id, quantity, product.price, data))?;

    debug!(product = %product.id, quantity, "added to cart");

    Ok(key)
}

/// Run the pre-totals handlers, then total the cart.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] if the cart total does not fit in a decimal.
pub fn recompute_totals<H: LifecycleHooks + ?Sized>(
    hooks: &H,
    cart: &mut Cart,
    request: &RequestContext,
) -> Result<Money<'static, Currency>, CartError> {
    hooks.on_totals_recompute(cart, request);

    cart.subtotal()
}

/// Formatted unit price of every line, in cart order.
pub fn display_prices<H: LifecycleHooks + ?Sized>(
    hooks: &H,
    cart: &Cart,
    default: impl Fn(&CartLine) -> String,
) -> Vec<(CartLineKey, String)> {
    cart.lines()
        .map(|(key, line)| (key, hooks.on_cart_line_format_price(default(line), line)))
        .collect()
}
