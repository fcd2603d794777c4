//! Purchasability
//!
//! Whether a product may be added to the cart.

use crate::products::{Product, ProductId};

/// The user a request acts for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor {
    /// Host user id; `None` for guests.
    pub user_id: Option<u64>,
}

impl Actor {
    /// A signed-out visitor.
    pub const fn guest() -> Self {
        Self { user_id: None }
    }

    /// A signed-in user.
    pub const fn user(id: u64) -> Self {
        Self { user_id: Some(id) }
    }
}

/// Host capability check.
#[cfg_attr(test, mockall::automock)]
pub trait Permissions {
    /// Whether the actor may edit the product.
    fn can_edit(&self, actor: &Actor, product: ProductId) -> bool;
}

impl<F> Permissions for F
where
    F: Fn(&Actor, ProductId) -> bool,
{
    fn can_edit(&self, actor: &Actor, product: ProductId) -> bool {
        self(actor, product)
    }
}

/// Whether the actor can see the product at all: published, or editable by them.
pub fn is_visible_to(product: &Product, actor: &Actor, permissions: &dyn Permissions) -> bool {
    product.exists && (product.is_published() || permissions.can_edit(actor, product.id))
}

/// The host's default verdict: visible and with a catalog price.
pub fn default_verdict(product: &Product, actor: &Actor, permissions: &dyn Permissions) -> bool {
    is_visible_to(product, actor, permissions) && product.price.is_some()
}

/// Purchasability with customer pricing taken into account.
///
/// A product the host already considers purchasable stays purchasable. Otherwise a visible
/// product without a catalog price is purchasable when the customer sets the price.
pub fn with_customer_pricing(
    purchasable: bool,
    product: &Product,
    actor: &Actor,
    permissions: &dyn Permissions,
    customer_priced: bool,
) -> bool {
    purchasable
        || (is_visible_to(product, actor, permissions)
            && (product.price.is_some() || customer_priced))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use rust_decimal::Decimal;

    use super::*;
    use crate::products::ProductStatus;

    const PRODUCT: ProductId = ProductId::new(9);

    fn nobody_can_edit(_: &Actor, _: ProductId) -> bool {
        false
    }

    fn published(price: Option<Decimal>) -> Product {
        Product::new(PRODUCT, ProductStatus::Publish, price)
    }

    #[test]
    fn purchasable_verdict_is_kept() {
        let product = Product::missing(PRODUCT);

        assert!(with_customer_pricing(
            true,
            &product,
            &Actor::guest(),
            &nobody_can_edit,
            false
        ));
    }

    #[test]
    fn price_less_product_needs_customer_pricing() {
        let product = published(None);
        let actor = Actor::guest();

        assert!(with_customer_pricing(false, &product, &actor, &nobody_can_edit, true));
        assert!(!with_customer_pricing(false, &product, &actor, &nobody_can_edit, false));
    }

    #[test]
    fn missing_product_is_never_purchasable() {
        let product = Product::missing(PRODUCT);

        assert!(!with_customer_pricing(
            false,
            &product,
            &Actor::guest(),
            &nobody_can_edit,
            true
        ));
    }

    #[test]
    fn drafts_need_edit_permission() {
        let product = Product::new(PRODUCT, ProductStatus::Draft, None);
        let mut permissions = MockPermissions::new();

        permissions
            .expect_can_edit()
            .with(eq(Actor::user(3)), eq(PRODUCT))
            .times(1)
            .return_const(true);
        permissions
            .expect_can_edit()
            .with(eq(Actor::guest()), always())
            .times(1)
            .return_const(false);

        assert!(with_customer_pricing(false, &product, &Actor::user(3), &permissions, true));
        assert!(!with_customer_pricing(false, &product, &Actor::guest(), &permissions, true));
    }

    #[test]
    fn published_products_skip_the_permission_check() {
        let mut permissions = MockPermissions::new();
        permissions.expect_can_edit().never();

        assert!(default_verdict(
            &published(Some(Decimal::ONE)),
            &Actor::guest(),
            &permissions
        ));
    }

    #[test]
    fn default_verdict_requires_a_price() {
        assert!(!default_verdict(&published(None), &Actor::guest(), &nobody_can_edit));
    }
}
