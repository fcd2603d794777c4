//! Cart

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{products::ProductId, request::decode_price};

/// Cart-line data key holding the customer-chosen price.
pub const CUSTOM_PRICE_KEY: &str = "wcp_custom_price";

new_key_type! {
    /// Cart Line Key
    pub struct CartLineKey;
}

/// Errors related to cart mutation or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line was added with a zero quantity.
    #[error("cart line for product {0} must have a quantity of at least one")]
    ZeroQuantity(ProductId),

    /// No line exists for the key.
    #[error("cart line {0:?} not found")]
    LineNotFound(CartLineKey),

    /// A line total or the cart subtotal does not fit in a decimal.
    #[error("cart total overflowed at product {0}")]
    Overflow(ProductId),
}

/// Custom attributes attached to a cart line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLineData {
    meta: FxHashMap<String, String>,
}

impl CartLineData {
    /// Empty line data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Set a raw attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// The customer-chosen price, if one was captured and still decodes.
    pub fn custom_price(&self) -> Option<Decimal> {
        decode_price(self.get(CUSTOM_PRICE_KEY))
    }

    pub(crate) fn set_custom_price(&mut self, price: Decimal) {
        self.insert(CUSTOM_PRICE_KEY, price.to_string());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CartLineData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            meta: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// One cart entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: ProductId,
    quantity: u32,
    catalog_price: Option<Decimal>,
    price: Option<Decimal>,
    data: CartLineData,
}

impl CartLine {
    /// A new line priced at the catalog price.
    pub fn new(
        product: ProductId,
        quantity: u32,
        catalog_price: Option<Decimal>,
        data: CartLineData,
    ) -> Self {
        Self {
            product,
            quantity,
            catalog_price,
            price: catalog_price,
            data,
        }
    }

    /// The referenced product.
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Catalog price at the time the line was created.
    pub fn catalog_price(&self) -> Option<Decimal> {
        self.catalog_price
    }

    /// Effective unit price used for totals.
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Override the effective unit price.
    pub fn set_price(&mut self, price: Decimal) {
        self.price = Some(price);
    }

    /// Custom attributes.
    pub fn data(&self) -> &CartLineData {
        &self.data
    }

    /// Shorthand for [`CartLineData::custom_price`].
    pub fn custom_price(&self) -> Option<Decimal> {
        self.data.custom_price()
    }

    /// Effective unit price times quantity. Unpriced lines total zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the product does not fit in a decimal.
    pub fn total(&self) -> Result<Decimal, CartError> {
        self.price
            .unwrap_or_default()
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(CartError::Overflow(self.product))
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    lines: SlotMap<CartLineKey, CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: SlotMap::with_key(),
            currency,
        }
    }

    /// Add a line to the cart.
    ///
    /// A line for the same product with the same custom price absorbs the quantity instead;
    /// its data is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if the line has no quantity.
    pub fn add(&mut self, line: CartLine) -> Result<CartLineKey, CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity(line.product));
        }

        let existing = self.lines.iter_mut().find(|(_, existing)| {
            existing.product == line.product && existing.custom_price() == line.custom_price()
        });

        if let Some((key, existing)) = existing {
            existing.quantity = existing.quantity.saturating_add(line.quantity);

            return Ok(key);
        }

        Ok(self.lines.insert(line))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the key is unknown.
    pub fn remove(&mut self, key: CartLineKey) -> Result<CartLine, CartError> {
        self.lines.remove(key).ok_or(CartError::LineNotFound(key))
    }

    /// Look up a line.
    pub fn get(&self, key: CartLineKey) -> Option<&CartLine> {
        self.lines.get(key)
    }

    /// All lines.
    pub fn lines(&self) -> impl Iterator<Item = (CartLineKey, &CartLine)> {
        self.lines.iter()
    }

    /// All lines, mutably.
    pub fn lines_mut(&mut self) -> impl Iterator<Item = (CartLineKey, &mut CartLine)> {
        self.lines.iter_mut()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of every line total at its current effective price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if a line total or the sum does not fit in a decimal.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, CartError> {
        let total = self
            .lines
            .values()
            .try_fold(Decimal::ZERO, |acc, line| {
                acc.checked_add(line.total()?)
                    .ok_or(CartError::Overflow(line.product))
            })?;

        Ok(Money::from_decimal(total, self.currency))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    const PRODUCT: ProductId = ProductId::new(1);

    fn priced(price: &str) -> CartLineData {
        [(CUSTOM_PRICE_KEY, price)].into_iter().collect()
    }

    #[test]
    fn new_line_uses_catalog_price() {
        let line = CartLine::new(PRODUCT, 2, Some(Decimal::new(300, 2)), CartLineData::new());

        assert_eq!(line.price(), Some(Decimal::new(300, 2)));
        assert_eq!(line.total().ok(), Some(Decimal::new(600, 2)));
    }

    #[test]
    fn unpriced_line_totals_zero() {
        let line = CartLine::new(PRODUCT, 3, None, CartLineData::new());

        assert_eq!(line.total().ok(), Some(Decimal::ZERO));
    }

    #[test]
    fn line_total_overflow_is_an_error() {
        let line = CartLine::new(PRODUCT, 2, Some(Decimal::MAX), CartLineData::new());

        assert!(matches!(line.total(), Err(CartError::Overflow(p)) if p == PRODUCT));
    }

    #[test]
    fn set_price_overrides_effective_price_only() {
        let mut line = CartLine::new(PRODUCT, 1, Some(Decimal::new(300, 2)), CartLineData::new());

        line.set_price(Decimal::new(1000, 2));

        assert_eq!(line.price(), Some(Decimal::new(1000, 2)));
        assert_eq!(line.catalog_price(), Some(Decimal::new(300, 2)));
    }

    #[test]
    fn custom_price_decodes_from_line_data() {
        assert_eq!(priced("10.00").custom_price(), Some(Decimal::new(1000, 2)));
        assert_eq!(priced("junk").custom_price(), None);
        assert_eq!(CartLineData::new().custom_price(), None);
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut cart = Cart::new(GBP);

        let result = cart.add(CartLine::new(PRODUCT, 0, None, CartLineData::new()));

        assert!(matches!(result, Err(CartError::ZeroQuantity(p)) if p == PRODUCT));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_merges_same_product_and_custom_price() -> TestResult {
        let mut cart = Cart::new(GBP);

        let first = cart.add(CartLine::new(PRODUCT, 1, None, priced("10")))?;
        let second = cart.add(CartLine::new(PRODUCT, 2, None, priced("10.0")))?;

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(first).map(CartLine::quantity), Some(3));

        Ok(())
    }

    #[test]
    fn add_keeps_distinct_custom_prices_apart() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add(CartLine::new(PRODUCT, 1, None, priced("10")))?;
        cart.add(CartLine::new(PRODUCT, 1, None, priced("12")))?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn remove_unknown_line_errors() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = cart.add(CartLine::new(PRODUCT, 1, None, CartLineData::new()))?;

        cart.remove(key)?;

        assert!(matches!(cart.remove(key), Err(CartError::LineNotFound(k)) if k == key));

        Ok(())
    }

    #[test]
    fn subtotal_sums_line_totals() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add(CartLine::new(
            ProductId::new(1),
            2,
            Some(Decimal::new(150, 2)),
            CartLineData::new(),
        ))?;
        cart.add(CartLine::new(
            ProductId::new(2),
            1,
            Some(Decimal::new(200, 2)),
            CartLineData::new(),
        ))?;

        assert_eq!(cart.subtotal()?, Money::from_minor(500, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_overflow_is_an_error() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add(CartLine::new(PRODUCT, 2, Some(Decimal::MAX), CartLineData::new()))?;

        assert!(matches!(cart.subtotal(), Err(CartError::Overflow(p)) if p == PRODUCT));

        let mut cart = Cart::new(GBP);

        cart.add(CartLine::new(ProductId::new(1), 1, Some(Decimal::MAX), CartLineData::new()))?;
        cart.add(CartLine::new(ProductId::new(2), 1, Some(Decimal::ONE), CartLineData::new()))?;

        assert!(matches!(cart.subtotal(), Err(CartError::Overflow(_))));

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() -> TestResult {
        assert_eq!(Cart::new(GBP).subtotal()?, Money::from_minor(0, GBP));

        Ok(())
    }
}
