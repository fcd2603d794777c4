//! Money
//!
//! Currency-aware display of decimal prices.

use rust_decimal::Decimal;
use rusty_money::{Findable, Money, iso::Currency};

/// Host currency formatting.
pub trait PriceFormatter {
    /// Render an amount for display, including the currency symbol.
    fn format_price(&self, amount: Decimal) -> String;

    /// The shop currency symbol.
    fn currency_symbol(&self) -> &str;
}

/// [`PriceFormatter`] for an ISO 4217 currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyFormatter {
    currency: &'static Currency,
}

impl CurrencyFormatter {
    /// Formatter for the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Formatter for an ISO alpha code, e.g. `GBP`. Unknown codes return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Currency::find(code).map(Self::new)
    }

    /// The formatter's currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl PriceFormatter for CurrencyFormatter {
    fn format_price(&self, amount: Decimal) -> String {
        Money::from_decimal(amount, self.currency).to_string()
    }

    fn currency_symbol(&self) -> &str {
        self.currency.symbol
    }
}
