//! Request
//!
//! Typed view of the host request: submitted form fields and the context flags the lifecycle
//! needs. Raw field values are decoded here so business logic only ever sees validated decimals.

use std::str::FromStr;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

/// Form field carrying the customer-chosen price.
pub const CUSTOM_PRICE_FIELD: &str = "wcp_custom_price";

/// Submitted form fields by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields(FxHashMap<String, String>);

impl FormFields {
    /// Create an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Raw value of a field, if submitted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Context of the request a lifecycle event fires in.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    fields: FormFields,
    is_admin: bool,
    is_ajax: bool,
}

impl RequestContext {
    /// A storefront request.
    pub fn storefront(fields: FormFields) -> Self {
        Self {
            fields,
            is_admin: false,
            is_ajax: false,
        }
    }

    /// An administrative request.
    pub fn admin(fields: FormFields) -> Self {
        Self {
            fields,
            is_admin: true,
            is_ajax: false,
        }
    }

    /// Mark the request as an asynchronous storefront call.
    #[must_use]
    pub fn with_ajax(mut self, is_ajax: bool) -> Self {
        self.is_ajax = is_ajax;
        self
    }

    /// Submitted form fields.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Whether the host flagged the request as administrative.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether the request is an asynchronous storefront call.
    pub fn is_ajax(&self) -> bool {
        self.is_ajax
    }

    /// Whether storefront price handling applies.
    ///
    /// Asynchronous calls count as storefront even when the host flags them administrative, as
    /// cart fragment refreshes are routed through the admin endpoint.
    pub fn is_storefront(&self) -> bool {
        !self.is_admin || self.is_ajax
    }

    /// The submitted customer price, decoded with [`decode_price`].
    pub fn custom_price(&self) -> Option<Decimal> {
        decode_price(self.fields.get(CUSTOM_PRICE_FIELD))
    }
}

/// Decode a raw submitted price.
///
/// Missing, blank, unparseable and negative values all decode to `None`.
pub fn decode_price(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();

    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .ok()
        .filter(|price| !price.is_sign_negative())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_price_accepts_decimal_strings() {
        assert_eq!(decode_price(Some("10.00")), Some(Decimal::new(1000, 2)));
        assert_eq!(decode_price(Some(" 4.99 ")), Some(Decimal::new(499, 2)));
        assert_eq!(decode_price(Some("0")), Some(Decimal::ZERO));
    }

    #[test]
    fn decode_price_fails_closed() {
        assert_eq!(decode_price(None), None);
        assert_eq!(decode_price(Some("")), None);
        assert_eq!(decode_price(Some("   ")), None);
        assert_eq!(decode_price(Some("ten")), None);
        assert_eq!(decode_price(Some("5,00")), None);
        assert_eq!(decode_price(Some("-1")), None);
    }

    #[test]
    fn custom_price_reads_the_custom_price_field() {
        let request =
            RequestContext::storefront(FormFields::new().with(CUSTOM_PRICE_FIELD, "12.50"));

        assert_eq!(request.custom_price(), Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn admin_requests_are_storefront_only_when_ajax() {
        assert!(RequestContext::storefront(FormFields::new()).is_storefront());
        assert!(!RequestContext::admin(FormFields::new()).is_storefront());
        assert!(
            RequestContext::admin(FormFields::new())
                .with_ajax(true)
                .is_storefront()
        );
    }

    #[test]
    fn form_fields_collect_from_pairs() {
        let fields: FormFields = [("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(fields.get("a"), Some("1"));
        assert_eq!(fields.get("c"), None);
    }
}
