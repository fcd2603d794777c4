//! Product Pricing Config
//!
//! The two per-product settings, and the adapter between their typed form and the strings the
//! host catalog stores.

use std::str::FromStr;

use askama::filters::{self, Html};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{catalog::CatalogStore, products::ProductId, request::FormFields};

/// Catalog key (and admin form field) for the customer pricing flag.
pub const ALLOW_CUSTOMER_PRICE_KEY: &str = "_wcp_allow_customer_set_price";

/// Catalog key (and admin form field) for the minimum price.
pub const MINIMUM_PRICE_KEY: &str = "_wcp_minimum_price";

const ENABLED: &str = "yes";
const DISABLED: &str = "no";

/// Errors reading a stored product pricing config.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The stored minimum is not a number.
    #[error("minimum price {value:?} for product {product} is not a valid price")]
    MalformedMinimum {
        /// Product id
        product: ProductId,
        /// Stored value
        value: String,
    },

    /// The stored minimum is below zero.
    #[error("minimum price {value} for product {product} is negative")]
    NegativeMinimum {
        /// Product id
        product: ProductId,
        /// Stored value
        value: Decimal,
    },
}

/// Customer pricing settings for a single product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductPricingConfig {
    /// Whether the customer chooses the price.
    pub allow_customer_price: bool,

    /// Lowest acceptable customer price; `None` means no floor.
    pub minimum_price: Option<Decimal>,
}

impl ProductPricingConfig {
    /// Read a product's config. Products never configured read as the default.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MalformedMinimum`]: the stored minimum is not a number.
    /// - [`ConfigError::NegativeMinimum`]: the stored minimum is below zero.
    pub fn load<C: CatalogStore + ?Sized>(
        catalog: &C,
        product: ProductId,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            allow_customer_price: load_flag(catalog, product),
            minimum_price: load_minimum(catalog, product)?,
        })
    }

    /// Write both settings, replacing whatever was stored.
    pub fn store<C: CatalogStore + ?Sized>(&self, catalog: &mut C, product: ProductId) {
        catalog.set_meta(
            product,
            ALLOW_CUSTOMER_PRICE_KEY,
            encode_flag(self.allow_customer_price).to_string(),
        );
        catalog.set_meta(
            product,
            MINIMUM_PRICE_KEY,
            self.minimum_price
                .map(|minimum| minimum.to_string())
                .unwrap_or_default(),
        );
    }

    /// The minimum to enforce, if any. Only customer-priced products have a floor.
    pub fn floor(&self) -> Option<Decimal> {
        self.minimum_price.filter(|_| self.allow_customer_price)
    }
}

/// Read only the customer pricing flag.
pub fn load_flag<C: CatalogStore + ?Sized>(catalog: &C, product: ProductId) -> bool {
    decode_flag(catalog.get_meta(product, ALLOW_CUSTOMER_PRICE_KEY).as_deref())
}

/// Read only the minimum price.
///
/// # Errors
///
/// See [`ProductPricingConfig::load`].
pub fn load_minimum<C: CatalogStore + ?Sized>(
    catalog: &C,
    product: ProductId,
) -> Result<Option<Decimal>, ConfigError> {
    decode_minimum(product, catalog.get_meta(product, MINIMUM_PRICE_KEY).as_deref())
}

/// Stored flag to boolean. Only the literal `yes` enables customer pricing.
pub fn decode_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value == ENABLED)
}

/// Boolean to stored flag.
pub fn encode_flag(enabled: bool) -> &'static str {
    if enabled { ENABLED } else { DISABLED }
}

/// Stored minimum to decimal. Missing or blank values mean no floor.
///
/// # Errors
///
/// See [`ProductPricingConfig::load`].
pub fn decode_minimum(product: ProductId, raw: Option<&str>) -> Result<Option<Decimal>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let value = Decimal::from_str(raw).map_err(|_err| ConfigError::MalformedMinimum {
        product,
        value: raw.to_string(),
    })?;

    if value.is_sign_negative() {
        return Err(ConfigError::NegativeMinimum { product, value });
    }

    Ok(Some(value))
}

/// Admin form submission for a product's pricing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    /// Checkbox value; unchecked boxes are not submitted.
    pub allow_customer_price: Option<String>,

    /// Minimum price text field.
    pub minimum_price: Option<String>,
}

impl ConfigForm {
    /// Extract the two fields from a submitted payload.
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            allow_customer_price: fields.get(ALLOW_CUSTOMER_PRICE_KEY).map(sanitize_text),
            minimum_price: fields.get(MINIMUM_PRICE_KEY).map(sanitize_text),
        }
    }

    /// Persist both fields unconditionally.
    ///
    /// An absent checkbox stores the disabled flag and an absent minimum stores an empty value.
    /// The minimum is stored as submitted, so a malformed entry surfaces when the config is next
    /// read rather than being silently dropped here.
    pub fn save<C: CatalogStore + ?Sized>(&self, catalog: &mut C, product: ProductId) {
        let enabled = decode_flag(self.allow_customer_price.as_deref());

        catalog.set_meta(
            product,
            ALLOW_CUSTOMER_PRICE_KEY,
            encode_flag(enabled).to_string(),
        );
        catalog.set_meta(
            product,
            MINIMUM_PRICE_KEY,
            self.minimum_price.as_deref().unwrap_or_default().to_string(),
        );
    }
}

/// Trim and HTML-escape a submitted text value.
pub fn sanitize_text(raw: &str) -> String {
    let Ok(escaped) = filters::escape(raw.trim(), Html);

    escaped.to_string()
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use testresult::TestResult;

    use super::*;
    use crate::catalog::{InMemoryCatalog, MockCatalogStore};

    const PRODUCT: ProductId = ProductId::new(7);

    #[test]
    fn unconfigured_product_reads_as_default() -> TestResult {
        let config = ProductPricingConfig::load(&InMemoryCatalog::new(), PRODUCT)?;

        assert_eq!(config, ProductPricingConfig::default());
        assert!(!config.allow_customer_price);
        assert_eq!(config.minimum_price, None);

        Ok(())
    }

    #[test]
    fn store_then_load_round_trips() -> TestResult {
        let mut catalog = InMemoryCatalog::new();
        let config = ProductPricingConfig {
            allow_customer_price: true,
            minimum_price: Some(Decimal::new(999, 2)),
        };

        config.store(&mut catalog, PRODUCT);

        assert_eq!(ProductPricingConfig::load(&catalog, PRODUCT)?, config);

        Ok(())
    }

    #[test]
    fn only_yes_enables_the_flag() {
        assert!(decode_flag(Some("yes")));
        assert!(!decode_flag(Some("no")));
        assert!(!decode_flag(Some("on")));
        assert!(!decode_flag(Some("")));
        assert!(!decode_flag(None));
    }

    #[test]
    fn blank_minimum_means_no_floor() -> TestResult {
        assert_eq!(decode_minimum(PRODUCT, None)?, None);
        assert_eq!(decode_minimum(PRODUCT, Some(""))?, None);
        assert_eq!(decode_minimum(PRODUCT, Some("  "))?, None);

        Ok(())
    }

    #[test]
    fn malformed_minimum_is_an_error() {
        assert_eq!(
            decode_minimum(PRODUCT, Some("five")),
            Err(ConfigError::MalformedMinimum {
                product: PRODUCT,
                value: "five".to_string(),
            })
        );
    }

    #[test]
    fn negative_minimum_is_an_error() {
        assert!(matches!(
            decode_minimum(PRODUCT, Some("-1.00")),
            Err(ConfigError::NegativeMinimum { .. })
        ));
    }

    #[test]
    fn floor_requires_the_flag() {
        let config = ProductPricingConfig {
            allow_customer_price: false,
            minimum_price: Some(Decimal::new(500, 2)),
        };

        assert_eq!(config.floor(), None);
    }

    #[test]
    fn form_without_checkbox_saves_disabled_flag() {
        let mut catalog = MockCatalogStore::new();

        catalog
            .expect_set_meta()
            .with(eq(PRODUCT), eq(ALLOW_CUSTOMER_PRICE_KEY), eq("no".to_string()))
            .times(1)
            .return_const(());
        catalog
            .expect_set_meta()
            .with(eq(PRODUCT), eq(MINIMUM_PRICE_KEY), eq(String::new()))
            .times(1)
            .return_const(());

        ConfigForm::from_fields(&FormFields::new()).save(&mut catalog, PRODUCT);
    }

    #[test]
    fn form_save_overwrites_previous_config() -> TestResult {
        let mut catalog = InMemoryCatalog::new()
            .with_meta(PRODUCT, ALLOW_CUSTOMER_PRICE_KEY, "yes")
            .with_meta(PRODUCT, MINIMUM_PRICE_KEY, "5.00");

        let fields = FormFields::new().with(MINIMUM_PRICE_KEY, "");
        ConfigForm::from_fields(&fields).save(&mut catalog, PRODUCT);

        assert_eq!(
            ProductPricingConfig::load(&catalog, PRODUCT)?,
            ProductPricingConfig::default()
        );

        Ok(())
    }

    #[test]
    fn form_values_are_sanitized() {
        let fields = FormFields::new()
            .with(ALLOW_CUSTOMER_PRICE_KEY, " yes ")
            .with(MINIMUM_PRICE_KEY, "<b>5</b>");

        let form = ConfigForm::from_fields(&fields);

        assert_eq!(form.allow_customer_price.as_deref(), Some("yes"));
        assert_eq!(form.minimum_price.as_deref(), Some("&#60;b&#62;5&#60;/b&#62;"));
    }

    #[test]
    fn sanitize_text_escapes_html() {
        assert_eq!(sanitize_text(r#"a&b "c" 'd'"#), "a&#38;b &#34;c&#34; &#39;d&#39;");
    }
}
