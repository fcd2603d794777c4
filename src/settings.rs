//! Settings
//!
//! Shop-wide options, loaded from YAML.

use std::{fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::money::CurrencyFormatter;

/// Default shop currency.
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Default message shown when a submitted price is below the product minimum.
pub const MINIMUM_NOT_MET: &str = "Minimum price requirement not met";

/// Default step of the storefront price input.
pub const DEFAULT_PRICE_STEP: &str = "0.01";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price step is not a positive decimal
    #[error("Invalid price step: {0}")]
    InvalidPriceStep(String),
}

/// Shop-wide customer pricing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingSettings {
    /// ISO 4217 code of the shop currency.
    pub currency: String,

    /// Error notice shown when the validation gate rejects a price.
    pub minimum_not_met_notice: String,

    /// `step` attribute of the storefront price input.
    pub price_step: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            minimum_not_met_notice: MINIMUM_NOT_MET.to_string(),
            price_step: DEFAULT_PRICE_STEP.to_string(),
        }
    }
}

impl PricingSettings {
    /// Parse and validate settings from a YAML document. Omitted keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_norway::from_str(yaml)?;

        settings.validate()?;

        debug!(currency = %settings.currency, "loaded customer pricing settings");

        Ok(settings)
    }

    /// Read, parse and validate a YAML settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Check the currency and price step.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownCurrency`]: `currency` is not an ISO 4217 code.
    /// - [`SettingsError::InvalidPriceStep`]: `price_step` is not a positive decimal.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.formatter()?;

        match Decimal::from_str(self.price_step.trim()) {
            Ok(step) if step > Decimal::ZERO => Ok(()),
            _ => Err(SettingsError::InvalidPriceStep(self.price_step.clone())),
        }
    }

    /// Formatter for the shop currency.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownCurrency`] if `currency` is not an ISO 4217 code.
    pub fn formatter(&self) -> Result<CurrencyFormatter, SettingsError> {
        CurrencyFormatter::from_code(&self.currency)
            .ok_or_else(|| SettingsError::UnknownCurrency(self.currency.clone()))
    }
}
