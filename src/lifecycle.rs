//! Custom Price Lifecycle
//!
//! A customer-chosen price moves through the host pipeline in this order:
//!
//! 1. the admin enables customer pricing on a product and optionally sets a minimum;
//! 2. the product page renders a price input;
//! 3. add-to-cart validation rejects prices below the minimum;
//! 4. the accepted price is captured on the new cart line;
//! 5. before totals are computed the captured price replaces the line's unit price;
//! 6. the cart shows the captured price in place of the catalog price.
//!
//! Products without a catalog price stay purchasable while customer pricing is on.
//!
//! A custom price captured on a product that is not (or no longer) customer-priced is kept on the
//! line but never applied or displayed.

use askama::Template;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartLine, CartLineData},
    catalog::CatalogStore,
    config::{self, ConfigError, ConfigForm, ProductPricingConfig},
    hooks::LifecycleHooks,
    money::{CurrencyFormatter, PriceFormatter},
    notices::Notices,
    products::{Product, ProductId},
    purchasability::{self, Actor, Permissions},
    render::{AdminPricingFields, PriceInput, RenderError},
    request::{FormFields, RequestContext},
    settings::{PricingSettings, SettingsError},
};

/// Customer pricing handler for a host catalog.
#[derive(Debug)]
pub struct CustomPriceLifecycle<C, F = CurrencyFormatter> {
    catalog: C,
    formatter: F,
    settings: PricingSettings,
}

impl<C: CatalogStore> CustomPriceLifecycle<C> {
    /// Handler formatting prices in the settings' currency.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the settings fail validation.
    pub fn new(catalog: C, settings: PricingSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let formatter = settings.formatter()?;

        Ok(Self::with_formatter(catalog, formatter, settings))
    }
}

impl<C: CatalogStore, F: PriceFormatter> CustomPriceLifecycle<C, F> {
    /// Handler with a host-provided formatter.
    pub fn with_formatter(catalog: C, formatter: F, settings: PricingSettings) -> Self {
        Self {
            catalog,
            formatter,
            settings,
        }
    }

    /// The catalog store.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The catalog store, mutably.
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// The price formatter.
    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Shop-wide settings.
    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    /// Consume the handler, returning the catalog.
    pub fn into_catalog(self) -> C {
        self.catalog
    }

    /// A product's pricing config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the stored minimum is malformed.
    pub fn config(&self, product: ProductId) -> Result<ProductPricingConfig, ConfigError> {
        ProductPricingConfig::load(&self.catalog, product)
    }

    /// Whether the customer sets the product's price.
    pub fn is_customer_priced(&self, product: ProductId) -> bool {
        config::load_flag(&self.catalog, product)
    }

    /// Admin form fields for a product's pricing settings.
    ///
    /// A malformed stored minimum is shown as stored, with an error beside it.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the template fails to render.
    pub fn render_configuration(&self, product: ProductId) -> Result<String, RenderError> {
        let minimum_price = self
            .catalog
            .get_meta(product, config::MINIMUM_PRICE_KEY)
            .unwrap_or_default();
        let error = config::load_minimum(&self.catalog, product)
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();

        let html = AdminPricingFields {
            allow_customer_price: self.is_customer_priced(product),
            minimum_price: &minimum_price,
            currency_symbol: self.formatter.currency_symbol(),
            error: &error,
        }
        .render()?;

        Ok(html)
    }

    /// Persist the admin form submission, replacing the product's previous settings.
    pub fn save_configuration(&mut self, product: ProductId, fields: &FormFields) {
        let form = ConfigForm::from_fields(fields);

        form.save(&mut self.catalog, product);

        info!(
            %product,
            allow_customer_price = ?form.allow_customer_price,
            minimum_price = ?form.minimum_price,
            "saved customer pricing config"
        );
    }

    /// Storefront price input, or `None` when the product is not customer-priced.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the template fails to render.
    pub fn render_price_input(&self, product: ProductId) -> Result<Option<String>, RenderError> {
        if !self.is_customer_priced(product) {
            return Ok(None);
        }

        let minimum_price = match config::load_minimum(&self.catalog, product) {
            Ok(minimum) => minimum.map(|minimum| minimum.to_string()).unwrap_or_default(),
            Err(error) => {
                warn!(%product, %error, "rendering price input without a minimum");
                String::new()
            }
        };

        let html = PriceInput {
            minimum_price: &minimum_price,
            step: &self.settings.price_step,
            currency_symbol: self.formatter.currency_symbol(),
        }
        .render()?;

        Ok(Some(html))
    }

    /// Add-to-cart validation gate.
    ///
    /// A prior rejection is kept. Products without customer pricing or without a minimum pass the
    /// incoming verdict through. Otherwise the submitted price must be at least the minimum; a
    /// missing or unreadable price fails, as does a malformed stored minimum. Each failure queues
    /// one error notice.
    pub fn validate_add_to_cart(
        &self,
        valid: bool,
        product: ProductId,
        _quantity: u32,
        request: &RequestContext,
        notices: &mut dyn Notices,
    ) -> bool {
        if !valid {
            return false;
        }

        if !self.is_customer_priced(product) {
            return valid;
        }

        let minimum = match config::load_minimum(&self.catalog, product) {
            Ok(Some(minimum)) => minimum,
            Ok(None) => return valid,
            Err(error) => {
                warn!(%product, %error, "rejecting add to cart for misconfigured minimum price");
                notices.add_error_notice(&self.settings.minimum_not_met_notice);

                return false;
            }
        };

        match request.custom_price() {
            Some(price) if price >= minimum => true,
            price => {
                info!(%product, %minimum, ?price, "customer price below minimum");
                notices.add_error_notice(&self.settings.minimum_not_met_notice);

                false
            }
        }
    }

    /// Attach the submitted custom price, if any, to new cart line data.
    pub fn capture_custom_price(
        &self,
        mut data: CartLineData,
        request: &RequestContext,
    ) -> CartLineData {
        if let Some(price) = request.custom_price() {
            debug!(%price, "captured customer price");
            data.set_custom_price(price);
        }

        data
    }

    /// Replace each customer-priced line's unit price with its captured price.
    ///
    /// Administrative requests are skipped unless they are asynchronous storefront calls. Returns
    /// the number of lines repriced.
    pub fn apply_custom_prices(&self, cart: &mut Cart, request: &RequestContext) -> usize {
        if !request.is_storefront() {
            debug!("skipping customer prices for admin request");
            return 0;
        }

        let mut applied = 0;

        for (_, line) in cart.lines_mut() {
            let Some(price) = line.custom_price() else {
                continue;
            };

            if !self.is_customer_priced(line.product()) {
                debug!(product = %line.product(), %price, "ignoring customer price on fixed-price product");
                continue;
            }

            line.set_price(price);
            applied += 1;
        }

        applied
    }

    /// Purchasability override: price-less products are purchasable while customer-priced.
    pub fn is_purchasable(
        &self,
        purchasable: bool,
        product: &Product,
        actor: &Actor,
        permissions: &dyn Permissions,
    ) -> bool {
        purchasability::with_customer_pricing(
            purchasable,
            product,
            actor,
            permissions,
            self.is_customer_priced(product.id),
        )
    }

    /// The captured price, formatted, in place of the default cart line price.
    pub fn format_cart_line_price(&self, price: String, line: &CartLine) -> String {
        match self.display_price(line) {
            Some(custom) => self.formatter.format_price(custom),
            None => price,
        }
    }

    fn display_price(&self, line: &CartLine) -> Option<Decimal> {
        line.custom_price()
            .filter(|_| self.is_customer_priced(line.product()))
    }
}

impl<C, F> LifecycleHooks for CustomPriceLifecycle<C, F>
where
    C: CatalogStore,
    F: PriceFormatter,
{
    fn on_configuration_render(
        &self,
        product: ProductId,
        out: &mut String,
    ) -> Result<(), RenderError> {
        out.push_str(&self.render_configuration(product)?);

        Ok(())
    }

    fn on_configuration_save(&mut self, product: ProductId, form: &FormFields) {
        self.save_configuration(product, form);
    }

    fn on_product_price_input_render(
        &self,
        product: ProductId,
        out: &mut String,
    ) -> Result<(), RenderError> {
        if let Some(html) = self.render_price_input(product)? {
            out.push_str(&html);
        }

        Ok(())
    }

    fn on_add_to_cart_validate(
        &self,
        valid: bool,
        product: ProductId,
        quantity: u32,
        request: &RequestContext,
        notices: &mut dyn Notices,
    ) -> bool {
        self.validate_add_to_cart(valid, product, quantity, request, notices)
    }

    fn on_cart_line_create(&self, data: CartLineData, request: &RequestContext) -> CartLineData {
        self.capture_custom_price(data, request)
    }

    fn on_totals_recompute(&self, cart: &mut Cart, request: &RequestContext) {
        self.apply_custom_prices(cart, request);
    }

    fn on_purchasability_check(
        &self,
        purchasable: bool,
        product: &Product,
        actor: &Actor,
        permissions: &dyn Permissions,
    ) -> bool {
        self.is_purchasable(purchasable, product, actor, permissions)
    }

    fn on_cart_line_format_price(&self, price: String, line: &CartLine) -> String {
        self.format_cart_line_price(price, line)
    }
}
