//! Lifecycle Hooks
//!
//! The host fires a named event at each point of its product, cart and checkout pipeline.
//! Handlers implement [`LifecycleHooks`]; every method defaults to passing its input through, so a
//! handler only overrides the events it cares about. A [`HookChain`] runs several handlers in
//! registration order, feeding each filter's output into the next.

use std::fmt;

use crate::{
    cart::{Cart, CartLine, CartLineData},
    notices::Notices,
    products::{Product, ProductId},
    purchasability::{Actor, Permissions},
    render::RenderError,
    request::{FormFields, RequestContext},
};

/// Host lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Admin product form pricing section is rendered.
    ConfigurationRender,

    /// Admin product form is saved.
    ConfigurationSave,

    /// Storefront product page renders the add-to-cart form.
    ProductPriceInputRender,

    /// A product is about to be added to the cart.
    AddToCartValidate,

    /// Cart line data is being built for a new line.
    CartLineCreate,

    /// Cart totals are about to be computed.
    TotalsRecompute,

    /// The host asks whether a product can be bought.
    PurchasabilityCheck,

    /// A cart line's unit price is formatted for display.
    CartLineFormatPrice,
}

impl LifecycleEvent {
    /// Every event.
    pub const ALL: [Self; 8] = [
        Self::ConfigurationRender,
        Self::ConfigurationSave,
        Self::ProductPriceInputRender,
        Self::AddToCartValidate,
        Self::CartLineCreate,
        Self::TotalsRecompute,
        Self::PurchasabilityCheck,
        Self::CartLineFormatPrice,
    ];

    /// Host-facing event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConfigurationRender => "onConfigurationRender",
            Self::ConfigurationSave => "onConfigurationSave",
            Self::ProductPriceInputRender => "onProductPriceInputRender",
            Self::AddToCartValidate => "onAddToCartValidate",
            Self::CartLineCreate => "onCartLineCreate",
            Self::TotalsRecompute => "onTotalsRecompute",
            Self::PurchasabilityCheck => "onPurchasabilityCheck",
            Self::CartLineFormatPrice => "onCartLineFormatPrice",
        }
    }

    /// Look up an event by its host-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed handlers for host lifecycle events.
pub trait LifecycleHooks {
    /// Events this handler subscribes to. A chain skips the handler for all others.
    fn subscriptions(&self) -> &[LifecycleEvent] {
        &LifecycleEvent::ALL
    }

    /// Append admin form fields for a product.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if a template fails to render.
    fn on_configuration_render(
        &self,
        _product: ProductId,
        _out: &mut String,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    /// Persist admin form fields for a product.
    fn on_configuration_save(&mut self, _product: ProductId, _form: &FormFields) {}

    /// Append storefront inputs to the add-to-cart form.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if a template fails to render.
    fn on_product_price_input_render(
        &self,
        _product: ProductId,
        _out: &mut String,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    /// Filter the add-to-cart validity verdict.
    fn on_add_to_cart_validate(
        &self,
        valid: bool,
        _product: ProductId,
        _quantity: u32,
        _request: &RequestContext,
        _notices: &mut dyn Notices,
    ) -> bool {
        valid
    }

    /// Filter the data of a new cart line.
    fn on_cart_line_create(&self, data: CartLineData, _request: &RequestContext) -> CartLineData {
        data
    }

    /// Adjust cart lines before totals are computed.
    fn on_totals_recompute(&self, _cart: &mut Cart, _request: &RequestContext) {}

    /// Filter the purchasability verdict.
    fn on_purchasability_check(
        &self,
        purchasable: bool,
        _product: &Product,
        _actor: &Actor,
        _permissions: &dyn Permissions,
    ) -> bool {
        purchasable
    }

    /// Filter a cart line's formatted unit price.
    fn on_cart_line_format_price(&self, price: String, _line: &CartLine) -> String {
        price
    }
}

/// Ordered set of handlers, itself a handler.
#[derive(Default)]
pub struct HookChain {
    handlers: Vec<Box<dyn LifecycleHooks>>,
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl HookChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after every handler registered before it.
    pub fn register(&mut self, handler: impl LifecycleHooks + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of handlers subscribed to an event.
    pub fn subscribers(&self, event: LifecycleEvent) -> usize {
        self.subscribed(event).count()
    }

    fn subscribed(&self, event: LifecycleEvent) -> impl Iterator<Item = &dyn LifecycleHooks> {
        self.handlers
            .iter()
            .map(|handler| &**handler)
            .filter(move |handler| handler.subscriptions().contains(&event))
    }
}

impl LifecycleHooks for HookChain {
    fn on_configuration_render(
        &self,
        product: ProductId,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for handler in self.subscribed(LifecycleEvent::ConfigurationRender) {
            handler.on_configuration_render(product, out)?;
        }

        Ok(())
    }

    fn on_configuration_save(&mut self, product: ProductId, form: &FormFields) {
        for handler in &mut self.handlers {
            if handler
                .subscriptions()
                .contains(&LifecycleEvent::ConfigurationSave)
            {
                handler.on_configuration_save(product, form);
            }
        }
    }

    fn on_product_price_input_render(
        &self,
        product: ProductId,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for handler in self.subscribed(LifecycleEvent::ProductPriceInputRender) {
            handler.on_product_price_input_render(product, out)?;
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
        let mut valid = valid;

        for handler in self.subscribed(LifecycleEvent::AddToCartValidate) {
            valid = handler.on_add_to_cart_validate(valid, product, quantity, request, notices);
        }

        valid
    }

    fn on_cart_line_create(&self, data: CartLineData, request: &RequestContext) -> CartLineData {
        self.subscribed(LifecycleEvent::CartLineCreate)
            .fold(data, |data, handler| handler.on_cart_line_create(data, request))
    }

    fn on_totals_recompute(&self, cart: &mut Cart, request: &RequestContext) {
        for handler in self.subscribed(LifecycleEvent::TotalsRecompute) {
            handler.on_totals_recompute(cart, request);
        }
    }

    fn on_purchasability_check(
        &self,
        purchasable: bool,
        product: &Product,
        actor: &Actor,
        permissions: &dyn Permissions,
    ) -> bool {
        self.subscribed(LifecycleEvent::PurchasabilityCheck)
            .fold(purchasable, |purchasable, handler| {
                handler.on_purchasability_check(purchasable, product, actor, permissions)
            })
    }

    fn on_cart_line_format_price(&self, price: String, line: &CartLine) -> String {
        self.subscribed(LifecycleEvent::CartLineFormatPrice)
            .fold(price, |price, handler| {
                handler.on_cart_line_format_price(price, line)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notices::NoticeLog;

    #[derive(Debug)]
    struct Reject;

    impl LifecycleHooks for Reject {
        fn subscriptions(&self) -> &[LifecycleEvent] {
            &[LifecycleEvent::AddToCartValidate]
        }

        fn on_add_to_cart_validate(
            &self,
            _valid: bool,
            _product: ProductId,
            _quantity: u32,
            _request: &RequestContext,
            notices: &mut dyn Notices,
        ) -> bool {
            notices.add_error_notice("rejected");
            false
        }

        fn on_cart_line_format_price(&self, _price: String, _line: &CartLine) -> String {
            "never".to_string()
        }
    }

    #[derive(Debug)]
    struct Suffix(&'static str);

    impl LifecycleHooks for Suffix {
        fn on_cart_line_format_price(&self, price: String, _line: &CartLine) -> String {
            price + self.0
        }
    }

    #[test]
    fn event_names_round_trip() {
        for event in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_name(event.name()), Some(event));
        }

        assert_eq!(LifecycleEvent::from_name("onSomethingElse"), None);
        assert_eq!(
            LifecycleEvent::TotalsRecompute.to_string(),
            "onTotalsRecompute"
        );
    }

    #[test]
    fn empty_chain_passes_values_through() {
        let chain = HookChain::new();
        let mut notices = NoticeLog::new();
        let request = RequestContext::default();

        assert!(chain.on_add_to_cart_validate(true, ProductId::new(1), 1, &request, &mut notices));
        assert!(!chain.on_add_to_cart_validate(false, ProductId::new(1), 1, &request, &mut notices));
        assert!(notices.is_empty());
    }

    #[test]
    fn filters_run_in_registration_order() {
        let mut chain = HookChain::new();
        chain.register(Suffix("a")).register(Suffix("b"));

        let line = CartLine::new(ProductId::new(1), 1, None, CartLineData::new());

        assert_eq!(chain.on_cart_line_format_price("£1".to_string(), &line), "£1ab");
    }

    #[test]
    fn unsubscribed_handlers_are_skipped() {
        let mut chain = HookChain::new();
        chain.register(Reject).register(Suffix("!"));

        let line = CartLine::new(ProductId::new(1), 1, None, CartLineData::new());

        assert_eq!(chain.subscribers(LifecycleEvent::CartLineFormatPrice), 1);
        assert_eq!(chain.subscribers(LifecycleEvent::AddToCartValidate), 2);
        assert_eq!(chain.on_cart_line_format_price("£1".to_string(), &line), "£1!");
    }

    #[test]
    fn validation_verdict_threads_through_handlers() {
        let mut chain = HookChain::new();
        chain.register(Reject).register(Suffix(""));

        let mut notices = NoticeLog::new();
        let valid = chain.on_add_to_cart_validate(
            true,
            ProductId::new(1),
            1,
            &RequestContext::default(),
            &mut notices,
        );

        assert!(!valid);
        assert_eq!(notices.errors().collect::<Vec<_>>(), ["rejected"]);
    }
}
