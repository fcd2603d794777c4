//! Render
//!
//! HTML fragments for the admin product form and the storefront product page. Template values
//! are HTML-escaped.

use askama::Template;
use thiserror::Error;

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Wrapped template error.
    #[error(transparent)]
    Template(#[from] askama::Error),
}

/// Admin product form fields: the customer pricing checkbox and the minimum price.
///
/// The minimum field starts disabled unless customer pricing is on, and an inline script keeps it
/// in step with the checkbox.
#[derive(Debug, Template)]
#[template(
    ext = "html",
    source = r#"<hr style="border-top-color: #ffffff; border-bottom-color: #eeeeee;"/>
<p class="form-field _wcp_allow_customer_set_price_field">
  <label for="_wcp_allow_customer_set_price">Allow customer to set product price?</label>
  <input type="checkbox" class="checkbox" id="_wcp_allow_customer_set_price" name="_wcp_allow_customer_set_price" value="yes"{% if allow_customer_price %} checked="checked"{% endif %}/>
  <span class="woocommerce-help-tip" data-tip="If enabled, customers will be able to set a custom price before adding product to cart."></span>
</p>
<p class="form-field _wcp_minimum_price_field">
  <label for="_wcp_minimum_price">Minimum price ({{ currency_symbol }})</label>
  <input type="text" class="short wc_input_price" data-type="price" id="_wcp_minimum_price" name="_wcp_minimum_price" value="{{ minimum_price }}"{% if !allow_customer_price %} disabled="disabled"{% endif %}/>
{%- if !error.is_empty() %}
  <span class="wcp-error">{{ error }}</span>
{%- endif %}
</p>
<script>
  document.getElementById('_wcp_allow_customer_set_price').addEventListener('change', function(event) {
    document.getElementById('_wcp_minimum_price').disabled = !event.target.checked;
  });
</script>
"#
)]
pub struct AdminPricingFields<'a> {
    /// Checkbox state.
    pub allow_customer_price: bool,

    /// Stored minimum, shown as-is so malformed values can be corrected.
    pub minimum_price: &'a str,

    /// Shop currency symbol.
    pub currency_symbol: &'a str,

    /// Configuration problem to show beside the minimum field; empty for none.
    pub error: &'a str,
}

/// Storefront price input for a customer-priced product.
///
/// `min` is a hint for the browser only; the add-to-cart validation gate enforces the floor.
#[derive(Debug, Template)]
#[template(
    ext = "html",
    source = r#"<div class="wcp-custom-price">
  <label for="wcp_custom_price">Price ({{ currency_symbol }})</label>
  <input type="number" min="{{ minimum_price }}" step="{{ step }}" value="{{ minimum_price }}" id="wcp_custom_price" name="wcp_custom_price"/>
</div>
"#
)]
pub struct PriceInput<'a> {
    /// Minimum price, or empty when there is no floor.
    pub minimum_price: &'a str,

    /// Input step.
    pub step: &'a str,

    /// Shop currency symbol.
    pub currency_symbol: &'a str,
}
