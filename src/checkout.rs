//! Hosted checkout links
//!
//! A checkout request is posted with the publishable key only; the response
//! carries the URL the customer is sent to.

use crate::client::IntaSendClient;
use crate::types::{Currency, PaymentMethod, Tariff};
use crate::{Amount, Result};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const CHECKOUT_ENDPOINT: &str = "api/v1/checkout/";

/// Payload for creating a checkout link
///
/// Unset fields are left out of the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sent as a JSON number
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Merchant's own reference for the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// Restrict the checkout page to a single method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(rename = "card_tarrif", skip_serializing_if = "Option::is_none")]
    pub card_tariff: Option<Tariff>,
    #[serde(rename = "mobile_tarrif", skip_serializing_if = "Option::is_none")]
    pub mobile_tariff: Option<Tariff>,
}

impl CheckoutRequest {
    /// Start a builder preset to KES with the customer paying both tariffs
    pub fn builder() -> CheckoutRequestBuilder {
        CheckoutRequestBuilder::new()
    }

    fn apply_defaults(&mut self) {
        self.currency.get_or_insert(Currency::Kes);
        self.card_tariff.get_or_insert(Tariff::CustomerPays);
        self.mobile_tariff.get_or_insert(Tariff::CustomerPays);
    }
}

/// Fluent builder for [`CheckoutRequest`]
///
/// No validation happens here; the API rejects bad input when the request is
/// submitted.
#[derive(Debug, Clone)]
pub struct CheckoutRequestBuilder {
    request: CheckoutRequest,
}

impl CheckoutRequestBuilder {
    pub fn new() -> Self {
        let mut request = CheckoutRequest::default();
        request.apply_defaults();
        Self { request }
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.request.phone_number = Some(phone_number.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.request.email = Some(email.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<Decimal>) -> Self {
        self.request.amount = Some(amount.into());
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.request.currency = Some(currency);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.request.comment = Some(comment.into());
        self
    }

    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.request.redirect_url = Some(redirect_url.into());
        self
    }

    pub fn api_ref(mut self, api_ref: impl Into<String>) -> Self {
        self.request.api_ref = Some(api_ref.into());
        self
    }

    /// Customer first and last name
    pub fn customer_info(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.request.first_name = Some(first_name.into());
        self.request.last_name = Some(last_name.into());
        self
    }

    pub fn billing_address(
        mut self,
        country: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        self.request.country = Some(country.into());
        self.request.address = Some(address.into());
        self.request.city = Some(city.into());
        self.request.state = Some(state.into());
        self.request.zipcode = Some(zipcode.into());
        self
    }

    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.request.method = Some(method);
        self
    }

    pub fn card_tariff(mut self, tariff: Tariff) -> Self {
        self.request.card_tariff = Some(tariff);
        self
    }

    pub fn mobile_tariff(mut self, tariff: Tariff) -> Self {
        self.request.mobile_tariff = Some(tariff);
        self
    }

    pub fn build(self) -> CheckoutRequest {
        self.request
    }

    /// Build the request and create the checkout link in one step
    pub async fn submit(self, client: &IntaSendClient) -> Result<CheckoutResponse> {
        client.create_checkout(self.build()).await
    }
}

impl Default for CheckoutRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colours and fonts of the hosted checkout page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutStyles {
    pub component_background_color: Option<String>,
    pub unselected_card_background_color: Option<String>,
    pub selected_card_background_color: Option<String>,
    pub selected_border_color: Option<String>,
    pub unselected_border_color: Option<String>,
    pub selected_font_color: Option<String>,
    pub unselected_font_color: Option<String>,
    pub selected_card_shadow: Option<String>,
    pub unselected_card_shadow: Option<String>,
    pub border_radius: Option<String>,
    pub input_label_color: Option<String>,
    pub input_text_color: Option<String>,
    pub input_background_color: Option<String>,
    pub input_border_color: Option<String>,
    pub input_border_radius: Option<String>,
    pub cta_bg_color: Option<String>,
    pub cta_font_color: Option<String>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
}

/// A created checkout link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutResponse {
    pub id: String,
    /// Hosted checkout page to redirect the customer to
    pub url: String,
    pub signature: Option<String>,
    pub tracking_id: Option<String>,
    pub methods: Vec<String>,
    pub layout: Option<String>,
    pub styles: CheckoutStyles,
    pub merchant_name: Option<String>,
    pub merchant_id: Option<String>,
    pub merchant_full_name: Option<String>,
    pub merchant_logo: Option<serde_json::Value>,
    pub merchant_email: Option<String>,
    pub merchant_origin: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub api_ref: Option<String>,
    pub wallet_id: Option<String>,
    pub method: Option<String>,
    pub channel: Option<String>,
    pub host: Option<String>,
    pub is_mobile: bool,
    pub version: Option<serde_json::Value>,
    pub redirect_url: Option<String>,
    pub amount: Amount,
    pub currency: Option<Currency>,
    pub paid: bool,
    #[serde(rename = "mobile_tarrif")]
    pub mobile_tariff: Option<String>,
    #[serde(rename = "card_tarrif")]
    pub card_tariff: Option<String>,
    #[serde(rename = "bitcoin_tarrif")]
    pub bitcoin_tariff: Option<String>,
    #[serde(rename = "ach_tarrif")]
    pub ach_tariff: Option<String>,
    #[serde(rename = "bank_tarrif")]
    pub bank_tariff: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Rough sanity check for an email address
///
/// Only checks length and the presence of `@` and `.`; real validation is
/// left to the API.
pub fn validate_email(email: &str) -> bool {
    email.len() > 3 && email.len() < 255 && email.contains('@') && email.contains('.')
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl IntaSendClient {
    /// Create a hosted checkout link
    ///
    /// Requires the publishable key. An unset currency becomes KES and unset
    /// tariffs become `CUSTOMER-PAYS`.
    pub async fn create_checkout(&self, mut request: CheckoutRequest) -> Result<CheckoutResponse> {
        self.require_publishable_key()?;
        request.apply_defaults();
        self.post_json(CHECKOUT_ENDPOINT, &request, false, true).await
    }

    /// Create a checkout link from the handful of fields most callers need
    ///
    /// Empty strings are treated as absent.
    pub async fn quick_checkout(
        &self,
        phone_number: &str,
        email: &str,
        amount: Decimal,
        currency: Currency,
        comment: &str,
        redirect_url: &str,
    ) -> Result<CheckoutResponse> {
        let request = CheckoutRequest {
            phone_number: non_empty(phone_number),
            email: non_empty(email),
            amount: Some(amount),
            currency: Some(currency),
            comment: non_empty(comment),
            redirect_url: non_empty(redirect_url),
            ..Default::default()
        };
        self.create_checkout(request).await
    }
}
