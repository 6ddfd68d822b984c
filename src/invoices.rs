//! Invoices
//!
//! An invoice is created for every collection attempt. The same record shape
//! is embedded in payment status responses and in wallet transactions.

use crate::client::{require_id, IntaSendClient};
use crate::http::{path_segment, push_param, QueryParams, RequestOptions};
use crate::types::{CardInfo, Currency, Paginated, PaymentState};
use crate::{Amount, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INVOICES_ENDPOINT: &str = "api/v1/invoices/";

/// A collection invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Only present on payment status responses, where it equals `invoice_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub invoice_id: String,
    pub state: PaymentState,
    #[serde(default)]
    pub provider: Option<String>,
    /// Processing fee
    #[serde(default)]
    pub charges: Amount,
    /// Amount credited after charges
    #[serde(default)]
    pub net_amount: Amount,
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Amount paid by the customer
    #[serde(default)]
    pub value: Amount,
    /// Customer phone number or email
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub api_ref: Option<String>,
    #[serde(default)]
    pub clearing_status: Option<String>,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_text")]
    pub mpesa_reference: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub card_info: Option<CardInfo>,
    #[serde(default)]
    pub retry_count: Option<u32>,
    #[serde(default)]
    pub failed_reason: Option<String>,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_text")]
    pub failed_code: Option<String>,
    #[serde(default)]
    pub failed_code_link: Option<String>,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_timestamp")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Invoice {
    /// True for both `COMPLETE` and `COMPLETED`
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failed_reason.as_deref()
    }

    pub fn mpesa_reference(&self) -> Option<&str> {
        self.mpesa_reference.as_deref()
    }
}

/// Filters for [`IntaSendClient::list_invoices`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListInvoicesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub state: Option<PaymentState>,
    pub currency: Option<Currency>,
    pub api_ref: Option<String>,
}

impl ListInvoicesParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn state(mut self, state: PaymentState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn api_ref(mut self, api_ref: impl Into<String>) -> Self {
        self.api_ref = Some(api_ref.into());
        self
    }
}

impl QueryParams for ListInvoicesParams {
    fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        push_param(&mut query, "page", self.page);
        push_param(&mut query, "page_size", self.page_size);
        push_param(&mut query, "state", self.state.as_ref());
        push_param(&mut query, "currency", self.currency.as_ref());
        push_param(&mut query, "api_ref", self.api_ref.as_ref());
        query
    }
}

impl IntaSendClient {
    /// List invoices, newest first
    pub async fn list_invoices(
        &self,
        params: Option<&ListInvoicesParams>,
    ) -> Result<Paginated<Invoice>> {
        self.require_token()?;
        let query = params.map(QueryParams::to_query).unwrap_or_default();
        let options = RequestOptions::get(INVOICES_ENDPOINT)
            .query_params(query)
            .with_token();
        self.execute_json(options).await
    }

    /// Fetch one invoice by id
    pub async fn get_invoice(&self, invoice_id: &str) -> Result<Invoice> {
        self.require_token()?;
        let invoice_id = require_id(invoice_id, "invoice id")?;
        let endpoint = format!("{}{}/", INVOICES_ENDPOINT, path_segment(invoice_id));
        self.execute_json(RequestOptions::get(endpoint).with_token())
            .await
    }
}
