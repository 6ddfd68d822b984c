//! Wallet ledger transactions

use crate::client::{require_id, IntaSendClient};
use crate::http::{path_segment, push_param, QueryParams, RequestOptions};
use crate::invoices::Invoice;
use crate::types::{Currency, Paginated, PaymentState, TransactionType, UpdatedAtFilter};
use crate::{Amount, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TRANSACTIONS_ENDPOINT: &str = "api/v1/transactions/";

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    /// Invoice that funded the entry, if any
    #[serde(default)]
    pub invoice: Option<Invoice>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub value: Amount,
    /// Wallet balance after this entry
    #[serde(default)]
    pub running_balance: Amount,
    #[serde(default)]
    pub narrative: Option<String>,
    pub trans_type: TransactionType,
    pub status: PaymentState,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_timestamp")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }

    pub fn is_deposit(&self) -> bool {
        self.trans_type == TransactionType::Deposit
    }

    pub fn is_withdrawal(&self) -> bool {
        self.trans_type == TransactionType::Withdrawal
    }

    pub fn is_transfer(&self) -> bool {
        self.trans_type == TransactionType::Transfer
    }

    /// Id of the linked invoice
    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice.as_ref().map(|invoice| invoice.invoice_id.as_str())
    }
}

/// Filters for [`IntaSendClient::list_transactions`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub wallet_id: Option<String>,
    pub currency: Option<Currency>,
    pub trans_type: Option<TransactionType>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<PaymentState>,
    pub record_id: Option<String>,
    pub updated_at: Option<UpdatedAtFilter>,
}

impl ListTransactionsParams {
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

    pub fn wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn trans_type(mut self, trans_type: TransactionType) -> Self {
        self.trans_type = Some(trans_type);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Inclusive date range
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn status(mut self, status: PaymentState) -> Self {
        self.status = Some(status);
        self
    }

    pub fn record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn updated_at(mut self, window: UpdatedAtFilter) -> Self {
        self.updated_at = Some(window);
        self
    }
}

impl QueryParams for ListTransactionsParams {
    fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        push_param(&mut query, "page", self.page);
        push_param(&mut query, "page_size", self.page_size);
        push_param(&mut query, "wallet_id", self.wallet_id.as_ref());
        push_param(&mut query, "currency", self.currency.as_ref());
        push_param(&mut query, "trans_type", self.trans_type.as_ref());
        push_param(&mut query, "date", self.date.map(|d| d.format("%Y-%m-%d")));
        push_param(&mut query, "date_from", self.date_from.map(|d| d.format("%Y-%m-%d")));
        push_param(&mut query, "date_to", self.date_to.map(|d| d.format("%Y-%m-%d")));
        push_param(&mut query, "status", self.status.as_ref());
        push_param(&mut query, "record_id", self.record_id.as_ref());
        push_param(&mut query, "updated_at", self.updated_at.map(|w| w.as_str()));
        query
    }
}

impl IntaSendClient {
    /// List ledger entries across all wallets
    pub async fn list_transactions(
        &self,
        params: Option<&ListTransactionsParams>,
    ) -> Result<Paginated<Transaction>> {
        self.require_token()?;
        let query = params.map(QueryParams::to_query).unwrap_or_default();
        let options = RequestOptions::get(TRANSACTIONS_ENDPOINT)
            .query_params(query)
            .with_token();
        self.execute_json(options).await
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.require_token()?;
        let transaction_id = require_id(transaction_id, "transaction id")?;
        let endpoint = format!("{}{}/", TRANSACTIONS_ENDPOINT, path_segment(transaction_id));
        self.execute_json(RequestOptions::get(endpoint).with_token())
            .await
    }
}
