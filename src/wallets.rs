//! Wallets and their ledgers

use crate::client::{require_id, IntaSendClient};
use crate::http::{path_segment, push_param, QueryParams, RequestOptions};
use crate::transactions::Transaction;
use crate::types::{Currency, Paginated, UpdatedAtFilter, WalletType};
use crate::{Amount, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WALLETS_ENDPOINT: &str = "api/v1/wallets/";

/// A merchant wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub wallet_id: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Whether payouts may be sent from this wallet
    #[serde(default)]
    pub can_disburse: bool,
    #[serde(default)]
    pub currency: Option<Currency>,
    pub wallet_type: WalletType,
    #[serde(default)]
    pub current_balance: Amount,
    /// Balance minus funds still clearing
    #[serde(default)]
    pub available_balance: Amount,
    #[serde(default, deserialize_with = "crate::types::deserialize_loose_timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Filters for [`IntaSendClient::list_wallets`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWalletsParams {
    pub can_disburse: Option<bool>,
    pub currency: Option<Currency>,
    pub label: Option<String>,
    pub page: Option<u32>,
    pub record_id: Option<String>,
    pub updated_at: Option<UpdatedAtFilter>,
    pub wallet_type: Option<WalletType>,
}

impl ListWalletsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_disburse(mut self, can_disburse: bool) -> Self {
        self.can_disburse = Some(can_disburse);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
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

    pub fn wallet_type(mut self, wallet_type: WalletType) -> Self {
        self.wallet_type = Some(wallet_type);
        self
    }
}

impl QueryParams for ListWalletsParams {
    fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        push_param(&mut query, "can_disburse", self.can_disburse);
        push_param(&mut query, "currency", self.currency.as_ref());
        push_param(&mut query, "label", self.label.as_ref());
        push_param(&mut query, "page", self.page);
        push_param(&mut query, "record_id", self.record_id.as_ref());
        push_param(&mut query, "updated_at", self.updated_at.map(|w| w.as_str()));
        push_param(&mut query, "wallet_type", self.wallet_type.as_ref());
        query
    }
}

/// Pagination for [`IntaSendClient::list_wallet_transactions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletTransactionsParams {
    pub page: Option<u32>,
}

impl WalletTransactionsParams {
    pub fn page(page: u32) -> Self {
        Self { page: Some(page) }
    }
}

impl QueryParams for WalletTransactionsParams {
    fn to_query(&self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        push_param(&mut query, "page", self.page);
        query
    }
}

impl IntaSendClient {
    pub async fn list_wallets(&self, params: Option<&ListWalletsParams>) -> Result<Paginated<Wallet>> {
        self.require_token()?;
        let query = params.map(QueryParams::to_query).unwrap_or_default();
        let options = RequestOptions::get(WALLETS_ENDPOINT)
            .query_params(query)
            .with_token();
        self.execute_json(options).await
    }

    pub async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet> {
        self.require_token()?;
        let wallet_id = require_id(wallet_id, "wallet id")?;
        let endpoint = format!("{}{}/", WALLETS_ENDPOINT, path_segment(wallet_id));
        self.execute_json(RequestOptions::get(endpoint).with_token())
            .await
    }

    /// List the ledger of a single wallet
    pub async fn list_wallet_transactions(
        &self,
        wallet_id: &str,
        params: Option<&WalletTransactionsParams>,
    ) -> Result<Paginated<Transaction>> {
        self.require_token()?;
        let wallet_id = require_id(wallet_id, "wallet id")?;
        let endpoint = format!("{}{}/transactions/", WALLETS_ENDPOINT, path_segment(wallet_id));
        let query = params.map(QueryParams::to_query).unwrap_or_default();
        self.execute_json(RequestOptions::get(endpoint).query_params(query).with_token())
            .await
    }
}
