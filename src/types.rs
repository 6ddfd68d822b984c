//! Shared types for the IntaSend API

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Production API host
pub const PRODUCTION_BASE_URL: &str = "https://payment.intasend.com";

/// Sandbox API host
pub const SANDBOX_BASE_URL: &str = "https://sandbox.intasend.com";

/// Which IntaSend deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// Select the environment from a test-mode flag
    pub fn from_test_mode(test: bool) -> Self {
        if test {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    /// Base URL every relative endpoint is joined to
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

/// Currencies supported by checkout
///
/// `Other` only appears on values read back from the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Kes,
    Usd,
    Gbp,
    Eur,
    Ghs,
    Ngn,
    Ugx,
    Tzs,
    Xaf,
    Xof,
    Other(String),
}

impl Currency {
    pub fn as_str(&self) -> &str {
        match self {
            Currency::Kes => "KES",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Ghs => "GHS",
            Currency::Ngn => "NGN",
            Currency::Ugx => "UGX",
            Currency::Tzs => "TZS",
            Currency::Xaf => "XAF",
            Currency::Xof => "XOF",
            Currency::Other(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "KES" => Currency::Kes,
            "USD" => Currency::Usd,
            "GBP" => Currency::Gbp,
            "EUR" => Currency::Eur,
            "GHS" => Currency::Ghs,
            "NGN" => Currency::Ngn,
            "UGX" => Currency::Ugx,
            "TZS" => Currency::Tzs,
            "XAF" => Currency::Xaf,
            "XOF" => Currency::Xof,
            _ => Currency::Other(code),
        }
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an invoice, payment or transaction
///
/// The API reports completion as `COMPLETE` on some endpoints and
/// `COMPLETED` on others. Both decode to [`PaymentState::Completed`], which
/// is written back out as `COMPLETED`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentState {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Other(String),
}

impl PaymentState {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentState::Pending => "PENDING",
            PaymentState::Processing => "PROCESSING",
            PaymentState::Completed => "COMPLETED",
            PaymentState::Failed => "FAILED",
            PaymentState::Cancelled => "CANCELLED",
            PaymentState::Other(state) => state,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentState::Completed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentState::Pending)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, PaymentState::Processing)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PaymentState::Failed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PaymentState::Cancelled)
    }

    /// Completed, failed and cancelled are terminal
    pub fn is_final(&self) -> bool {
        self.is_completed() || self.is_failed() || self.is_cancelled()
    }
}

impl From<String> for PaymentState {
    fn from(state: String) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "PENDING" => PaymentState::Pending,
            "PROCESSING" => PaymentState::Processing,
            "COMPLETE" | "COMPLETED" => PaymentState::Completed,
            "FAILED" => PaymentState::Failed,
            "CANCELLED" | "CANCELED" => PaymentState::Cancelled,
            _ => PaymentState::Other(state),
        }
    }
}

impl From<PaymentState> for String {
    fn from(state: PaymentState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of wallet ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Charge,
    Refund,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Charge => "CHARGE",
            TransactionType::Refund => "REFUND",
            TransactionType::Other(kind) => kind,
        }
    }
}

impl From<String> for TransactionType {
    fn from(kind: String) -> Self {
        match kind.to_ascii_uppercase().as_str() {
            "DEPOSIT" => TransactionType::Deposit,
            "WITHDRAWAL" => TransactionType::Withdrawal,
            "TRANSFER" => TransactionType::Transfer,
            "CHARGE" => TransactionType::Charge,
            "REFUND" => TransactionType::Refund,
            _ => TransactionType::Other(kind),
        }
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wallet category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WalletType {
    Settlement,
    Working,
    Other(String),
}

impl WalletType {
    pub fn as_str(&self) -> &str {
        match self {
            WalletType::Settlement => "SETTLEMENT",
            WalletType::Working => "WORKING",
            WalletType::Other(kind) => kind,
        }
    }
}

impl From<String> for WalletType {
    fn from(kind: String) -> Self {
        match kind.to_ascii_uppercase().as_str() {
            "SETTLEMENT" => WalletType::Settlement,
            "WORKING" => WalletType::Working,
            _ => WalletType::Other(kind),
        }
    }
}

impl From<WalletType> for String {
    fn from(kind: WalletType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which party absorbs a payment method's processing fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tariff {
    #[serde(rename = "BUSINESS-PAYS")]
    BusinessPays,
    #[default]
    #[serde(rename = "CUSTOMER-PAYS")]
    CustomerPays,
}

impl Tariff {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tariff::BusinessPays => "BUSINESS-PAYS",
            Tariff::CustomerPays => "CUSTOMER-PAYS",
        }
    }
}

impl FromStr for Tariff {
    type Err = crate::IntaSendError;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value {
            "BUSINESS-PAYS" => Ok(Tariff::BusinessPays),
            "CUSTOMER-PAYS" => Ok(Tariff::CustomerPays),
            other => Err(crate::IntaSendError::validation(format!(
                "unknown tariff: {}",
                other
            ))),
        }
    }
}

/// Payment method a checkout can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "M-PESA")]
    MPesa,
    #[serde(rename = "CARD-PAYMENT")]
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MPesa => "M-PESA",
            PaymentMethod::Card => "CARD-PAYMENT",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = crate::IntaSendError;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value {
            "M-PESA" => Ok(PaymentMethod::MPesa),
            "CARD-PAYMENT" => Ok(PaymentMethod::Card),
            other => Err(crate::IntaSendError::validation(format!(
                "unknown payment method: {}",
                other
            ))),
        }
    }
}

/// Relative window for `updated_at` list filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatedAtFilter {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl UpdatedAtFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatedAtFilter::Today => "today",
            UpdatedAtFilter::Yesterday => "yesterday",
            UpdatedAtFilter::ThisWeek => "week",
            UpdatedAtFilter::ThisMonth => "month",
            UpdatedAtFilter::ThisYear => "year",
        }
    }
}

/// Standard paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of records across all pages
    #[serde(default)]
    pub count: u64,
    /// URL of the next page
    pub next: Option<String>,
    /// URL of the previous page
    pub previous: Option<String>,
    /// Records on this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Card metadata attached to card-funded invoices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub bin_country: Option<String>,
    pub card_type: Option<String>,
}

/// Error envelope returned by the API on failures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Read `null` as the type's default, for nested records the API sometimes nulls out
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a field whose JSON type varies between responses, keeping its text form
///
/// Strings are kept as-is, numbers and booleans are rendered, objects and
/// arrays become compact JSON.
pub(crate) fn deserialize_loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    };
    Ok(text)
}

/// Read an RFC 3339 timestamp; empty or unparseable text reads as `None`
pub(crate) fn deserialize_loose_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = deserialize_loose_text(deserializer)?;
    Ok(text.and_then(|text| DateTime::parse_from_rfc3339(text.trim()).ok()))
}
