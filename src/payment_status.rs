//! Payment status lookups

use crate::client::{require_id, IntaSendClient};
use crate::invoices::Invoice;
use crate::types::{deserialize_loose_timestamp, null_as_default, Currency, PaymentState};
use crate::{Amount, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

const PAYMENT_STATUS_ENDPOINT: &str = "api/v1/payment/status/";

/// Current state of a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub invoice: Invoice,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: StatusMeta,
}

/// Metadata attached to a payment status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMeta {
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub customer: Customer,
    pub customer_comment: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_timestamp")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "deserialize_loose_timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// The paying customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub provider: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_timestamp")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "deserialize_loose_timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl PaymentStatus {
    pub fn state(&self) -> &PaymentState {
        &self.invoice.state
    }

    /// True for both `COMPLETE` and `COMPLETED`
    pub fn is_completed(&self) -> bool {
        self.invoice.state.is_completed()
    }

    pub fn is_pending(&self) -> bool {
        self.invoice.state.is_pending()
    }

    pub fn is_processing(&self) -> bool {
        self.invoice.state.is_processing()
    }

    pub fn is_failed(&self) -> bool {
        self.invoice.state.is_failed()
    }

    pub fn is_cancelled(&self) -> bool {
        self.invoice.state.is_cancelled()
    }

    /// Completed, failed or cancelled
    pub fn is_final(&self) -> bool {
        self.invoice.state.is_final()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.invoice.failure_reason()
    }

    pub fn net_amount(&self) -> Amount {
        self.invoice.net_amount
    }

    pub fn charges(&self) -> Amount {
        self.invoice.charges
    }

    pub fn value(&self) -> Amount {
        self.invoice.value
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.invoice.currency.as_ref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.invoice.provider.as_deref()
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice.invoice_id
    }

    pub fn api_ref(&self) -> Option<&str> {
        self.invoice.api_ref.as_deref()
    }

    pub fn customer_email(&self) -> Option<&str> {
        present(&self.meta.customer.email)
    }

    pub fn customer_phone(&self) -> Option<&str> {
        present(&self.meta.customer.phone_number)
    }

    /// First and last name joined by a space, skipping whichever is missing
    pub fn customer_name(&self) -> Option<String> {
        let customer = &self.meta.customer;
        match (present(&customer.first_name), present(&customer.last_name)) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }

    /// One-line human readable description of the state
    pub fn summary(&self) -> String {
        match &self.invoice.state {
            PaymentState::Completed => "Payment completed successfully".to_string(),
            PaymentState::Pending => "Payment is pending completion".to_string(),
            PaymentState::Processing => "Payment is being processed".to_string(),
            PaymentState::Cancelled => "Payment was cancelled".to_string(),
            PaymentState::Failed => match self.failure_reason().filter(|r| !r.is_empty()) {
                Some(reason) => format!("Payment failed: {}", reason),
                None => "Payment failed".to_string(),
            },
            PaymentState::Other(state) => format!("Unknown payment status: {}", state),
        }
    }
}

impl IntaSendClient {
    /// Look up the state of a payment by invoice id
    ///
    /// Requires the publishable key; the token is attached when configured.
    pub async fn payment_status(&self, invoice_id: &str) -> Result<PaymentStatus> {
        self.require_publishable_key()?;
        let invoice_id = require_id(invoice_id, "invoice id")?;
        let payload = serde_json::json!({ "invoice_id": invoice_id });
        self.post_json(PAYMENT_STATUS_ENDPOINT, &payload, true, true)
            .await
    }

    /// Alias of [`IntaSendClient::payment_status`]
    pub async fn check_payment_status(&self, invoice_id: &str) -> Result<PaymentStatus> {
        self.payment_status(invoice_id).await
    }
}
