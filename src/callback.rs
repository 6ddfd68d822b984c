//! Collection webhook payloads
//!
//! IntaSend posts one of these to the merchant's webhook URL whenever an
//! invoice changes state. The `challenge` field echoes the secret configured
//! for the webhook and should be checked before trusting the payload.

use crate::types::{Currency, PaymentState};
use crate::{Amount, IntaSendError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Body of a collection webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCallback {
    pub invoice_id: String,
    /// State exactly as sent, so the payload re-serializes unchanged
    pub state: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub charges: Amount,
    #[serde(default)]
    pub net_amount: Amount,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub value: Amount,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub api_ref: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
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
    /// Webhook secret echoed back by IntaSend
    #[serde(default)]
    pub challenge: String,
}

impl CollectionCallback {
    /// Parse a raw webhook body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(IntaSendError::Deserialization)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(IntaSendError::Serialization)
    }

    /// Compare the echoed challenge with the configured webhook secret
    pub fn matches_challenge(&self, expected: &str) -> bool {
        let actual = self.challenge.as_bytes();
        let expected = expected.as_bytes();
        if expected.is_empty() || actual.len() != expected.len() {
            return false;
        }
        actual
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Parsed state; `COMPLETE` and `COMPLETED` both read as completed
    pub fn payment_state(&self) -> PaymentState {
        PaymentState::from(self.state.clone())
    }

    pub fn is_completed(&self) -> bool {
        self.payment_state().is_completed()
    }

    pub fn is_failed(&self) -> bool {
        self.payment_state().is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const PAYLOAD: &[u8] = br#"{
        "invoice_id": "NR5XKGY",
        "state": "COMPLETE",
        "provider": "M-PESA",
        "charges": "0.30",
        "net_amount": "9.70",
        "currency": "KES",
        "value": "10.00",
        "account": "254712345678",
        "api_ref": "order-1001",
        "host": "https://acme.example",
        "failed_reason": null,
        "failed_code": null,
        "failed_code_link": null,
        "created_at": "2024-03-01T10:15:30.123456+03:00",
        "updated_at": "2024-03-01T10:16:02.481000+03:00",
        "challenge": "intasendwebhook"
    }"#;

    #[test]
    fn test_parse_webhook() {
        let callback = CollectionCallback::from_slice(PAYLOAD).unwrap();
        assert_eq!(callback.invoice_id, "NR5XKGY");
        assert!(callback.is_completed());
        assert_eq!(callback.payment_state(), PaymentState::Completed);
        assert_eq!(callback.net_amount.value(), Decimal::new(970, 2));
        assert_eq!(callback.value.value(), Decimal::new(10, 0));
        assert!(callback.matches_challenge("intasendwebhook"));
        assert!(!callback.matches_challenge("intasendwebhooK"));
        assert!(!callback.matches_challenge(""));
    }

    #[test]
    fn test_amounts_written_as_strings() {
        let callback = CollectionCallback::from_slice(PAYLOAD).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&callback.to_vec().unwrap()).unwrap();
        assert_eq!(value["net_amount"], "9.70");
        assert_eq!(value["state"], "COMPLETE");
        assert_eq!(value["challenge"], "intasendwebhook");
    }

    #[test]
    fn test_state_text_survives_reserialization() {
        let callback = CollectionCallback::from_slice(PAYLOAD).unwrap();
        let again = CollectionCallback::from_slice(&callback.to_vec().unwrap()).unwrap();
        assert_eq!(again.state, "COMPLETE");
        assert_eq!(again, callback);
    }

    #[test]
    fn test_webhook_with_nulls_and_numeric_failure_code() {
        let callback = CollectionCallback::from_slice(
            br#"{
                "invoice_id": "NR5XKGY",
                "state": "FAILED",
                "charges": null,
                "net_amount": null,
                "value": "10.00",
                "failed_reason": "Insufficient balance",
                "failed_code": 1032,
                "created_at": "",
                "updated_at": null,
                "challenge": "intasendwebhook"
            }"#,
        )
        .unwrap();
        assert!(callback.is_failed());
        assert!(callback.charges.is_zero());
        assert!(callback.net_amount.is_zero());
        assert_eq!(callback.failed_code.as_deref(), Some("1032"));
        assert!(callback.created_at.is_none());
        assert!(callback.updated_at.is_none());
    }

    #[test]
    fn test_malformed_webhook() {
        let err = CollectionCallback::from_slice(b"{\"state\": 1}").unwrap_err();
        assert!(matches!(err, IntaSendError::Deserialization(_)));
    }
}
