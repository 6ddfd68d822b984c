//! Monetary amounts as reported by the API
//!
//! The API is not consistent about how it encodes money: the same field is
//! sent as a JSON number by one endpoint and as a JSON string by another
//! (`"charges": 105.46` vs `"charges": "0.00"`). [`Amount`] accepts both and
//! keeps the value as a [`Decimal`]. A `null` reads as zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary value decoded from either a JSON number or a JSON string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub Decimal);

/// Error returned when text cannot be read as an amount
#[derive(Debug, thiserror::Error)]
#[error("Invalid amount: {input}")]
pub struct AmountParseError {
    input: String,
}

impl Amount {
    /// Zero
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for display or arithmetic outside this crate
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Amount)
            .map_err(|_| AmountParseError {
                input: input.to_string(),
            })
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum AmountWire {
            Number(serde_json::Number),
            Text(String),
            Null(()),
        }

        let text = match AmountWire::deserialize(deserializer)? {
            AmountWire::Number(number) => number.to_string(),
            AmountWire::Text(text) => text,
            AmountWire::Null(()) => return Ok(Amount::ZERO),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}
