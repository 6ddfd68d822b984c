//! Error types for the IntaSend client

use serde_json::{Map, Value};
use thiserror::Error;

/// Result type alias for IntaSend operations
pub type Result<T> = std::result::Result<T, IntaSendError>;

/// Boxed source error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for IntaSend operations
#[derive(Error, Debug)]
pub enum IntaSendError {
    /// A required local precondition is missing; no request was sent
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The request payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Network failure, timeout or malformed request
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The API answered with a status of 400 or above
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<Map<String, Value>>,
    },

    /// The response body did not match the expected shape
    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl IntaSendError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a transport error without an underlying source
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            errors: None,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error came from a non-success API response
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the transport gave up waiting for the server
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport {
                source: Some(source),
                ..
            } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for IntaSendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
