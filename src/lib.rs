//! # intasend - IntaSend payments API client
//!
//! Typed requests and responses for the IntaSend REST API: hosted checkout
//! links, payment status, invoices, wallet transactions and wallets.
//!
//! ```no_run
//! use intasend::{CheckoutRequest, ClientConfig, Currency, IntaSendClient};
//!
//! # async fn run() -> intasend::Result<()> {
//! let config = ClientConfig::new("ISPubKey_test_...", "ISSecretKey_test_...").with_sandbox();
//! let client = IntaSendClient::new(config)?;
//!
//! let checkout = CheckoutRequest::builder()
//!     .email("jane@example.com")
//!     .amount(100)
//!     .currency(Currency::Kes)
//!     .submit(&client)
//!     .await?;
//! println!("{}", checkout.url);
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod callback;
pub mod checkout;
pub mod client;
pub mod error;
pub mod http;
pub mod invoices;
pub mod payment_status;
pub mod transactions;
pub mod types;
pub mod wallets;

// Re-exports for convenience
pub use amount::Amount;
pub use callback::CollectionCallback;
pub use checkout::{validate_email, CheckoutRequest, CheckoutRequestBuilder, CheckoutResponse};
pub use client::{ClientConfig, IntaSendClient};
pub use error::{IntaSendError, Result};
pub use crate::http::{HttpMethod, RawResponse, RequestBody, RequestOptions, Transport};
pub use invoices::{Invoice, ListInvoicesParams};
pub use payment_status::PaymentStatus;
pub use rust_decimal::Decimal;
pub use transactions::{ListTransactionsParams, Transaction};
pub use types::*;
pub use wallets::{ListWalletsParams, Wallet, WalletTransactionsParams};

/// Current version of the intasend library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
