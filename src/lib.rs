//! # payeezy - Payeezy payment gateway client
//!
//! Builds card transaction and tokenization payloads, signs each request
//! with the gateway's per-request HMAC scheme and sends it over HTTPS.
//!
//! ```no_run
//! use payeezy::{ClientConfig, Credentials, Environment, PayeezyClient, TransactionFields};
//!
//! # async fn example() -> payeezy::Result<()> {
//! let credentials = Credentials::new("api-key", "api-secret", "merchant-token");
//! let client = PayeezyClient::new(ClientConfig::new(credentials, Environment::Sandbox))?;
//!
//! let response = client
//!     .authorize(
//!         TransactionFields::new()
//!             .amount("10.00")
//!             .currency_code("USD")
//!             .card_type("visa")
//!             .cardholder_name("Jane Doe")
//!             .card_number("4012000033330026")
//!             .card_expiry("1225")
//!             .card_cvv("123"),
//!     )
//!     .await?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{Credentials, RequestAuthenticator, SignedHeaders};
pub use client::PayeezyClient;
pub use config::{ClientConfig, Environment};
pub use error::{PayeezyError, Result};
pub use payload::{build_token_payload, build_transaction, BuiltTransaction, TokenFields, TransactionFields};
pub use transport::{GatewayResponse, HttpTransport, ReqwestTransport, TlsVersion, TransportConfig};
pub use types::*;

/// Current version of the payeezy library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `User-Agent` header value
pub const USER_AGENT: &str = concat!("payeezy-rust/", env!("CARGO_PKG_VERSION"));
