//! Client configuration: credentials, endpoints and transport settings

use crate::auth::Credentials;
use crate::transport::TransportConfig;
use crate::{PayeezyError, Result};
use url::Url;

/// Live transactions endpoint
pub const LIVE_TRANSACTIONS_URL: &str = "https://api.payeezy.com/v1/transactions";
/// Sandbox transactions endpoint
pub const SANDBOX_TRANSACTIONS_URL: &str = "https://api-cert.payeezy.com/v1/transactions";
/// Live security tokens endpoint
pub const LIVE_TOKEN_URL: &str = "https://api.payeezy.com/v1/securitytokens";
/// Sandbox security tokens endpoint
pub const SANDBOX_TOKEN_URL: &str = "https://api-cert.payeezy.com/v1/securitytokens";

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Live,
    Sandbox,
}

impl Environment {
    pub fn transactions_url(&self) -> &'static str {
        match self {
            Environment::Live => LIVE_TRANSACTIONS_URL,
            Environment::Sandbox => SANDBOX_TRANSACTIONS_URL,
        }
    }

    pub fn token_url(&self) -> &'static str {
        match self {
            Environment::Live => LIVE_TOKEN_URL,
            Environment::Sandbox => SANDBOX_TOKEN_URL,
        }
    }
}

/// Everything a [`crate::PayeezyClient`] needs, supplied by the caller
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// Base transactions URL
    pub transactions_url: String,
    /// Security tokens URL
    pub token_url: String,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Create a config pointing at `environment`
    pub fn new(credentials: Credentials, environment: Environment) -> Self {
        Self {
            credentials,
            transactions_url: environment.transactions_url().to_string(),
            token_url: environment.token_url().to_string(),
            transport: TransportConfig::default(),
        }
    }

    /// Override the transactions URL
    pub fn with_transactions_url(mut self, url: impl Into<String>) -> Self {
        self.transactions_url = url.into();
        self
    }

    /// Override the token URL
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set the transport settings
    pub fn with_transport_config(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()?;
        validate_url("transactions_url", &self.transactions_url)?;
        validate_url("token_url", &self.token_url)?;
        self.transport.validate()
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PayeezyError::config(format!("{} cannot be empty", name)));
    }

    let url = Url::parse(value)
        .map_err(|e| PayeezyError::config(format!("Invalid {} `{}`: {}", name, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PayeezyError::config(format!(
            "{} must use http or https, got `{}`",
            name, other
        ))),
    }
}
