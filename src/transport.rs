//! HTTP transport used to reach the gateway

use crate::{PayeezyError, Result};
use http::HeaderMap;
use reqwest::Client;
use std::time::Duration;

/// Default request timeout; the gateway caps calls at 30 seconds
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of idle connections kept per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Minimum TLS protocol version the transport will negotiate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    #[default]
    Tls12,
    Tls13,
}

impl TlsVersion {
    fn to_reqwest(self) -> reqwest::tls::Version {
        match self {
            TlsVersion::Tls12 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

/// Settings for the default reqwest transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// Minimum TLS version
    pub min_tls_version: TlsVersion,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            min_tls_version: TlsVersion::default(),
            user_agent: crate::USER_AGENT.to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the minimum TLS version
    pub fn with_min_tls_version(mut self, version: TlsVersion) -> Self {
        self.min_tls_version = version;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the transport configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(PayeezyError::config("Transport timeout cannot be zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(PayeezyError::config("User agent cannot be empty"));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw gateway answer, returned to the caller unmodified
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx answer into [`PayeezyError::Gateway`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(PayeezyError::gateway(self.status, self.body))
        }
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(PayeezyError::from)
    }
}

/// Something that can POST a signed body and hand back the raw answer
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<GatewayResponse>;
}

/// Default transport backed by reqwest with rustls
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport from `config`
    pub fn new(config: &TransportConfig) -> Result<Self> {
        config.validate()?;
        Self::from_validated(config)
    }

    /// Build from a config that already passed `validate`
    pub(crate) fn from_validated(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .min_tls_version(config.min_tls_version.to_reqwest())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PayeezyError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<GatewayResponse> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(GatewayResponse {
            status,
            headers,
            body,
        })
    }
}
