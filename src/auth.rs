//! Per-request HMAC authentication for the Payeezy API
//!
//! Every call is signed over `apikey + nonce + timestamp + token + body`
//! with HMAC-SHA256 keyed by the API secret. The gateway expects the
//! lowercase hex digest, base64-encoded, in the `Authorization` header.

use crate::{PayeezyError, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the merchant API key
pub const APIKEY_HEADER: &str = "apikey";
/// Header carrying the merchant token
pub const TOKEN_HEADER: &str = "token";
/// Header carrying the request nonce
pub const NONCE_HEADER: &str = "nonce";
/// Header carrying the request timestamp in epoch milliseconds
pub const TIMESTAMP_HEADER: &str = "timestamp";

/// Merchant credentials issued by Payeezy
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The API key
    pub api_key: String,
    /// The API secret used as HMAC key
    pub api_secret: String,
    /// The merchant token
    pub token: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token: token.into(),
        }
    }

    /// Check that no credential is blank
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
            ("token", &self.token),
        ] {
            if value.trim().is_empty() {
                return Err(PayeezyError::config(format!("{} cannot be empty", name)));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Values produced by signing one payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub nonce: String,
    pub timestamp: String,
    /// Base64 of the hex HMAC digest
    pub authorization: String,
}

/// Signs exactly one request.
///
/// The nonce and timestamp are fixed when the authenticator is created and
/// are used both in the signed message and in the outgoing headers, so a new
/// authenticator must be created for every request.
#[derive(Clone)]
pub struct RequestAuthenticator<'a> {
    credentials: &'a Credentials,
    nonce: String,
    timestamp: String,
    user_agent: String,
}

impl<'a> RequestAuthenticator<'a> {
    /// Create an authenticator with a fresh nonce and the current time
    pub fn new(credentials: &'a Credentials) -> Self {
        Self::with_nonce_and_timestamp(credentials, generate_nonce(), current_timestamp())
    }

    /// Create an authenticator with caller-chosen nonce and timestamp
    pub fn with_nonce_and_timestamp(
        credentials: &'a Credentials,
        nonce: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            nonce: nonce.into(),
            timestamp: timestamp.into(),
            user_agent: crate::USER_AGENT.to_string(),
        }
    }

    /// Override the `User-Agent` header value
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Compute the HMAC authorization value for `payload`
    pub fn sign(&self, payload: &str) -> Result<SignedHeaders> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| PayeezyError::signing(e.to_string()))?;
        mac.update(self.credentials.api_key.as_bytes());
        mac.update(self.nonce.as_bytes());
        mac.update(self.timestamp.as_bytes());
        mac.update(self.credentials.token.as_bytes());
        mac.update(payload.as_bytes());

        let digest_hex = hex::encode(mac.finalize().into_bytes());
        let authorization = base64::engine::general_purpose::STANDARD.encode(digest_hex);

        Ok(SignedHeaders {
            nonce: self.nonce.clone(),
            timestamp: self.timestamp.clone(),
            authorization,
        })
    }

    /// Full header set for a signed JSON POST of `payload`
    pub fn headers(&self, payload: &str) -> Result<HeaderMap> {
        let signed = self.sign(payload)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", &self.user_agent, false)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(APIKEY_HEADER),
            header_value(APIKEY_HEADER, &self.credentials.api_key, false)?,
        );
        headers.insert(
            HeaderName::from_static(TOKEN_HEADER),
            header_value(TOKEN_HEADER, &self.credentials.token, true)?,
        );
        headers.insert(
            HeaderName::from_static(NONCE_HEADER),
            header_value(NONCE_HEADER, &signed.nonce, false)?,
        );
        headers.insert(
            HeaderName::from_static(TIMESTAMP_HEADER),
            header_value(TIMESTAMP_HEADER, &signed.timestamp, false)?,
        );
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &signed.authorization, true)?,
        );
        Ok(headers)
    }
}

impl fmt::Debug for RequestAuthenticator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("credentials", self.credentials)
            .field("nonce", &self.nonce)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// 16 bytes from the OS CSPRNG, read as a big-endian integer, in decimal
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    u128::from_be_bytes(bytes).to_string()
}

/// Milliseconds since the Unix epoch
pub fn current_timestamp() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn header_value(name: &str, value: &str, sensitive: bool) -> Result<HeaderValue> {
    let mut value =
        HeaderValue::from_str(value).map_err(|e| PayeezyError::invalid_header(name, e.to_string()))?;
    value.set_sensitive(sensitive);
    Ok(value)
}
