//! Payeezy API client

use crate::auth::{Credentials, RequestAuthenticator};
use crate::config::ClientConfig;
use crate::payload::{build_token_payload, build_transaction, TokenFields, TransactionFields};
use crate::transport::{GatewayResponse, HttpTransport, ReqwestTransport};
use crate::types::{TransactionRequest, TransactionType, DEFAULT_METHOD};
use crate::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Characters escaped when a transaction id is used as a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Client for the Payeezy transactions and security tokens endpoints.
///
/// Credentials are fixed at construction and shared read-only between
/// clones, so one client can be used from many tasks at once. Every call
/// signs its body with a fresh nonce and timestamp.
#[derive(Clone)]
pub struct PayeezyClient {
    credentials: Arc<Credentials>,
    transactions_url: String,
    token_url: String,
    user_agent: String,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for PayeezyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayeezyClient")
            .field("credentials", &self.credentials)
            .field("transactions_url", &self.transactions_url)
            .field("token_url", &self.token_url)
            .field("transport", &"<transport>")
            .finish()
    }
}

impl PayeezyClient {
    /// Create a client using the default reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_validated(&config.transport)?;
        Ok(Self::from_validated(config, Arc::new(transport)))
    }

    /// Create a client that sends through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, transport))
    }

    fn from_validated(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials: Arc::new(config.credentials),
            transactions_url: config.transactions_url,
            token_url: config.token_url,
            user_agent: config.transport.user_agent,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transactions_url(&self) -> &str {
        &self.transactions_url
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// URL for a capture, void or refund of `transaction_id`
    pub fn secondary_url(&self, transaction_id: &str) -> String {
        format!(
            "{}/{}",
            self.transactions_url.trim_end_matches('/'),
            utf8_percent_encode(transaction_id, PATH_SEGMENT)
        )
    }

    /// Authorize a card without capturing funds
    pub async fn authorize(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        self.transact(with_defaults(TransactionType::Authorize, fields))
            .await
    }

    /// Authorize and capture in a single step
    pub async fn purchase(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        self.transact(with_defaults(TransactionType::Purchase, fields))
            .await
    }

    /// Capture a prior authorization
    pub async fn capture(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        self.transact(with_defaults(TransactionType::Capture, fields))
            .await
    }

    /// Void a prior transaction
    pub async fn void(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        self.transact(with_defaults(TransactionType::Void, fields))
            .await
    }

    /// Refund a prior transaction
    pub async fn refund(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        self.transact(with_defaults(TransactionType::Refund, fields))
            .await
    }

    /// Build `fields` and send it to the endpoint its transaction type uses.
    ///
    /// Validation errors are returned before any request is made.
    pub async fn transact(&self, fields: TransactionFields) -> Result<GatewayResponse> {
        let built = build_transaction(&fields)?;
        match built.transaction_id {
            Some(transaction_id) => {
                self.make_secondary_transaction(&built.request, &transaction_id)
                    .await
            }
            None => self.make_primary_transaction(&built.request).await,
        }
    }

    /// POST an authorize or purchase body to the transactions URL
    pub async fn make_primary_transaction(
        &self,
        payload: &TransactionRequest,
    ) -> Result<GatewayResponse> {
        self.signed_post(&self.transactions_url, payload).await
    }

    /// POST a capture, void or refund body to `{transactions_url}/{transaction_id}`
    pub async fn make_secondary_transaction(
        &self,
        payload: &TransactionRequest,
        transaction_id: &str,
    ) -> Result<GatewayResponse> {
        let url = self.secondary_url(transaction_id);
        self.signed_post(&url, payload).await
    }

    /// Request a card token from the security tokens endpoint
    pub async fn get_token(&self, fields: TokenFields) -> Result<GatewayResponse> {
        let payload = build_token_payload(&fields)?;
        self.signed_post(&self.token_url, &payload.into()).await
    }

    async fn signed_post(&self, url: &str, payload: &TransactionRequest) -> Result<GatewayResponse> {
        // The signed string and the sent body must be byte-identical.
        let body = payload.to_json()?;
        let headers = RequestAuthenticator::new(&self.credentials)
            .with_user_agent(self.user_agent.as_str())
            .headers(&body)?;

        let kind = payload
            .transaction_type()
            .map(|t| t.as_str())
            .unwrap_or("token");
        debug!(url, kind, "sending signed request");

        let response = self.transport.post(url, headers, body).await?;

        if response.is_success() {
            info!(kind, status = response.status, "gateway accepted request");
        } else {
            warn!(kind, status = response.status, "gateway rejected request");
        }
        Ok(response)
    }
}

fn with_defaults(transaction_type: TransactionType, mut fields: TransactionFields) -> TransactionFields {
    fields.transaction_type = Some(transaction_type.to_string());
    if fields.method.is_none() {
        fields.method = Some(DEFAULT_METHOD.to_string());
    }
    fields
}
