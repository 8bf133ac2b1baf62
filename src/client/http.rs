//! Reqwest-based HTTP client for the YiQiYing gateway.
//!
//! Each call runs the same pipeline: build the request, obtain a signature
//! from the injected [`RequestSigner`], attach headers, send, then decode
//! and classify the envelope.

use crate::client::headers::HeaderBuilder;
use crate::config::YiQiYingConfig;
use crate::credential::{RequestSigner, SigningContext};
use crate::protocol::envelope::decode_response;
use crate::session::Session;
use crate::FinanceError;
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Path prefix of every gateway endpoint.
pub const API_PREFIX: &str = "/gateway/openyqdz";

/// Query string parameters, encoded in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<&'static str, String>,
}

impl QueryParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter that is always sent, even when empty.
    pub fn required(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    /// Add a parameter that is dropped when absent or empty.
    pub fn optional(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.params.insert(key, value.to_string());
        }
        self
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Append the parameters to `url` as a form-encoded query string.
    pub fn apply(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        url.query_pairs_mut()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
    }
}

/// Blocking client bound to one application key and session.
pub struct ApiClient {
    http: Client,
    base_url: String,
    config: YiQiYingConfig,
    session: Session,
    signer: Arc<dyn RequestSigner>,
}

impl ApiClient {
    /// Create a client.
    ///
    /// # Errors
    /// * `ConfigError` - the HTTP client could not be built
    pub fn new(
        config: YiQiYingConfig,
        session: Session,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, FinanceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(build_user_agent())
            .build()
            .map_err(|e| FinanceError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            session,
            signer,
        })
    }

    /// Replace the signature strategy.
    pub fn set_signer(&mut self, signer: Arc<dyn RequestSigner>) {
        self.signer = signer;
    }

    /// Session shared by all calls of this client.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &YiQiYingConfig {
        &self.config
    }

    /// Signing context for POST endpoints scoped to the session customer.
    pub fn session_context(&self) -> SigningContext {
        SigningContext {
            customer_id: self.config.customer_id.clone(),
            ..SigningContext::default()
        }
    }

    /// Full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, FinanceError> {
        let raw = format!("{}{}{}", self.base_url, API_PREFIX, path);
        Url::parse(&raw)
            .map_err(|e| FinanceError::ConfigError(format!("Invalid endpoint URL {}: {}", raw, e)))
    }

    /// POST a JSON body.
    ///
    /// # Errors
    /// * `Decode` - the request body fails to serialize or the response fails to parse
    /// * `CacheIO` / `MissingSecret` - signing failed; nothing was sent
    /// * `Transport` - network failure or non-envelope error response
    /// * `Domain` - the remote head reports failure
    pub fn post_json<B, T>(
        &self,
        path: &str,
        context: SigningContext,
        body: &B,
    ) -> Result<T, FinanceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = self.endpoint_url(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|e| FinanceError::Decode(format!("Failed to serialize request: {}", e)))?;

        self.execute(Method::POST, url, context, false, Some(payload))
    }

    /// GET with a query string; the signed context is echoed as headers.
    ///
    /// # Errors
    /// Same as [`ApiClient::post_json`].
    pub fn get_query<T>(
        &self,
        path: &str,
        context: SigningContext,
        query: &QueryParams,
    ) -> Result<T, FinanceError>
    where
        T: DeserializeOwned + Default,
    {
        let mut url = self.endpoint_url(path)?;
        query.apply(&mut url);

        self.execute(Method::GET, url, context, true, None)
    }

    fn execute<T>(
        &self,
        method: Method,
        url: Url,
        context: SigningContext,
        echo_context: bool,
        body: Option<Vec<u8>>,
    ) -> Result<T, FinanceError>
    where
        T: DeserializeOwned + Default,
    {
        let input = self.session.signing_input(&self.config, context);
        let signature = self.signer.signature(&input)?;

        let mut headers = HeaderBuilder::new(&self.session, &self.config.app_key, &signature)?;
        if echo_context {
            headers = headers.echo_context(&input.context)?;
        }

        tracing::debug!(method = %method, url = %url, "dispatching request");

        let mut request = self.http.request(method, url).headers(headers.build());
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send()?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .map_err(|e| FinanceError::Transport(format!("Failed to read body: {}", e)))?;

        tracing::debug!(http_status = status, bytes = bytes.len(), "response received");

        decode_response(status, &bytes)
    }
}

/// Build the User-Agent string.
///
/// Format: `yiqiying-finance/<crate version>`
pub fn build_user_agent() -> String {
    format!("yiqiying-finance/{}", env!("CARGO_PKG_VERSION"))
}
