//! Client configuration.

use crate::cache::SignatureCache;
use crate::credential::{DEFAULT_CACHE_NAMESPACE, DEFAULT_SIGNATURE_TTL};
use crate::FinanceError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://openapi.17win.com";

/// Protocol version sent in the `version` header and signed.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest accepted signature TTL (one year).
pub const MAX_SIGNATURE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Configuration for one YiQiYing client (one application key).
#[derive(Clone)]
pub struct YiQiYingConfig {
    /// Application key issued by the platform.
    pub app_key: String,

    /// Application secret. Never sent and never logged.
    pub app_secret: String,

    /// Signature cache backend. Required; see [`crate::Finance`] for sharing
    /// one cache between clients.
    pub cache: Option<Arc<dyn SignatureCache>>,

    /// Prefix for signature cache keys.
    pub cache_namespace: String,

    /// How long a computed signature is reused.
    pub signature_ttl: Duration,

    /// API origin, overridable for staging and tests.
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Protocol version tag.
    pub version: String,

    /// Session-level customer, signed by the POST endpoints that need one.
    pub customer_id: Option<String>,
}

impl YiQiYingConfig {
    /// Config with defaults for everything except credentials and cache.
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            cache: None,
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            signature_ttl: DEFAULT_SIGNATURE_TTL,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            version: DEFAULT_VERSION.to_string(),
            customer_id: None,
        }
    }

    /// Attach a cache backend.
    pub fn with_cache(mut self, cache: Arc<dyn SignatureCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Override the API origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the session-level customer.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate configuration for obvious errors.
    ///
    /// The cache is checked later, when the signature gate is built.
    pub fn validate(&self) -> Result<(), FinanceError> {
        if self.app_key.is_empty() {
            return Err(FinanceError::ConfigError(
                "app_key cannot be empty".to_string(),
            ));
        }
        if self.app_secret.is_empty() {
            return Err(FinanceError::MissingSecret);
        }
        if self.cache_namespace.is_empty() {
            return Err(FinanceError::ConfigError(
                "cache_namespace cannot be empty".to_string(),
            ));
        }
        if self.signature_ttl.is_zero() {
            return Err(FinanceError::ConfigError(
                "signature_ttl must be greater than zero".to_string(),
            ));
        }
        if self.signature_ttl > MAX_SIGNATURE_TTL {
            return Err(FinanceError::ConfigError(format!(
                "signature_ttl must not exceed {}s",
                MAX_SIGNATURE_TTL.as_secs()
            )));
        }
        if self.timeout.is_zero() {
            return Err(FinanceError::ConfigError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            FinanceError::ConfigError(format!("Invalid base_url '{}': {}", self.base_url, e))
        })?;
        Ok(())
    }
}

impl fmt::Debug for YiQiYingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YiQiYingConfig")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("cache", &self.cache.as_ref().map(|_| "<cache>"))
            .field("cache_namespace", &self.cache_namespace)
            .field("signature_ttl", &self.signature_ttl)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("version", &self.version)
            .field("customer_id", &self.customer_id)
            .finish()
    }
}
