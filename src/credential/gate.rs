//! Memoizing signature gate.
//!
//! The cache key is derived from the application key only. A hit returns
//! the signature computed for the first input stored under that key, with
//! its timestamp, nonce and context fields. Later inputs that differ in
//! `customer_id`, `account_period`, `period`, `reclassify_flag` or
//! `tax_code` still get that signature while their echo headers and query
//! carry the new values, so the server may reject them. Sharing a cache
//! between clients with the same application key has the same effect for
//! timestamp and nonce.
//!
//! Callers that need per-request signatures should install their own
//! [`RequestSigner`] instead of relying on the gate.

use crate::cache::SignatureCache;
use crate::credential::signer::{HmacSigner, Signer, SigningInput};
use crate::credential::RequestSigner;
use crate::FinanceError;
use std::sync::Arc;
use std::time::Duration;

/// Default cache namespace, shared with pre-existing cache contents.
pub const DEFAULT_CACHE_NAMESPACE: &str = "go_yiqiying_";

/// How long a computed signature is reused.
pub const DEFAULT_SIGNATURE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Build the cache key for an application key.
pub fn cache_key(namespace: &str, app_key: &str) -> String {
    format!("{}_signature_{}", namespace, app_key)
}

/// Get-or-compute wrapper around a [`Signer`].
pub struct SignatureGate {
    cache: Arc<dyn SignatureCache>,
    signer: Arc<dyn Signer>,
    namespace: String,
    ttl: Duration,
}

impl SignatureGate {
    /// Create a gate over the default HMAC signer.
    ///
    /// # Errors
    /// * `ConfigError` - no cache backend was supplied
    pub fn new(
        cache: Option<Arc<dyn SignatureCache>>,
        namespace: impl Into<String>,
    ) -> Result<Self, FinanceError> {
        Self::with_signer(cache, Arc::new(HmacSigner), namespace, DEFAULT_SIGNATURE_TTL)
    }

    /// Create a gate with an explicit signer and TTL.
    pub fn with_signer(
        cache: Option<Arc<dyn SignatureCache>>,
        signer: Arc<dyn Signer>,
        namespace: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, FinanceError> {
        let cache = cache.ok_or_else(|| {
            FinanceError::ConfigError("a signature cache backend is required".to_string())
        })?;

        Ok(Self {
            cache,
            signer,
            namespace: namespace.into(),
            ttl,
        })
    }

    /// Return the signature for `input`, from cache when live.
    ///
    /// # Errors
    /// * `CacheIO` - the backend failed on read or write; nothing is sent
    /// * `MissingSecret` - the signer rejected the input
    pub fn get_signature(&self, input: &SigningInput) -> Result<String, FinanceError> {
        let key = cache_key(&self.namespace, &input.app_key);

        if let Some(signature) = self.cache.get(&key)? {
            tracing::debug!(cache_key = %key, "signature cache hit");
            return Ok(signature);
        }

        tracing::debug!(cache_key = %key, "signature cache miss");
        let signature = self.signer.sign(input)?;

        self.cache.set(&key, &signature, self.ttl).map_err(|e| {
            tracing::error!(cache_key = %key, error = %e, "failed to store signature");
            e
        })?;

        Ok(signature)
    }

    /// Cache key this gate uses for `app_key`.
    pub fn key_for(&self, app_key: &str) -> String {
        cache_key(&self.namespace, app_key)
    }

    /// Time-to-live applied to stored signatures.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl RequestSigner for SignatureGate {
    fn signature(&self, input: &SigningInput) -> Result<String, FinanceError> {
        self.get_signature(input)
    }
}
