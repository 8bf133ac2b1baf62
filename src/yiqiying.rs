//! YiQiYing client - the main public API.
//!
//! A [`YiQiYing`] is bound to one application key. It owns the HTTP client,
//! the session (timestamp and nonce fixed at construction) and the signature
//! strategy, and hands out borrowing service wrappers per endpoint group.

use crate::client::ApiClient;
use crate::clock::{Clock, SystemClock};
use crate::config::YiQiYingConfig;
use crate::credential::{HmacSigner, RequestSigner, SignatureGate};
use crate::service::{CloseInfoService, Customers, Statements, TaxService};
use crate::session::Session;
use crate::FinanceError;
use std::sync::Arc;

/// Client for the YiQiYing open API.
///
/// Create one per application key and reuse it; every call made through it
/// shares the same session and therefore the same cached signature.
pub struct YiQiYing {
    client: ApiClient,
}

impl YiQiYing {
    /// Create a client with the given configuration.
    ///
    /// Uses the system clock for the session timestamp.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Configuration validation fails (`ConfigError`, `MissingSecret`)
    /// - No cache backend was configured (`ConfigError`)
    /// - HTTP client creation fails (`ConfigError`)
    pub fn new(config: YiQiYingConfig) -> Result<Self, FinanceError> {
        Self::with_clock(config, &SystemClock)
    }

    /// Create a client whose session starts at a custom clock's time.
    #[cfg(any(test, feature = "test-seams"))]
    pub fn new_with_clock(
        config: YiQiYingConfig,
        clock: &dyn Clock,
    ) -> Result<Self, FinanceError> {
        Self::with_clock(config, clock)
    }

    fn with_clock(config: YiQiYingConfig, clock: &dyn Clock) -> Result<Self, FinanceError> {
        config.validate()?;

        let gate = SignatureGate::with_signer(
            config.cache.clone(),
            Arc::new(HmacSigner),
            config.cache_namespace.as_str(),
            config.signature_ttl,
        )?;
        let session = Session::start(clock, config.version.as_str());

        tracing::debug!(
            app_key = %config.app_key,
            timestamp = session.timestamp,
            "yiqiying client created"
        );

        let client = ApiClient::new(config, session, Arc::new(gate))?;
        Ok(Self { client })
    }

    /// Replace the signature strategy for all subsequent calls.
    pub fn set_request_signer(&mut self, signer: Arc<dyn RequestSigner>) {
        self.client.set_signer(signer);
    }

    /// Session fixed for this client.
    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Get the current configuration.
    pub fn config(&self) -> &YiQiYingConfig {
        self.client.config()
    }

    /// Customer management.
    pub fn customers(&self) -> Customers<'_> {
        Customers::new(&self.client)
    }

    /// Period close status.
    pub fn close_info(&self) -> CloseInfoService<'_> {
        CloseInfoService::new(&self.client)
    }

    /// Financial statements.
    pub fn statements(&self) -> Statements<'_> {
        Statements::new(&self.client)
    }

    /// Tax declarations.
    pub fn tax(&self) -> TaxService<'_> {
        TaxService::new(&self.client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::clock::MockClock;

    fn test_config() -> YiQiYingConfig {
        YiQiYingConfig::new("AK1", "SECRET").with_cache(Arc::new(MemoryCache::new()))
    }

    #[test]
    fn test_client_creation() {
        assert!(YiQiYing::new(test_config()).is_ok());
    }

    #[test]
    fn test_missing_cache_rejected() {
        let result = YiQiYing::new(YiQiYingConfig::new("AK1", "SECRET"));
        assert!(matches!(result, Err(FinanceError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config_rejected_before_cache_check() {
        let result = YiQiYing::new(YiQiYingConfig::new("AK1", ""));
        assert!(matches!(result, Err(FinanceError::MissingSecret)));
    }

    #[test]
    fn test_session_from_clock() {
        let clock = MockClock::from_rfc3339("2023-11-14T22:13:20Z");
        let client = YiQiYing::new_with_clock(test_config(), &clock).unwrap();

        assert_eq!(client.session().timestamp, 1_700_000_000_000);
        assert_eq!(client.session().version, "1.0.0");
        assert_eq!(client.session().nonce.len(), 32);
    }

    #[test]
    fn test_config_accessor() {
        let client = YiQiYing::new(test_config()).unwrap();
        assert_eq!(client.config().app_key, "AK1");
    }
}
