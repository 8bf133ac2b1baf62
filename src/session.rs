//! Per-client request session.
//!
//! A session fixes the timestamp and nonce once; every request made through
//! the same client reuses them.

use crate::clock::Clock;
use crate::config::YiQiYingConfig;
use crate::credential::{SigningContext, SigningInput};

/// Timestamp, nonce and version shared by all requests of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Issuance time, milliseconds since epoch.
    pub timestamp: i64,
    /// Dash-less UUIDv4, 32 lowercase hex characters.
    pub nonce: String,
    /// Protocol version tag.
    pub version: String,
}

impl Session {
    /// Start a session at the clock's current time with a fresh nonce.
    pub fn start(clock: &dyn Clock, version: impl Into<String>) -> Self {
        Self {
            timestamp: clock.now_millis(),
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            version: version.into(),
        }
    }

    /// Build the signing input for one request.
    pub fn signing_input(&self, config: &YiQiYingConfig, context: SigningContext) -> SigningInput {
        SigningInput {
            app_key: config.app_key.clone(),
            app_secret: config.app_secret.clone(),
            timestamp: self.timestamp,
            version: self.version.clone(),
            nonce: self.nonce.clone(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    #[test]
    fn test_session_uses_clock_millis() {
        let clock = MockClock::from_rfc3339("2023-11-14T22:13:20Z");
        let session = Session::start(&clock, "1.0.0");
        assert_eq!(session.timestamp, 1_700_000_000_000);
        assert_eq!(session.version, "1.0.0");
    }

    #[test]
    fn test_nonce_shape() {
        let clock = MockClock::from_rfc3339("2023-11-14T22:13:20Z");
        let session = Session::start(&clock, "1.0.0");

        assert_eq!(session.nonce.len(), 32);
        assert!(session
            .nonce
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_sessions_get_distinct_nonces() {
        let clock = MockClock::from_rfc3339("2023-11-14T22:13:20Z");
        let a = Session::start(&clock, "1.0.0");
        let b = Session::start(&clock, "1.0.0");
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_signing_input_carries_session_and_context() {
        let clock = MockClock::from_rfc3339("2023-11-14T22:13:20Z");
        let session = Session::start(&clock, "1.0.0");
        let config = YiQiYingConfig::new("AK1", "SECRET");

        let input = session.signing_input(&config, SigningContext::empty().customer("c1"));
        assert_eq!(input.app_key, "AK1");
        assert_eq!(input.app_secret, "SECRET");
        assert_eq!(input.timestamp, session.timestamp);
        assert_eq!(input.nonce, session.nonce);
        assert_eq!(input.context.customer_id.as_deref(), Some("c1"));
    }
}
