//! Cached signature record format.
//!
//! A record is created on a cache miss, read back on hits, and considered
//! stale once `now >= expires_at`. Records are never explicitly invalidated.

use crate::clock::Clock;
use crate::FinanceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One memoized signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Cache key the record was stored under.
    pub cache_key: String,

    /// Base64 signature value.
    pub value: String,

    /// Instant after which the record must not be served.
    pub expires_at: DateTime<Utc>,
}

impl SignatureRecord {
    /// Create a record expiring `ttl` after the clock's current time.
    pub fn new(
        cache_key: String,
        value: String,
        ttl: Duration,
        clock: &dyn Clock,
    ) -> Result<Self, FinanceError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| FinanceError::CacheIO(format!("TTL out of range: {}", e)))?;
        let expires_at = clock
            .now_utc()
            .checked_add_signed(ttl)
            .ok_or_else(|| FinanceError::CacheIO("TTL overflows the expiry time".to_string()))?;

        Ok(Self {
            cache_key,
            value,
            expires_at,
        })
    }

    /// Whether the record has passed its expiry.
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        clock.now_utc() >= self.expires_at
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self) -> Result<String, FinanceError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FinanceError::CacheIO(format!("Failed to serialize record: {}", e)))
    }

    /// Deserialize a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, FinanceError> {
        serde_json::from_str(json)
            .map_err(|e| FinanceError::CacheIO(format!("Failed to deserialize record: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::TimeZone;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn clock() -> MockClock {
        MockClock::new(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
    }

    fn make_record(clock: &MockClock) -> SignatureRecord {
        SignatureRecord::new(
            "go_yiqiying__signature_AK1".to_string(),
            "4AqkpQGe6RBA4KTmAcvokF7wwKCbMvXu/hdk/XdrS7A=".to_string(),
            DAY,
            clock,
        )
        .unwrap()
    }

    #[test]
    fn test_record_expiry_set_from_clock() {
        let clock = clock();
        let record = make_record(&clock);
        assert_eq!(
            record.expires_at,
            Utc.with_ymd_and_hms(2025, 1, 16, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_record_live_within_ttl() {
        let clock = clock();
        let record = make_record(&clock);
        clock.advance(chrono::Duration::hours(23));
        assert!(!record.is_expired(&clock));
    }

    #[test]
    fn test_record_expires_at_boundary() {
        let clock = clock();
        let record = make_record(&clock);

        clock.advance(chrono::Duration::hours(24) - chrono::Duration::seconds(1));
        assert!(!record.is_expired(&clock));

        // Expiry is exclusive: at expires_at the record is already stale
        clock.advance(chrono::Duration::seconds(1));
        assert!(record.is_expired(&clock));
    }

    #[test]
    fn test_record_json_preserves_fields() {
        let clock = clock();
        let record = make_record(&clock);
        let restored = SignatureRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_record_huge_ttl_is_error() {
        let clock = clock();
        let ttl = Duration::from_secs(10_000_000 * 365 * 24 * 60 * 60);
        let result = SignatureRecord::new("k".to_string(), "v".to_string(), ttl, &clock);
        assert!(matches!(result, Err(FinanceError::CacheIO(_))));
    }

    #[test]
    fn test_record_from_malformed_json() {
        let result = SignatureRecord::from_json("{not json");
        assert!(matches!(result, Err(FinanceError::CacheIO(_))));
    }
}
