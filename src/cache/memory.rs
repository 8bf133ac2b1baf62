//! In-process signature cache.

use crate::cache::format::SignatureRecord;
use crate::cache::SignatureCache;
use crate::clock::{Clock, SystemClock};
use crate::FinanceError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Thread-safe in-memory cache. Expired entries are dropped lazily on read.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, SignatureRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create an empty cache using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache with a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError> {
        {
            let guard = self
                .entries
                .read()
                .map_err(|_| FinanceError::CacheIO("Memory cache lock poisoned".to_string()))?;

            match guard.get(key) {
                None => return Ok(None),
                Some(record) if !record.is_expired(self.clock.as_ref()) => {
                    return Ok(Some(record.value.clone()))
                }
                Some(_) => {}
            }
        }

        // Stale entry: evict unless another writer refreshed it meanwhile
        if let Ok(mut guard) = self.entries.write() {
            if guard
                .get(key)
                .is_some_and(|record| record.is_expired(self.clock.as_ref()))
            {
                guard.remove(key);
            }
        }

        Ok(None)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), FinanceError> {
        let record = SignatureRecord::new(
            key.to_string(),
            value.to_string(),
            ttl,
            self.clock.as_ref(),
        )?;

        let mut guard = self
            .entries
            .write()
            .map_err(|_| FinanceError::CacheIO("Memory cache lock poisoned".to_string()))?;
        guard.insert(key.to_string(), record);

        Ok(())
    }
}
