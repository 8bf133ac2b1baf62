//! File-based signature cache with atomic writes.
//!
//! Stores one JSON [`SignatureRecord`] per cache key under
//! `dirs::data_dir()/<namespace>/`. Filenames are the SHA-256 of the key so
//! application keys never appear on disk. Writes go to a unique temp file and
//! are renamed into place, so concurrent writers never leave a torn record.

use crate::cache::format::SignatureRecord;
use crate::cache::SignatureCache;
use crate::clock::{Clock, SystemClock};
use crate::FinanceError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// File-based cache backend.
pub struct FileCache {
    /// Directory for cache files.
    cache_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileCache {
    /// Create a file cache under the platform data directory.
    pub fn new(namespace: &str) -> Result<Self, FinanceError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| FinanceError::CacheIO("Could not find data directory".to_string()))?;

        Self::at_path(base_dir.join(namespace))
    }

    /// Create a file cache rooted at a specific directory.
    pub fn at_path(cache_dir: PathBuf) -> Result<Self, FinanceError> {
        Self::with_clock(cache_dir, Arc::new(SystemClock))
    }

    /// Create a file cache at a directory with a custom clock.
    pub fn with_clock(cache_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, FinanceError> {
        fs::create_dir_all(&cache_dir)
            .map_err(|e| FinanceError::CacheIO(format!("Failed to create cache dir: {}", e)))?;
        Ok(Self { cache_dir, clock })
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn record_path(&self, key_hash: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key_hash))
    }

    /// Save a record atomically (temp file + rename).
    pub fn save(&self, record: &SignatureRecord) -> Result<(), FinanceError> {
        let key_hash = hash_cache_key(&record.cache_key);
        let target_path = self.record_path(&key_hash);
        let temp_path = self.cache_dir.join(format!(
            "{}.{}.tmp",
            key_hash,
            uuid::Uuid::new_v4().simple()
        ));

        let json = record.to_json()?;

        fs::write(&temp_path, &json)
            .map_err(|e| FinanceError::CacheIO(format!("Failed to write temp file: {}", e)))?;

        fs::rename(&temp_path, &target_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            FinanceError::CacheIO(format!("Failed to rename cache file: {}", e))
        })?;

        Ok(())
    }

    /// Load the record stored for `key`, expired or not.
    pub fn load(&self, key: &str) -> Result<Option<SignatureRecord>, FinanceError> {
        let path = self.record_path(&hash_cache_key(key));

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FinanceError::CacheIO(format!(
                    "Failed to read cache file: {}",
                    e
                )))
            }
        };

        let record = SignatureRecord::from_json(&json)?;
        if record.cache_key != key {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Delete the record for `key`, if any.
    pub fn delete(&self, key: &str) -> Result<(), FinanceError> {
        let path = self.record_path(&hash_cache_key(key));

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FinanceError::CacheIO(format!(
                "Failed to delete cache: {}",
                e
            ))),
        }
    }

    /// Delete `stale` unless another writer replaced it since it was read.
    fn evict(&self, stale: &SignatureRecord) -> Result<(), FinanceError> {
        match self.load(&stale.cache_key)? {
            Some(current) if current == *stale => self.delete(&stale.cache_key),
            _ => Ok(()),
        }
    }

    /// Remove every cached record.
    pub fn clear(&self) -> Result<(), FinanceError> {
        for entry in fs::read_dir(&self.cache_dir)
            .map_err(|e| FinanceError::CacheIO(format!("Failed to read cache dir: {}", e)))?
        {
            let entry =
                entry.map_err(|e| FinanceError::CacheIO(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .map_err(|e| FinanceError::CacheIO(format!("Failed to delete: {}", e)))?;
            }
        }
        Ok(())
    }
}

impl SignatureCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError> {
        match self.load(key)? {
            Some(record) if !record.is_expired(self.clock.as_ref()) => Ok(Some(record.value)),
            Some(stale) => {
                // Best effort; a stale file is harmless since it is never served
                if let Err(e) = self.evict(&stale) {
                    tracing::debug!(error = %e, "failed to evict stale signature record");
                }
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), FinanceError> {
        let record = SignatureRecord::new(
            key.to_string(),
            value.to_string(),
            ttl,
            self.clock.as_ref(),
        )?;
        self.save(&record)
    }
}

/// SHA-256 hex digest of a cache key, used as its filename.
pub fn hash_cache_key(key: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(key.as_bytes());
    hex::encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);
    const KEY: &str = "go_yiqiying__signature_AK1";

    fn mock_cache(temp_dir: &TempDir) -> (Arc<MockClock>, FileCache) {
        let clock = Arc::new(MockClock::from_rfc3339("2025-01-15T12:00:00Z"));
        let cache = FileCache::with_clock(temp_dir.path().to_path_buf(), clock.clone()).unwrap();
        (clock, cache)
    }

    #[test]
    fn test_file_cache_set_get() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);

        cache.set(KEY, "sig-value", DAY).unwrap();
        assert_eq!(cache.get(KEY).unwrap(), Some("sig-value".to_string()));
    }

    #[test]
    fn test_file_cache_get_absent() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_file_cache_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let (clock, cache) = mock_cache(&temp_dir);
        cache.set(KEY, "sig-value", DAY).unwrap();

        let reopened = FileCache::with_clock(temp_dir.path().to_path_buf(), clock).unwrap();
        assert_eq!(reopened.get(KEY).unwrap(), Some("sig-value".to_string()));
    }

    #[test]
    fn test_file_cache_expiry_evicts() {
        let temp_dir = TempDir::new().unwrap();
        let (clock, cache) = mock_cache(&temp_dir);
        cache.set(KEY, "sig-value", DAY).unwrap();

        clock.advance(chrono::Duration::hours(24));
        assert_eq!(cache.get(KEY).unwrap(), None);
        assert!(cache.load(KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_cache_filename_hides_key() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);
        cache.set(KEY, "sig-value", DAY).unwrap();

        let names: Vec<String> = fs::read_dir(cache.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.json", hash_cache_key(KEY))]);
        assert!(!names[0].contains("AK1"));
    }

    #[test]
    fn test_file_cache_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);

        cache.set(KEY, "first", DAY).unwrap();
        cache.set(KEY, "second", DAY).unwrap();
        assert_eq!(cache.get(KEY).unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_file_cache_corrupt_record_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);
        fs::write(cache.record_path(&hash_cache_key(KEY)), "{garbage").unwrap();

        assert!(matches!(cache.get(KEY), Err(FinanceError::CacheIO(_))));
    }

    #[test]
    fn test_file_cache_delete_absent_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);

        cache.delete(KEY).unwrap();
        cache.set(KEY, "sig-value", DAY).unwrap();
        cache.delete(KEY).unwrap();
        cache.delete(KEY).unwrap();
        assert!(cache.load(KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_cache_evict_keeps_refreshed_record() {
        let temp_dir = TempDir::new().unwrap();
        let (clock, cache) = mock_cache(&temp_dir);
        cache.set(KEY, "old", DAY).unwrap();
        let stale = cache.load(KEY).unwrap().unwrap();

        clock.advance(chrono::Duration::hours(25));
        cache.set(KEY, "fresh", DAY).unwrap();

        cache.evict(&stale).unwrap();
        assert_eq!(cache.get(KEY).unwrap(), Some("fresh".to_string()));
    }

    #[test]
    fn test_file_cache_concurrent_set_get_expire() {
        let temp_dir = TempDir::new().unwrap();
        let (clock, cache) = mock_cache(&temp_dir);
        let cache = Arc::new(cache);

        cache.set(KEY, "sig", DAY).unwrap();
        clock.advance(chrono::Duration::hours(25));

        // Readers evict the expired record while writers refresh it
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        if i % 2 == 0 {
                            cache.set(KEY, "sig", Duration::from_secs(1)).unwrap();
                        }
                        let value = cache.get(KEY).unwrap();
                        assert!(value.is_none() || value.as_deref() == Some("sig"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_file_cache_clear() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);

        cache.set("key1", "a", DAY).unwrap();
        cache.set("key2", "b", DAY).unwrap();
        cache.clear().unwrap();

        assert!(cache.get("key1").unwrap().is_none());
        assert!(cache.get("key2").unwrap().is_none());
    }

    #[test]
    fn test_file_cache_unwritable_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (_, cache) = mock_cache(&temp_dir);
        fs::remove_dir_all(temp_dir.path()).unwrap();

        assert!(matches!(
            cache.set(KEY, "sig-value", DAY),
            Err(FinanceError::CacheIO(_))
        ));
    }

    #[test]
    fn test_hash_cache_key() {
        let hash1 = hash_cache_key("go_yiqiying__signature_AK1");
        let hash2 = hash_cache_key("go_yiqiying__signature_AK1");
        let hash3 = hash_cache_key("go_yiqiying__signature_AK2");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }
}
