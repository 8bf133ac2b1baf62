//! Signature cache backends.
//!
//! The gate only needs string get/set with TTL semantics; anything that can
//! provide that (in-process map, files, an external store) can be injected.

pub mod file;
pub mod format;
pub mod memory;

use crate::FinanceError;
use std::time::Duration;

pub use file::FileCache;
pub use format::SignatureRecord;
pub use memory::MemoryCache;

/// Key/value store with per-entry time-to-live.
///
/// Implementations must be safe under concurrent `get`/`set` for the same
/// key; last writer wins.
pub trait SignatureCache: Send + Sync {
    /// Return the live value for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError>;

    /// Store `value` under `key`, expiring `ttl` from now.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), FinanceError>;
}
