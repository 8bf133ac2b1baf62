//! Client factory holding a shared default cache.

use crate::cache::SignatureCache;
use crate::config::YiQiYingConfig;
use crate::yiqiying::YiQiYing;
use crate::FinanceError;
use std::sync::Arc;

/// Builds [`YiQiYing`] clients that share one signature cache.
#[derive(Default, Clone)]
pub struct Finance {
    cache: Option<Arc<dyn SignatureCache>>,
}

impl Finance {
    /// Factory without a default cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache used by clients whose config has none.
    pub fn set_cache(&mut self, cache: Arc<dyn SignatureCache>) {
        self.cache = Some(cache);
    }

    /// Build a client, filling in the factory cache when the config lacks one.
    pub fn yiqiying(&self, mut config: YiQiYingConfig) -> Result<YiQiYing, FinanceError> {
        if config.cache.is_none() {
            config.cache = self.cache.clone();
        }
        YiQiYing::new(config)
    }
}
