//! Process-wide keyed cache for configuration values
//!
//! No TTL: entries live until process restart or overwrite. The trait is
//! fallible so callers can treat any backend failure as a miss; the in-memory
//! implementation only fails if its lock is poisoned.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("cache backend error: {0}")]
pub struct CacheError(pub String);

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Keyed string cache in front of the configuration table
pub trait SettingsCache: Send + Sync {
    fn get(&self, name: &str) -> CacheResult<Option<String>>;
    fn put(&self, name: &str, value: &str) -> CacheResult<()>;
}

/// In-process cache shared by all connections
#[derive(Default)]
pub struct ProcessCache {
    entries: RwLock<HashMap<String, String>>,
}

impl ProcessCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsCache for ProcessCache {
    fn get(&self, name: &str) -> CacheResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError(e.to_string()))?;
        Ok(entries.get(name).cloned())
    }

    fn put(&self, name: &str, value: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError(e.to_string()))?;
        entries.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = ProcessCache::new();
        assert_eq!(cache.get("ollama_host").unwrap(), None);
        cache.put("ollama_host", "http://localhost:11434").unwrap();
        assert_eq!(
            cache.get("ollama_host").unwrap(),
            Some("http://localhost:11434".to_string())
        );
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let cache = ProcessCache::new();
        cache.put("rate_limit", "3").unwrap();
        cache.put("rate_limit", "10").unwrap();
        assert_eq!(cache.get("rate_limit").unwrap(), Some("10".to_string()));
    }
}
