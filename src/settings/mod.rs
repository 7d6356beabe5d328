//! System configuration: a closed set of named parameters persisted in the
//! database and mirrored in a process-wide cache.
//!
//! Reads go cache-first and fall back to the database (populating the cache on
//! the way out); a missing row or a database error yields the caller's
//! default. Writes persist first and then update the cache best-effort: cache
//! failures never affect the write result.

pub mod cache;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::store::error::Result as StoreResult;
use cache::{ProcessCache, SettingsCache};

/// The closed enumeration of configuration parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    NcbiApiKey,
    RateLimit,
    MaxConcurrentQueries,
    CacheDuration,
    OllamaHost,
    OllamaModelGeneral,
    OllamaModelBiomedical,
    OllamaModelAnalysis,
    OllamaTimeout,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::NcbiApiKey,
        Parameter::RateLimit,
        Parameter::MaxConcurrentQueries,
        Parameter::CacheDuration,
        Parameter::OllamaHost,
        Parameter::OllamaModelGeneral,
        Parameter::OllamaModelBiomedical,
        Parameter::OllamaModelAnalysis,
        Parameter::OllamaTimeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::NcbiApiKey => "ncbi_api_key",
            Parameter::RateLimit => "rate_limit",
            Parameter::MaxConcurrentQueries => "max_concurrent_queries",
            Parameter::CacheDuration => "cache_duration",
            Parameter::OllamaHost => "ollama_host",
            Parameter::OllamaModelGeneral => "ollama_model_general",
            Parameter::OllamaModelBiomedical => "ollama_model_biomedical",
            Parameter::OllamaModelAnalysis => "ollama_model_analysis",
            Parameter::OllamaTimeout => "ollama_timeout",
        }
    }

    /// Human-readable label, as shown in the admin listing
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::NcbiApiKey => "NCBI API Key",
            Parameter::RateLimit => "API Rate Limit (requests per second)",
            Parameter::MaxConcurrentQueries => "Maximum Concurrent Queries",
            Parameter::CacheDuration => "Cache Duration (seconds)",
            Parameter::OllamaHost => "Ollama API Host",
            Parameter::OllamaModelGeneral => "General Purpose Model",
            Parameter::OllamaModelBiomedical => "Biomedical Model",
            Parameter::OllamaModelAnalysis => "Analysis Model",
            Parameter::OllamaTimeout => "Ollama Request Timeout (seconds)",
        }
    }

    pub fn parse(name: &str) -> Option<Parameter> {
        Parameter::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    /// Default value and description for each parameter, used by `init-config`
    pub fn default_row(&self) -> (&'static str, &'static str) {
        match self {
            Parameter::NcbiApiKey => (
                "",
                "API key for NCBI E-utilities. Get one at: https://www.ncbi.nlm.nih.gov/account/settings/",
            ),
            Parameter::RateLimit => (
                "3",
                "Maximum number of requests per second to NCBI E-utilities",
            ),
            Parameter::MaxConcurrentQueries => (
                "5",
                "Maximum number of concurrent queries that can be processed",
            ),
            Parameter::CacheDuration => (
                "86400",
                "Duration in seconds to cache query results (default: 24 hours)",
            ),
            Parameter::OllamaHost => ("http://localhost:11434", "Ollama API host address"),
            Parameter::OllamaModelGeneral => (
                "llama3.2",
                "General purpose language model for query understanding",
            ),
            Parameter::OllamaModelBiomedical => {
                ("llama3.2", "Specialized model for biomedical queries")
            }
            Parameter::OllamaModelAnalysis => {
                ("llama3.2", "Model for analyzing research results")
            }
            Parameter::OllamaTimeout => ("30", "Timeout in seconds for Ollama API requests"),
        }
    }
}

/// Persistent side of the settings service
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Read a parameter value, `None` if the row doesn't exist
    async fn read(&self, name: &str) -> StoreResult<Option<String>>;

    /// Upsert a parameter value
    async fn write(&self, name: &str, value: &str) -> StoreResult<()>;
}

/// Read-through / write-through configuration lookup
#[derive(Clone)]
pub struct Settings {
    backend: Arc<dyn SettingsBackend>,
    cache: Arc<dyn SettingsCache>,
}

impl Settings {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self {
            backend,
            cache: Arc::new(ProcessCache::new()),
        }
    }

    pub fn with_cache(backend: Arc<dyn SettingsBackend>, cache: Arc<dyn SettingsCache>) -> Self {
        Self { backend, cache }
    }

    /// Cached value if present, else the persisted value (populating the
    /// cache), else `default`. Database errors also yield `default`.
    pub async fn get(&self, param: Parameter, default: &str) -> String {
        let name = param.as_str();
        if let Ok(Some(value)) = self.cache.get(name) {
            return value;
        }
        match self.backend.read(name).await {
            Ok(Some(value)) => {
                if let Err(e) = self.cache.put(name, &value) {
                    warn!(parameter = name, error = %e, "settings cache update failed");
                }
                value
            }
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!(parameter = name, error = %e, "settings read failed, using default");
                default.to_string()
            }
        }
    }

    /// `get` plus parsing, falling back to `default` on unparseable values
    pub async fn get_parsed<T: FromStr + ToString>(&self, param: Parameter, default: T) -> T {
        let raw = self.get(param, &default.to_string()).await;
        raw.parse().unwrap_or(default)
    }

    /// Persist first, then best-effort cache update
    pub async fn set(&self, param: Parameter, value: &str) -> StoreResult<()> {
        let name = param.as_str();
        self.backend.write(name, value).await?;
        if let Err(e) = self.cache.put(name, value) {
            warn!(parameter = name, error = %e, "settings cache update failed after write");
        }
        Ok(())
    }

    /// The Ollama connection settings used by the chat pipeline
    pub async fn ollama(&self) -> OllamaSettings {
        OllamaSettings {
            host: self.get(Parameter::OllamaHost, "http://localhost:11434").await,
            general_model: self.get(Parameter::OllamaModelGeneral, "llama3.2").await,
            biomedical_model: self.get(Parameter::OllamaModelBiomedical, "llama3.2").await,
            analysis_model: self.get(Parameter::OllamaModelAnalysis, "llama3.2").await,
            timeout_secs: self.get_parsed(Parameter::OllamaTimeout, 30u64).await,
        }
    }
}

/// Resolved model-runtime settings
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub host: String,
    pub general_model: String,
    pub biomedical_model: String,
    pub analysis_model: String,
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache::{CacheError, CacheResult};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory backend standing in for the system_configuration table
    #[derive(Default)]
    struct MemoryBackend {
        rows: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SettingsBackend for MemoryBackend {
        async fn read(&self, name: &str) -> StoreResult<Option<String>> {
            Ok(self.rows.lock().await.get(name).cloned())
        }

        async fn write(&self, name: &str, value: &str) -> StoreResult<()> {
            self.rows
                .lock()
                .await
                .insert(name.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Cache that always fails, simulating a broken cache backend
    struct BrokenCache;

    impl SettingsCache for BrokenCache {
        fn get(&self, _name: &str) -> CacheResult<Option<String>> {
            Err(CacheError("down".to_string()))
        }
        fn put(&self, _name: &str, _value: &str) -> CacheResult<()> {
            Err(CacheError("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_set_then_get_returns_written_value() {
        let backend = Arc::new(MemoryBackend::default());
        let settings = Settings::new(backend);

        settings.set(Parameter::OllamaHost, "http://gpu-box:11434").await.unwrap();
        assert_eq!(
            settings.get(Parameter::OllamaHost, "http://localhost:11434").await,
            "http://gpu-box:11434"
        );
    }

    #[tokio::test]
    async fn test_get_survives_cache_eviction() {
        let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::default());
        let settings = Settings::new(backend.clone());
        settings.set(Parameter::RateLimit, "7").await.unwrap();

        // Fresh cache over the same backend simulates eviction of every entry
        let evicted = Settings::new(backend);
        assert_eq!(evicted.get(Parameter::RateLimit, "3").await, "7");
    }

    #[tokio::test]
    async fn test_unset_parameter_returns_default() {
        let settings = Settings::new(Arc::new(MemoryBackend::default()));
        assert_eq!(settings.get(Parameter::NcbiApiKey, "").await, "");
        assert_eq!(
            settings.get(Parameter::OllamaModelGeneral, "llama3.2").await,
            "llama3.2"
        );
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_break_reads_or_writes() {
        let backend = Arc::new(MemoryBackend::default());
        let settings = Settings::with_cache(backend, Arc::new(BrokenCache));

        settings.set(Parameter::OllamaTimeout, "60").await.unwrap();
        assert_eq!(settings.get(Parameter::OllamaTimeout, "30").await, "60");
    }

    #[tokio::test]
    async fn test_read_populates_cache() {
        let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::default());
        backend.write("ollama_host", "http://a:11434").await.unwrap();

        let cache = Arc::new(ProcessCache::new());
        let settings = Settings::with_cache(backend.clone(), cache.clone());
        settings.get(Parameter::OllamaHost, "x").await;

        assert_eq!(
            cache.get("ollama_host").unwrap(),
            Some("http://a:11434".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_parsed_falls_back_on_garbage() {
        let backend = Arc::new(MemoryBackend::default());
        backend.write("ollama_timeout", "not-a-number").await.unwrap();
        let settings = Settings::new(backend);
        assert_eq!(settings.get_parsed(Parameter::OllamaTimeout, 30u64).await, 30);
    }

    #[test]
    fn test_parameter_name_round_trip() {
        for param in Parameter::ALL {
            assert_eq!(Parameter::parse(param.as_str()), Some(param));
        }
        assert_eq!(Parameter::parse("nonexistent"), None);
    }

    #[tokio::test]
    async fn test_ollama_settings_defaults() {
        let settings = Settings::new(Arc::new(MemoryBackend::default()));
        let ollama = settings.ollama().await;
        assert_eq!(ollama.host, "http://localhost:11434");
        assert_eq!(ollama.general_model, "llama3.2");
        assert_eq!(ollama.timeout_secs, 30);
    }
}
