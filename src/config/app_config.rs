use std::time::Duration;

use serde::Deserialize;

use crate::domain::DEFAULT_PAGE_SIZE;
use crate::infrastructure::cache::QueryCacheConfig;
use crate::infrastructure::pipeline::PipelineConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub pipeline: PipelineSettings,
    pub logging: LoggingConfig,
}

/// Remote search API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout; unset means the HTTP client's default
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_ms: u64,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub debounce_ms: u64,
    pub default_page_size: u32,
    pub criteria_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 60_000,
            max_entries: 5,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            default_page_size: DEFAULT_PAGE_SIZE,
            criteria_required: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl CacheConfig {
    pub fn to_cache_config(&self) -> QueryCacheConfig {
        QueryCacheConfig::default()
            .with_ttl(Duration::from_millis(self.ttl_ms))
            .with_max_entries(self.max_entries)
    }
}

impl PipelineSettings {
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_debounce(Duration::from_millis(self.debounce_ms))
            .with_default_page_size(self.default_page_size)
            .with_criteria_required(self.criteria_required)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert!(config.api.timeout().is_none());
        assert_eq!(config.cache.ttl_ms, 60_000);
        assert_eq!(config.cache.max_entries, 5);
        assert_eq!(config.pipeline.debounce_ms, 50);
        assert_eq!(config.pipeline.default_page_size, 20);
        assert!(config.pipeline.criteria_required);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [cache]
                max_entries = 10

                [logging]
                format = "json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.ttl_ms, 60_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_conversions() {
        let config = AppConfig {
            cache: CacheConfig {
                ttl_ms: 1_500,
                max_entries: 2,
            },
            pipeline: PipelineSettings {
                debounce_ms: 10,
                default_page_size: 50,
                criteria_required: false,
            },
            ..AppConfig::default()
        };

        let cache = config.cache.to_cache_config();
        assert_eq!(cache.ttl, Duration::from_millis(1_500));
        assert_eq!(cache.max_entries, 2);

        let pipeline = config.pipeline.to_pipeline_config();
        assert_eq!(pipeline.debounce, Duration::from_millis(10));
        assert_eq!(pipeline.default_page_size, 50);
        assert!(!pipeline.criteria_required);
    }
}
