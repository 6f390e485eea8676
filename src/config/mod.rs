//! Layered configuration: defaults, config files, then `APP__` environment variables

mod app_config;

pub use app_config::{
    ApiConfig, AppConfig, CacheConfig, LogFormat, LoggingConfig, PipelineSettings,
};
