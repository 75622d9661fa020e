use std::str::FromStr;

use ::config::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    Development,
    Production,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime_days: i64,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub environment: RuntimeEnv,
    pub database_url: String,
    pub log_level: String,
    pub catalog_path: Option<String>,
    pub server: ServerConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Defaults overridden by `QUIZ__*` environment variables,
    /// e.g. `QUIZ__SERVER__PORT=8080`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("environment", "development")?
            .set_default("database_url", "sqlite://quiz.db")?
            .set_default("log_level", "debug")?
            .set_default("server.address", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("session.cookie_name", "quiz_session")?
            .set_default("session.lifetime_days", 7)?
            .set_default("session.cleanup_interval_secs", 3600)?
            .add_source(
                Environment::with_prefix("QUIZ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment == RuntimeEnv::Development
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::INFO)
    }
}
