/**
 * Server Configuration
 *
 * Configuration is resolved in three layers, later layers winning:
 *
 * 1. Built-in defaults
 * 2. An optional TOML file named by `CHATLINE_CONFIG`
 * 3. Environment variables (a `.env` file is loaded by the binary first)
 *
 * | field            | env                              | default                  |
 * |------------------|----------------------------------|--------------------------|
 * | `bind_addr`      | `SERVER_ADDR` (or `SERVER_PORT`) | `0.0.0.0:3000`           |
 * | `database_url`   | `DATABASE_URL`                   | unset, in-memory store   |
 * | `poll_ceiling`   | `POLL_CEILING_MS`                | 30000                    |
 * | `poll_interval`  | `POLL_INTERVAL_MS`               | 1000                     |
 * | `topic_capacity` | `TOPIC_CAPACITY`                 | 100                      |
 * | `topic_cleanup`  | `TOPIC_CLEANUP_SECS`             | 300                      |
 * | `log_filter`     | `RUST_LOG`                       | `info,tower_http=debug`  |
 *
 * # Database
 *
 * `load_database` never fails the server: a missing URL, a failed
 * connection or a failed migration is logged and the caller falls back to
 * the in-memory store.
 */

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::backend::messaging::PollSettings;

pub const CONFIG_PATH_ENV: &str = "CHATLINE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub poll_ceiling: Duration,
    pub poll_interval: Duration,
    pub topic_capacity: usize,
    pub topic_cleanup: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let poll = PollSettings::default();
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            poll_ceiling: poll.ceiling,
            poll_interval: poll.interval,
            topic_capacity: 100,
            topic_cleanup: Duration::from_secs(300),
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Defaults, then `CHATLINE_CONFIG`, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.merge_file(path)?;
        }
        builder.merge_env()?.build()
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            ceiling: self.poll_ceiling,
            interval: self.poll_interval,
        }
    }
}

/// Shape of the TOML file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<SocketAddr>,
    database_url: Option<String>,
    poll_ceiling_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    topic_capacity: Option<usize>,
    topic_cleanup_secs: Option<u64>,
    log_filter: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn poll_ceiling(mut self, ceiling: Duration) -> Self {
        self.config.poll_ceiling = ceiling;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn topic_capacity(mut self, capacity: usize) -> Self {
        self.config.topic_capacity = capacity;
        self
    }

    pub fn topic_cleanup(mut self, period: Duration) -> Self {
        self.config.topic_cleanup = period;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    pub fn merge_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = &mut self.config;
        if let Some(addr) = file.bind_addr {
            config.bind_addr = addr;
        }
        if let Some(url) = file.database_url {
            config.database_url = Some(url);
        }
        if let Some(ms) = file.poll_ceiling_ms {
            config.poll_ceiling = Duration::from_millis(ms);
        }
        if let Some(ms) = file.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = file.topic_capacity {
            config.topic_capacity = capacity;
        }
        if let Some(secs) = file.topic_cleanup_secs {
            config.topic_cleanup = Duration::from_secs(secs);
        }
        if let Some(filter) = file.log_filter {
            config.log_filter = filter;
        }
        Ok(self)
    }

    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source
    pub fn merge_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = &mut self.config;

        if let Some(addr) = lookup("SERVER_ADDR") {
            config.bind_addr = parse("SERVER_ADDR", &addr)?;
        } else if let Some(port) = lookup("SERVER_PORT") {
            config.bind_addr.set_port(parse("SERVER_PORT", &port)?);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            config.database_url = Some(url);
        }
        if let Some(ms) = lookup("POLL_CEILING_MS") {
            config.poll_ceiling = Duration::from_millis(parse("POLL_CEILING_MS", &ms)?);
        }
        if let Some(ms) = lookup("POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(parse("POLL_INTERVAL_MS", &ms)?);
        }
        if let Some(capacity) = lookup("TOPIC_CAPACITY") {
            config.topic_capacity = parse("TOPIC_CAPACITY", &capacity)?;
        }
        if let Some(secs) = lookup("TOPIC_CLEANUP_SECS") {
            config.topic_cleanup = Duration::from_secs(parse("TOPIC_CLEANUP_SECS", &secs)?);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = self.config;
        if config.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("poll interval must be positive".into()));
        }
        if config.poll_interval > config.poll_ceiling {
            return Err(ConfigError::Invalid(format!(
                "poll interval {:?} exceeds poll ceiling {:?}",
                config.poll_interval, config.poll_ceiling
            )));
        }
        if config.topic_capacity == 0 {
            return Err(ConfigError::Invalid("topic capacity must be positive".into()));
        }
        if config.topic_cleanup.is_zero() {
            return Err(ConfigError::Invalid("topic cleanup period must be positive".into()));
        }
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Connect to PostgreSQL and apply migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable and migrated
/// - `None` if no URL is configured, the connection fails or migrations fail
pub async fn load_database(config: &ServerConfig) -> Option<PgPool> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return None;
        }
    };

    migrate_or_discard(pool).await
}

/// Apply migrations; a pool whose schema could not be brought up to date is
/// closed rather than served.
async fn migrate_or_discard(pool: PgPool) -> Option<PgPool> {
    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
            Some(pool)
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Falling back to the in-memory store.");
            pool.close().await;
            None
        }
    }
}
