//! Configuration module
//!
//! Settings are read from a TOML file (`LIBRARY_API_CONFIG` or
//! `~/.config/library-api/config.toml`). Every section and key is optional;
//! missing values fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub rate_limit: RateLimitSection,
    pub cache_headers: CacheHeadersSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds in-flight requests get after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    /// Load the demo authors into an empty database at startup
    pub seed: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            seed: true,
        }
    }
}

impl DatabaseSection {
    /// `DATABASE_URL` wins over the configured url.
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// One limit: at most `limit` requests per client IP every `period_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub limit: u32,
    pub period_secs: u64,
}

impl RateLimitRule {
    pub fn new(limit: u32, period_secs: u64) -> Self {
        Self { limit, period_secs }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    /// Time to regain one request slot.
    pub fn replenish_interval(&self) -> Duration {
        self.period() / self.limit.max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSection {
    pub enabled: bool,
    pub rules: Vec<RateLimitRule>,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: vec![RateLimitRule::new(1000, 300), RateLimitRule::new(200, 10)],
        }
    }
}

impl RateLimitSection {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheHeadersSection {
    pub max_age: u64,
    pub must_revalidate: bool,
    /// Upper bound on remembered validators
    pub max_entries: usize,
}

impl Default for CacheHeadersSection {
    fn default() -> Self {
        Self {
            max_age: 600,
            must_revalidate: true,
            max_entries: 10_000,
        }
    }
}

impl CacheHeadersSection {
    pub fn cache_control(&self) -> String {
        let mut value = format!("public, max-age={}", self.max_age);
        if self.must_revalidate {
            value.push_str(", must-revalidate");
        }
        value
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// `<config dir>/library-api/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("library-api").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();

        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.database.seed);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.rate_limit.enabled);
        assert_eq!(
            cfg.rate_limit.rules,
            vec![RateLimitRule::new(1000, 300), RateLimitRule::new(200, 10)]
        );
        assert_eq!(cfg.cache_headers.max_age, 600);
        assert!(cfg.cache_headers.must_revalidate);
        assert_eq!(cfg.cache_headers.max_entries, 10_000);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [rate_limit]
            rules = [{ limit = 5, period_secs = 1 }]

            [cache_headers]
            must_revalidate = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.rate_limit.enabled);
        assert_eq!(cfg.rate_limit.rules, vec![RateLimitRule::new(5, 1)]);
        assert_eq!(cfg.cache_headers.cache_control(), "public, max-age=600");
    }

    #[test]
    fn cache_control_header() {
        assert_eq!(
            CacheHeadersSection::default().cache_control(),
            "public, max-age=600, must-revalidate"
        );
    }

    #[test]
    fn replenish_interval_spreads_the_period() {
        assert_eq!(
            RateLimitRule::new(1000, 300).replenish_interval(),
            Duration::from_millis(300)
        );
        assert_eq!(
            RateLimitRule::new(200, 10).replenish_interval(),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/library-api.toml")).unwrap();
        assert_eq!(cfg.server.address(), "0.0.0.0:5000");
    }
}
