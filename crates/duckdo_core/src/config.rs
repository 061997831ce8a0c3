//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Collect logging, storage and presentation settings in one record.
//! - Read overrides from `DUCKDO_*` environment variables.
//!
//! # Invariants
//! - Defaults are valid without any environment set.
//! - Malformed numeric overrides are rejected, not ignored.

use crate::advisory::DEFAULT_COACH_CACHE_TTL_MS;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "DUCKDO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DUCKDO_LOG_DIR";
pub const ENV_DB_PATH: &str = "DUCKDO_DB_PATH";
pub const ENV_ADVISORY_CACHE_TTL_MS: &str = "DUCKDO_ADVISORY_CACHE_TTL_MS";
pub const ENV_DRAW_REVEAL_DELAY_MS: &str = "DUCKDO_DRAW_REVEAL_DELAY_MS";
pub const ENV_ADVISORY_API_KEY: &str = "DUCKDO_ADVISORY_API_KEY";

/// Pause before a draw batch is revealed.
pub const DEFAULT_DRAW_REVEAL_DELAY_MS: u64 = 1_500;
const DEFAULT_DB_FILE_NAME: &str = "duckdo.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "duckdo-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { var, value } => {
                write!(f, "`{var}` must be a non-negative integer, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    /// Must be absolute; see `init_logging`.
    pub log_dir: PathBuf,
    pub db_path: PathBuf,
    pub advisory_cache_ttl_ms: i64,
    pub draw_reveal_delay_ms: u64,
    pub advisory_api_key: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            advisory_cache_ttl_ms: DEFAULT_COACH_CACHE_TTL_MS,
            draw_reveal_delay_ms: DEFAULT_DRAW_REVEAL_DELAY_MS,
            advisory_api_key: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_ADVISORY_CACHE_TTL_MS) {
            config.advisory_cache_ttl_ms = raw
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_ADVISORY_CACHE_TTL_MS,
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = read(ENV_DRAW_REVEAL_DELAY_MS) {
            config.draw_reveal_delay_ms =
                raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_DRAW_REVEAL_DELAY_MS,
                    value: raw.clone(),
                })?;
        }
        config.advisory_api_key = read(ENV_ADVISORY_API_KEY);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DRAW_REVEAL_DELAY_MS};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = CoreConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config.advisory_cache_ttl_ms, 300_000);
        assert_eq!(config.draw_reveal_delay_ms, 1_500);
        assert!(config.advisory_api_key.is_none());
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn overrides_are_read_and_trimmed() {
        let config = CoreConfig::from_lookup(lookup(&[
            ("DUCKDO_LOG_LEVEL", " warn "),
            ("DUCKDO_DB_PATH", "/tmp/pond.sqlite3"),
            ("DUCKDO_ADVISORY_CACHE_TTL_MS", "1000"),
            ("DUCKDO_DRAW_REVEAL_DELAY_MS", "0"),
            ("DUCKDO_ADVISORY_API_KEY", ""),
        ]))
        .expect("overrides");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path, PathBuf::from("/tmp/pond.sqlite3"));
        assert_eq!(config.advisory_cache_ttl_ms, 1_000);
        assert_eq!(config.draw_reveal_delay_ms, 0);
        assert!(config.advisory_api_key.is_none());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[("DUCKDO_DRAW_REVEAL_DELAY_MS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: ENV_DRAW_REVEAL_DELAY_MS,
                value: "soon".to_string()
            }
        );
    }
}
