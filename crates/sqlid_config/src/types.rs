//! Configuration types deserialized from `sqlid.toml`.

use serde::Deserialize;

/// Default number of statements kept by the lookup cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// The top-level configuration parsed from `sqlid.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlIdConfig {
    /// Lookup cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Log output settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Settings for the `SQL_ID` lookup cache.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of cached statements. Must be at least 1.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Settings for diagnostic log output.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// A `tracing` env-filter directive such as `"info"` or `"sqlid_cache=trace"`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
