//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SqlIdConfig;
use std::path::Path;

/// File name looked up in a directory by [`load_config`].
pub const CONFIG_FILE: &str = "sqlid.toml";

/// Loads and validates `sqlid.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<SqlIdConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<SqlIdConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SqlIdConfig, ConfigError> {
    let config: SqlIdConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates value ranges that serde cannot express.
fn validate_config(config: &SqlIdConfig) -> Result<(), ConfigError> {
    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "cache.capacity must be at least 1".to_string(),
        ));
    }
    if config.log.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "log.filter must not be empty".to_string(),
        ));
    }
    Ok(())
}
