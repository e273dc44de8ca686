//! Resolution of the configuration file used by a CLI invocation.

use std::path::{Path, PathBuf};

use sqlid_config::{ConfigError, SqlIdConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Loads the configuration for this run.
///
/// Uses `--config` when given, else `sqlid.toml` in the current directory if
/// it exists, else built-in defaults.
pub fn load(global: &GlobalArgs) -> Result<SqlIdConfig, ConfigError> {
    match config_path(global, Path::new(".")) {
        Some(path) => sqlid_config::load_config_file(&path),
        None => Ok(SqlIdConfig::default()),
    }
}

fn config_path(global: &GlobalArgs, cwd: &Path) -> Option<PathBuf> {
    if let Some(explicit) = &global.config {
        return Some(PathBuf::from(explicit));
    }
    let local = cwd.join(CONFIG_FILE);
    local.is_file().then_some(local)
}
