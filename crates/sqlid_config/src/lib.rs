//! Parsing and validation of `sqlid.toml` configuration files.
//!
//! The file is optional; every section and field has a default, so an empty
//! file and a missing file describe the same [`SqlIdConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use types::*;
