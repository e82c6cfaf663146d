//! Configuration file loading for query-broker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BROKER_` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./broker.toml` or `./.broker.toml`
//! 4. Global: `$XDG_CONFIG_HOME/query-broker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileContextConfig, FileLoggingConfig, FileReplConfig,
    FileResolversConfig, FileTimeoutsConfig,
};
pub use loader::ConfigLoader;
