//! Application configuration module.
//!
//! Manages the TOML config file holding the OMDb connection settings
//! and search behaviour (debounce interval, featured term, placeholder).

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_log_path};
