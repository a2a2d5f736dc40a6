//! NeonKit Settings Crate
//!
//! Handles application configuration: file formats, defaults, validation and
//! environment overrides for costing.

pub mod config;
pub mod error;

pub use config::{Config, MeasurementSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
