//! Configuration for NeonKit
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats; the default file lives in the
//! platform configuration directory.
//!
//! Configuration is organized into two sections:
//! - Measurement settings (raster resolution, curve flattening, strategy)
//! - Costing (currency and rates used for quotes)
//!
//! Costing values can be overridden from the environment with `CURRENCY`,
//! `LED_COST_PER_METER`, `FAB_COST_PER_MM` and `SETUP_COST`. Numbers accept a
//! decimal comma.

use std::path::{Path, PathBuf};

pub use neonkit_centerline::{CostRates, LengthPolicy, MeasureStrategy, RasterStrategy};
use neonkit_centerline::{
    MeasureOptions, DEFAULT_CURVE_SEGMENTS, DEFAULT_RESOLUTION, MAX_RESOLUTION,
    MIN_CURVE_SEGMENTS, MIN_RESOLUTION,
};
pub use neonkit_core::MeasurementSystem;
use neonkit_core::parse_decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "neonkit";
/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Most segments a curve may be flattened into.
const MAX_CURVE_SEGMENTS: usize = 256;

/// Measurement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Raster canvas side in pixels
    pub resolution: u32,
    /// Clear pixels kept around each glyph
    pub padding: u32,
    /// Line segments per flattened curve
    pub curve_segments: usize,
    /// Skeleton length or advance-width approximation
    pub strategy: MeasureStrategy,
    pub length_policy: LengthPolicy,
    pub raster_strategy: RasterStrategy,
    /// Measure characters in parallel
    pub parallel: bool,
    /// Attach skeleton and outline geometry to results
    pub include_geometry: bool,
    /// Units lengths are displayed in
    pub units: MeasurementSystem,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        let options = MeasureOptions::default();
        Self {
            resolution: DEFAULT_RESOLUTION,
            padding: options.padding,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
            strategy: options.strategy,
            length_policy: options.length_policy,
            raster_strategy: options.raster_strategy,
            parallel: options.parallel,
            include_geometry: options.include_geometry,
            units: MeasurementSystem::Metric,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Measurement settings
    pub measurement: MeasurementSettings,
    /// Costing rates
    pub costing: CostRates,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/neonkit/config.toml`
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
            })
    }

    /// Load the default config file, or defaults when it does not exist.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.measurement;
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&m.resolution) {
            return Err(ConfigError::out_of_range(
                "measurement.resolution",
                m.resolution,
            ));
        }
        if m.padding == 0 || m.padding.saturating_mul(4) > m.resolution {
            return Err(ConfigError::out_of_range("measurement.padding", m.padding));
        }
        if !(MIN_CURVE_SEGMENTS..=MAX_CURVE_SEGMENTS).contains(&m.curve_segments) {
            return Err(ConfigError::out_of_range(
                "measurement.curve_segments",
                m.curve_segments,
            ));
        }

        let c = &self.costing;
        if c.currency.trim().is_empty() {
            return Err(ConfigError::out_of_range("costing.currency", "\"\""));
        }
        for (key, value) in [
            ("costing.led_cost_per_meter", c.led_cost_per_meter),
            ("costing.fab_cost_per_mm", c.fab_cost_per_mm),
            ("costing.setup_cost", c.setup_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        Ok(())
    }

    /// Apply `CURRENCY`, `LED_COST_PER_METER`, `FAB_COST_PER_MM` and
    /// `SETUP_COST` from the process environment.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply costing overrides from any key lookup. Unset or blank values
    /// leave the current setting alone.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(currency) = lookup("CURRENCY").filter(|v| !v.trim().is_empty()) {
            self.costing.currency = currency.trim().to_string();
        }

        let rates: [(&str, &mut f64); 3] = [
            ("LED_COST_PER_METER", &mut self.costing.led_cost_per_meter),
            ("FAB_COST_PER_MM", &mut self.costing.fab_cost_per_mm),
            ("SETUP_COST", &mut self.costing.setup_cost),
        ];
        for (key, slot) in rates {
            let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            *slot = parse_decimal(&raw).map_err(|_| ConfigError::InvalidEnvironment {
                key: key.to_string(),
                value: raw.clone(),
            })?;
            debug!(key, value = *slot, "Applied override");
        }

        self.validate()
    }

    /// Options for a measurement request
    pub fn measure_options(&self) -> MeasureOptions {
        let m = &self.measurement;
        MeasureOptions::default()
            .with_resolution(m.resolution)
            .with_padding(m.padding)
            .with_curve_segments(m.curve_segments)
            .with_strategy(m.strategy)
            .with_length_policy(m.length_policy)
            .with_raster_strategy(m.raster_strategy)
            .with_parallel(m.parallel)
            .with_geometry(m.include_geometry)
    }

    /// Rates for cost estimates
    pub fn cost_rates(&self) -> CostRates {
        self.costing.clone()
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
