//! # NeonKit
//!
//! Estimates how much LED neon or channel-letter wiring a piece of text needs:
//! each glyph is rasterized, thinned to its skeleton and the skeleton length
//! scaled to the requested letter height.
//!
//! ## Architecture
//!
//! NeonKit is organized as a workspace with multiple crates:
//!
//! 1. **neonkit-core** - Error taxonomy, length units and formatting
//! 2. **neonkit-centerline** - Outline, shape, raster, skeleton and length pipeline
//! 3. **neonkit-settings** - Configuration files, validation, environment overrides
//! 4. **neonkit** - Command line binary that ties the crates together

pub mod report;

pub use neonkit_centerline as centerline;
pub use neonkit_settings as settings;

pub use neonkit_centerline::{
    measure, measure_with, CharacterMeasurement, CostEstimate, CostRates, MeasureOptions,
    MeasureStrategy, MeasurementStatus, TextMeasurement,
};
pub use neonkit_core::{GlyphIssue, MeasureError, MeasurementSystem};
pub use neonkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for results
/// - RUST_LOG environment variable support
/// - `level` as the default when RUST_LOG names no level
pub fn init_logging(format: LogFormat, level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
