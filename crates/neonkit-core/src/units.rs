//! Unit conversion utilities
//!
//! Lengths are carried in millimetres everywhere in the pipeline. This module
//! converts them for display (mm, metres, inches) and parses user input,
//! accepting decimal commas ("120,5") as well as points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format length value for display, two decimals with unit label
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.2} mm", value_mm),
        MeasurementSystem::Imperial => format!("{:.2} in", value_mm / MM_PER_INCH),
    }
}

/// Format a wiring length in metres (LED strip is sold per metre)
pub fn format_meters(value_mm: f64) -> String {
    format!("{:.3} m", value_mm / 1000.0)
}

/// Parse a decimal number, accepting a comma as decimal separator and
/// ignoring embedded spaces ("1 250,5" -> 1250.5)
pub fn parse_decimal(input: &str) -> Result<f64, String> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err("Empty number".to_string());
    }
    cleaned
        .parse::<f64>()
        .map_err(|e| format!("Invalid number '{}': {}", input.trim(), e))
}

/// Parse length string to millimeters
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let value = parse_decimal(input)?;
    Ok(match system {
        MeasurementSystem::Metric => value,
        MeasurementSystem::Imperial => value * MM_PER_INCH,
    })
}
