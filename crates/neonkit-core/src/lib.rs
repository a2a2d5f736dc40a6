//! # NeonKit Core
//!
//! Core types and utilities for NeonKit.
//! Provides the error taxonomy shared by the measurement pipeline and the
//! length units used for display and input parsing.

pub mod error;
pub mod units;

pub use error::{GlyphIssue, MeasureError, Result};
pub use units::{format_length, format_meters, parse_decimal, parse_length, MeasurementSystem};
