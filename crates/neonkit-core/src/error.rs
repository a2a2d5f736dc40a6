//! Error handling for NeonKit
//!
//! Provides the error taxonomy of the measurement pipeline:
//! - Request errors (fatal, returned from `measure`)
//! - Glyph issues (recovered locally as zero-length measurements)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Measurement request error type
///
/// Only these conditions propagate out of a measurement request. Any of them
/// aborts the whole request and no partial results are produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The font binary is malformed or unreadable
    #[error("Failed to load font: {reason}")]
    FontLoad {
        /// Why the font could not be loaded.
        reason: String,
    },

    /// Target letter height is not a positive, finite number
    #[error("Invalid target height: {value} mm (must be > 0)")]
    InvalidHeight {
        /// The rejected height in millimetres.
        value: f64,
    },

    /// Measurement options are out of range
    #[error("Invalid measurement options: {reason}")]
    InvalidOptions {
        /// Which option was rejected and why.
        reason: String,
    },
}

impl MeasureError {
    /// Create a font loading error from a message
    pub fn font_load(reason: impl Into<String>) -> Self {
        MeasureError::FontLoad {
            reason: reason.into(),
        }
    }

    /// Check if this is a font loading error
    pub fn is_font_error(&self) -> bool {
        matches!(self, MeasureError::FontLoad { .. })
    }
}

/// Per-character conditions that degrade to a zero-length measurement
///
/// These never leave the pipeline as errors. The orchestrator logs them and
/// records them on the character's measurement status.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphIssue {
    /// The character has no mapped glyph in the font
    #[error("No glyph for {character:?}")]
    GlyphNotFound {
        /// The unmapped character.
        character: char,
    },

    /// The glyph outline encloses no area
    #[error("Glyph for {character:?} encloses no area")]
    DegenerateShape {
        /// The character whose outline is degenerate.
        character: char,
    },
}

impl GlyphIssue {
    /// The character this issue refers to
    pub fn character(&self) -> char {
        match self {
            GlyphIssue::GlyphNotFound { character } | GlyphIssue::DegenerateShape { character } => {
                *character
            }
        }
    }
}

/// Result type using MeasureError
pub type Result<T> = std::result::Result<T, MeasureError>;
