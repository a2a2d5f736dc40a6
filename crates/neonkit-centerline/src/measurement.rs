//! Measurement results.

use neonkit_core::GlyphIssue;
use serde::{Deserialize, Serialize};

use crate::geometry::{Contour, Point};

/// Why a character measured what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStatus {
    /// Skeleton length of the glyph.
    Measured,
    /// Whitespace or control character; always zero.
    Space,
    /// No glyph in the font; zero.
    GlyphNotFound,
    /// Glyph outline encloses nothing; zero.
    DegenerateShape,
    /// Advance width used in place of a skeleton length.
    Approximated,
}

impl From<GlyphIssue> for MeasurementStatus {
    fn from(issue: GlyphIssue) -> Self {
        match issue {
            GlyphIssue::GlyphNotFound { .. } => MeasurementStatus::GlyphNotFound,
            GlyphIssue::DegenerateShape { .. } => MeasurementStatus::DegenerateShape,
        }
    }
}

/// Length of one input character.
///
/// Geometry, when captured, is in millimetres with y up, relative to the
/// glyph origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMeasurement {
    pub character: char,
    pub length_mm: f64,
    pub status: MeasurementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<Contour>>,
}

impl CharacterMeasurement {
    pub fn measured(character: char, length_mm: f64) -> Self {
        Self::with_status(character, length_mm, MeasurementStatus::Measured)
    }

    pub fn space(character: char) -> Self {
        Self::with_status(character, 0.0, MeasurementStatus::Space)
    }

    /// Zero-length entry for a glyph problem.
    pub fn from_issue(issue: GlyphIssue) -> Self {
        Self::with_status(issue.character(), 0.0, issue.into())
    }

    pub fn with_status(character: char, length_mm: f64, status: MeasurementStatus) -> Self {
        Self {
            character,
            length_mm,
            status,
            skeleton: None,
            outline: None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.length_mm == 0.0
    }
}

/// Per-character lengths of a text in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TextMeasurementData")]
pub struct TextMeasurement {
    text: String,
    target_height_mm: f64,
    characters: Vec<CharacterMeasurement>,
    total_mm: f64,
}

/// Serialized form; a stored `total_mm` is ignored and recomputed.
#[derive(Deserialize)]
struct TextMeasurementData {
    text: String,
    target_height_mm: f64,
    characters: Vec<CharacterMeasurement>,
}

impl From<TextMeasurementData> for TextMeasurement {
    fn from(data: TextMeasurementData) -> Self {
        TextMeasurement::new(data.text, data.target_height_mm, data.characters)
    }
}

impl TextMeasurement {
    /// The total is always the sum of the character lengths.
    pub fn new(
        text: impl Into<String>,
        target_height_mm: f64,
        characters: Vec<CharacterMeasurement>,
    ) -> Self {
        let total_mm = characters.iter().map(|c| c.length_mm).sum();
        Self {
            text: text.into(),
            target_height_mm,
            characters,
            total_mm,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target_height_mm(&self) -> f64 {
        self.target_height_mm
    }

    pub fn characters(&self) -> &[CharacterMeasurement] {
        &self.characters
    }

    pub fn total_mm(&self) -> f64 {
        self.total_mm
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Characters that were not measured from a skeleton or counted as space.
    pub fn issues(&self) -> impl Iterator<Item = &CharacterMeasurement> {
        self.characters.iter().filter(|c| {
            matches!(
                c.status,
                MeasurementStatus::GlyphNotFound | MeasurementStatus::DegenerateShape
            )
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
