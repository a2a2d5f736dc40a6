//! Glyph sources: where character outlines come from.

use std::collections::HashMap;

use neonkit_core::{MeasureError, Result};
use rusttype::{Font, Scale};
use tracing::debug;

use crate::geometry::Contour;
use crate::outline::ContourCollector;

/// A font as seen by the measurement pipeline.
///
/// Coordinates are font design units with y up.
pub trait GlyphSource: Sync {
    fn units_per_em(&self) -> f64;

    /// Flattened outline of `ch`, or `None` when the font has no glyph for it.
    /// A glyph without any outline (a blank glyph) gives an empty list.
    fn contours(&self, ch: char, curve_segments: usize) -> Option<Vec<Contour>>;

    /// Horizontal advance of `ch` in design units.
    fn advance_width(&self, ch: char) -> Option<f64>;
}

/// TrueType/OpenType font parsed from bytes.
pub struct FontFace<'a> {
    font: Font<'a>,
    units_per_em: f64,
    /// Pixel height at which rusttype's scale factor is exactly 1.
    unit_scale: Scale,
}

impl<'a> FontFace<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let font = Font::try_from_bytes(data)
            .ok_or_else(|| MeasureError::font_load("not a TrueType or OpenType font"))?;

        let units_per_em = font.units_per_em();
        if units_per_em == 0 {
            return Err(MeasureError::font_load("units per em is zero"));
        }

        let v = font.v_metrics_unscaled();
        let line_height = v.ascent - v.descent;
        if line_height.is_nan() || line_height <= 0.0 {
            return Err(MeasureError::font_load(format!(
                "invalid vertical metrics (ascent {}, descent {})",
                v.ascent, v.descent
            )));
        }

        debug!(units_per_em, glyphs = font.glyph_count(), "Loaded font");
        Ok(Self {
            font,
            units_per_em: units_per_em as f64,
            unit_scale: Scale::uniform(line_height),
        })
    }

    pub fn glyph_count(&self) -> usize {
        self.font.glyph_count()
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.font.glyph(ch).id().0 != 0
    }
}

impl std::fmt::Debug for FontFace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("units_per_em", &self.units_per_em)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl GlyphSource for FontFace<'_> {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn contours(&self, ch: char, curve_segments: usize) -> Option<Vec<Contour>> {
        if !self.has_glyph(ch) {
            return None;
        }
        let glyph = self.font.glyph(ch).scaled(self.unit_scale);
        // rusttype emits y-down coordinates
        let mut collector = ContourCollector::with_transform(curve_segments, 1.0, -1.0);
        if !glyph.build_outline(&mut collector) {
            return Some(Vec::new());
        }
        Some(collector.finish())
    }

    fn advance_width(&self, ch: char) -> Option<f64> {
        if !self.has_glyph(ch) {
            return None;
        }
        let metrics = self.font.glyph(ch).scaled(self.unit_scale).h_metrics();
        Some(metrics.advance_width as f64)
    }
}

/// Glyph source backed by contours held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    units_per_em: f64,
    glyphs: HashMap<char, Vec<Contour>>,
    advances: HashMap<char, f64>,
}

impl MemoryFont {
    pub fn new(units_per_em: f64) -> Self {
        Self {
            units_per_em,
            ..Default::default()
        }
    }

    /// Adds a glyph whose advance is the right edge of its outline.
    pub fn with_glyph(mut self, ch: char, contours: Vec<Contour>) -> Self {
        let advance = contours
            .iter()
            .filter_map(Contour::bounds)
            .map(|b| b.max_x)
            .fold(0.0, f64::max);
        self.advances.insert(ch, advance);
        self.glyphs.insert(ch, contours);
        self
    }

    pub fn with_advance(mut self, ch: char, advance: f64) -> Self {
        self.advances.insert(ch, advance);
        self
    }
}

impl GlyphSource for MemoryFont {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn contours(&self, ch: char, _curve_segments: usize) -> Option<Vec<Contour>> {
        self.glyphs.get(&ch).cloned()
    }

    fn advance_width(&self, ch: char) -> Option<f64> {
        self.advances.get(&ch).copied()
    }
}
