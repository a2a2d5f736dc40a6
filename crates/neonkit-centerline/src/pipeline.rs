//! Measurement orchestration.
//!
//! Each character runs through outline extraction, shape assembly,
//! rasterization, thinning and length estimation independently of the
//! others. Problems with a single glyph degrade to a zero-length entry with a
//! status; only font and argument errors abort the request.

use std::fmt;
use std::str::FromStr;

use neonkit_core::{GlyphIssue, MeasureError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::font::{FontFace, GlyphSource};
use crate::geometry::{Contour, Point};
use crate::length::{estimate_length, mm_per_pixel, LengthPolicy};
use crate::measurement::{CharacterMeasurement, MeasurementStatus, TextMeasurement};
use crate::outline::{DEFAULT_CURVE_SEGMENTS, MIN_CURVE_SEGMENTS};
use crate::raster::{
    OccupancyGrid, RasterStrategy, Rasterizer, DEFAULT_PADDING, DEFAULT_RESOLUTION,
};
use crate::shape::{build_shape, Shape};
use crate::skeleton::{skeletonize, Skeleton};

/// How a character's length is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureStrategy {
    /// Skeleton length of the rasterized glyph.
    #[default]
    Skeleton,
    /// Advance width of the glyph; a fast, rough stand-in.
    AdvanceWidth,
}

impl fmt::Display for MeasureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureStrategy::Skeleton => write!(f, "skeleton"),
            MeasureStrategy::AdvanceWidth => write!(f, "advance-width"),
        }
    }
}

impl FromStr for MeasureStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skeleton" => Ok(MeasureStrategy::Skeleton),
            "advance-width" | "advance_width" | "advance" => Ok(MeasureStrategy::AdvanceWidth),
            other => Err(format!("unknown measure strategy: {other}")),
        }
    }
}

/// Tuning knobs for a measurement request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureOptions {
    /// Side of the square raster canvas in pixels. Clamped when used.
    pub resolution: u32,
    /// Clear pixels around the glyph on each side.
    pub padding: u32,
    /// Line segments per flattened curve.
    pub curve_segments: usize,
    pub strategy: MeasureStrategy,
    pub length_policy: LengthPolicy,
    pub raster_strategy: RasterStrategy,
    /// Measure characters on the rayon thread pool.
    pub parallel: bool,
    /// Attach skeleton points and outlines to each measurement.
    pub include_geometry: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            padding: DEFAULT_PADDING,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
            strategy: MeasureStrategy::default(),
            length_policy: LengthPolicy::default(),
            raster_strategy: RasterStrategy::default(),
            parallel: false,
            include_geometry: false,
        }
    }
}

impl MeasureOptions {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_curve_segments(mut self, segments: usize) -> Self {
        self.curve_segments = segments;
        self
    }

    pub fn with_strategy(mut self, strategy: MeasureStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    pub fn with_raster_strategy(mut self, strategy: RasterStrategy) -> Self {
        self.raster_strategy = strategy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_geometry(mut self, include: bool) -> Self {
        self.include_geometry = include;
        self
    }

    /// Reject options no request can run with.
    pub fn validate(&self) -> Result<()> {
        if self.curve_segments < MIN_CURVE_SEGMENTS {
            return Err(MeasureError::InvalidOptions {
                reason: format!(
                    "curve_segments must be at least {MIN_CURVE_SEGMENTS}, got {}",
                    self.curve_segments
                ),
            });
        }
        if self.padding == 0 {
            return Err(MeasureError::InvalidOptions {
                reason: "padding must be at least 1 pixel".to_string(),
            });
        }
        let resolution = self.rasterizer().resolution();
        if self.padding.saturating_mul(4) > resolution {
            return Err(MeasureError::InvalidOptions {
                reason: format!(
                    "padding {} leaves no room on a {resolution} px canvas",
                    self.padding
                ),
            });
        }
        Ok(())
    }

    pub fn rasterizer(&self) -> Rasterizer {
        Rasterizer::new(self.resolution)
            .with_padding(self.padding)
            .with_strategy(self.raster_strategy)
    }
}

fn validate_height(target_height_mm: f64) -> Result<()> {
    if !target_height_mm.is_finite() || target_height_mm <= 0.0 {
        return Err(MeasureError::InvalidHeight {
            value: target_height_mm,
        });
    }
    Ok(())
}

/// Every intermediate product of measuring one glyph.
#[derive(Debug, Clone)]
pub struct GlyphTrace {
    pub character: char,
    pub contours: Vec<Contour>,
    pub shape: Shape,
    pub grid: OccupancyGrid,
    pub skeleton: Skeleton,
    pub mm_per_pixel: f64,
    pub length_mm: f64,
}

impl GlyphTrace {
    /// Skeleton pixel centres in millimetres.
    pub fn skeleton_mm(&self, mm_per_unit: f64) -> Vec<Point> {
        self.skeleton
            .points()
            .iter()
            .map(|p| p.scaled(mm_per_unit))
            .collect()
    }

    /// Shape rings in millimetres, exteriors first within each part.
    pub fn outline_mm(&self, mm_per_unit: f64) -> Vec<Contour> {
        self.shape
            .rings()
            .map(|(_, ring)| ring.scaled(mm_per_unit))
            .collect()
    }
}

/// Run the skeleton pipeline on one glyph.
pub fn trace_glyph<S: GlyphSource + ?Sized>(
    source: &S,
    ch: char,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> std::result::Result<GlyphTrace, GlyphIssue> {
    let contours = source
        .contours(ch, options.curve_segments)
        .ok_or(GlyphIssue::GlyphNotFound { character: ch })?;

    let shape = build_shape(contours.clone());
    if shape.is_degenerate() {
        return Err(GlyphIssue::DegenerateShape { character: ch });
    }

    let grid = options.rasterizer().rasterize(&shape);
    if grid.is_empty() {
        return Err(GlyphIssue::DegenerateShape { character: ch });
    }

    let skeleton = skeletonize(&grid);
    let mm_per_pixel = mm_per_pixel(
        grid.transform().scale,
        target_height_mm,
        source.units_per_em(),
    );
    let length_mm = estimate_length(&skeleton, options.length_policy, mm_per_pixel);

    debug!(
        character = %ch,
        contours = contours.len(),
        parts = shape.parts.len(),
        holes = shape.hole_count(),
        filled = grid.count(),
        skeleton = skeleton.len(),
        length_mm,
        "Traced glyph"
    );

    Ok(GlyphTrace {
        character: ch,
        contours,
        shape,
        grid,
        skeleton,
        mm_per_pixel,
        length_mm,
    })
}

/// Measure a single character. Never fails: glyph problems become zero
/// length entries.
pub fn measure_character<S: GlyphSource + ?Sized>(
    source: &S,
    ch: char,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> CharacterMeasurement {
    measure_traced(source, ch, target_height_mm, options).0
}

/// Measurement of one character plus its trace when a skeleton was measured.
fn measure_traced<S: GlyphSource + ?Sized>(
    source: &S,
    ch: char,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> (CharacterMeasurement, Option<GlyphTrace>) {
    if ch.is_whitespace() || ch.is_control() {
        return (CharacterMeasurement::space(ch), None);
    }

    let mm_per_unit = target_height_mm / source.units_per_em();
    match options.strategy {
        MeasureStrategy::AdvanceWidth => {
            let m = match source.advance_width(ch) {
                Some(advance) => CharacterMeasurement::with_status(
                    ch,
                    advance * mm_per_unit,
                    MeasurementStatus::Approximated,
                ),
                None => absorb(GlyphIssue::GlyphNotFound { character: ch }),
            };
            (m, None)
        }
        MeasureStrategy::Skeleton => match trace_glyph(source, ch, target_height_mm, options) {
            Ok(trace) => {
                let mut m = CharacterMeasurement::measured(ch, trace.length_mm);
                if options.include_geometry {
                    m.skeleton = Some(trace.skeleton_mm(mm_per_unit));
                    m.outline = Some(trace.outline_mm(mm_per_unit));
                }
                (m, Some(trace))
            }
            Err(issue) => (absorb(issue), None),
        },
    }
}

fn absorb(issue: GlyphIssue) -> CharacterMeasurement {
    warn!(character = %issue.character(), "{issue}; counting as zero length");
    CharacterMeasurement::from_issue(issue)
}

/// Measure `text` with any glyph source.
pub fn measure_source<S: GlyphSource + ?Sized>(
    source: &S,
    text: &str,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> Result<TextMeasurement> {
    run(source, text, target_height_mm, options, false).map(|(m, _)| m)
}

/// Measure `text` and keep the [`GlyphTrace`] behind every skeleton
/// measurement, in input order.
pub fn trace_source<S: GlyphSource + ?Sized>(
    source: &S,
    text: &str,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> Result<(TextMeasurement, Vec<GlyphTrace>)> {
    run(source, text, target_height_mm, options, true)
}

fn run<S: GlyphSource + ?Sized>(
    source: &S,
    text: &str,
    target_height_mm: f64,
    options: &MeasureOptions,
    keep_traces: bool,
) -> Result<(TextMeasurement, Vec<GlyphTrace>)> {
    validate_height(target_height_mm)?;
    options.validate()?;

    let measure_one = |&ch: &char| {
        let (m, trace) = measure_traced(source, ch, target_height_mm, options);
        (m, trace.filter(|_| keep_traces))
    };
    let chars: Vec<char> = text.chars().collect();
    let (characters, traces): (Vec<CharacterMeasurement>, Vec<Option<GlyphTrace>>) =
        if options.parallel {
            chars.par_iter().map(measure_one).unzip()
        } else {
            chars.iter().map(measure_one).unzip()
        };

    let measurement = TextMeasurement::new(text, target_height_mm, characters);
    info!(
        characters = measurement.len(),
        total_mm = measurement.total_mm(),
        issues = measurement.issues().count(),
        strategy = %options.strategy,
        "Measured text"
    );
    Ok((measurement, traces.into_iter().flatten().collect()))
}

/// Measure `text` set in the font `font_bytes` with default options.
pub fn measure(font_bytes: &[u8], text: &str, target_height_mm: f64) -> Result<TextMeasurement> {
    measure_with(font_bytes, text, target_height_mm, &MeasureOptions::default())
}

/// Measure `text` set in the font `font_bytes`.
pub fn measure_with(
    font_bytes: &[u8],
    text: &str,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> Result<TextMeasurement> {
    validate_height(target_height_mm)?;
    options.validate()?;
    let face = FontFace::from_bytes(font_bytes)?;
    measure_source(&face, text, target_height_mm, options)
}

/// [`trace_source`] for a font file's bytes.
pub fn trace_with(
    font_bytes: &[u8],
    text: &str,
    target_height_mm: f64,
    options: &MeasureOptions,
) -> Result<(TextMeasurement, Vec<GlyphTrace>)> {
    validate_height(target_height_mm)?;
    options.validate()?;
    let face = FontFace::from_bytes(font_bytes)?;
    trace_source(&face, text, target_height_mm, options)
}
