//! # NeonKit Centerline
//!
//! Estimates the centerline length of text glyphs: how much LED neon or
//! channel-letter wiring it takes to trace each character at a given letter
//! height.
//!
//! ## Pipeline
//!
//! ```text
//! font bytes ──> FontFace (GlyphSource)
//!                  └── ContourCollector   curves flattened to contours
//!                        └── build_shape  exteriors, holes, unioned parts
//!                              └── Rasterizer   square occupancy grid
//!                                    └── skeletonize   Zhang–Suen thinning
//!                                          └── estimate_length   mm
//! ```
//!
//! Each character is measured independently. Whitespace counts as zero,
//! characters the font lacks count as zero with a
//! [`MeasurementStatus::GlyphNotFound`] status, and only an unreadable font
//! or a bad request aborts the whole measurement.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use neonkit_centerline::measure;
//!
//! let font = std::fs::read("Sign-Bold.ttf")?;
//! let result = measure(&font, "OPEN", 150.0)?;
//! for c in result.characters() {
//!     println!("{} {:.1} mm", c.character, c.length_mm);
//! }
//! println!("total {:.1} mm", result.total_mm());
//! ```

pub mod costing;
pub mod font;
pub mod geometry;
pub mod length;
pub mod measurement;
pub mod outline;
pub mod pipeline;
pub mod raster;
pub mod shape;
pub mod skeleton;

pub use costing::{CostEstimate, CostRates, LetterCost};
pub use font::{FontFace, GlyphSource, MemoryFont};
pub use geometry::{BoundingBox, Contour, Point};
pub use length::{estimate_length, neighbor_counts, pixel_length, LengthPolicy, NeighborCounts};
pub use measurement::{CharacterMeasurement, MeasurementStatus, TextMeasurement};
pub use outline::{ContourCollector, DEFAULT_CURVE_SEGMENTS, MIN_CURVE_SEGMENTS};
pub use pipeline::{
    measure, measure_character, measure_source, measure_with, trace_glyph, trace_source,
    trace_with, GlyphTrace, MeasureOptions, MeasureStrategy,
};
pub use raster::{
    GridTransform, OccupancyGrid, RasterStrategy, Rasterizer, DEFAULT_RESOLUTION,
    MAX_RESOLUTION, MIN_RESOLUTION,
};
pub use shape::{build_shape, RingRole, Shape, ShapePart};
pub use skeleton::{skeletonize, Skeleton};

pub use neonkit_core::{GlyphIssue, MeasureError, Result};
