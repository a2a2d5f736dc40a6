//! Outline extraction: glyph path commands to closed contours.
//!
//! [`ContourCollector`] receives the move/line/curve/close stream of a glyph
//! outline and turns it into polygonal [`Contour`]s. Curves are flattened by
//! uniform parameter sampling, which bounds the error well enough for signage
//! scale but does not adapt to curvature.

use lyon::geom::{CubicBezierSegment, QuadraticBezierSegment};
use lyon::math::{point, Point as LyonPoint};
use rusttype::OutlineBuilder;

use crate::geometry::{Contour, Point};

/// Line segments per flattened curve.
pub const DEFAULT_CURVE_SEGMENTS: usize = 24;

/// Fewer segments than this visibly facets small glyph curves.
pub const MIN_CURVE_SEGMENTS: usize = 16;

/// Collects glyph path commands into contours.
///
/// Incoming coordinates are mapped through `(x * x_scale, y * y_scale)` so a
/// reader working in scaled, y-down space can still produce design units with
/// y up.
#[derive(Debug, Clone)]
pub struct ContourCollector {
    contours: Vec<Contour>,
    current: Vec<Point>,
    cursor: LyonPoint,
    segments: usize,
    x_scale: f64,
    y_scale: f64,
}

impl ContourCollector {
    pub fn new(segments: usize) -> Self {
        Self::with_transform(segments, 1.0, 1.0)
    }

    pub fn with_transform(segments: usize, x_scale: f64, y_scale: f64) -> Self {
        Self {
            contours: Vec::new(),
            current: Vec::new(),
            cursor: point(0.0, 0.0),
            segments: segments.max(1),
            x_scale,
            y_scale,
        }
    }

    /// Ends the glyph, emitting an unclosed contour in progress. An empty
    /// contour in progress is dropped.
    pub fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.contours
    }

    fn map(&self, p: LyonPoint) -> Point {
        Point::new(p.x as f64 * self.x_scale, p.y as f64 * self.y_scale)
    }

    fn push(&mut self, p: LyonPoint) {
        let mapped = self.map(p);
        self.current.push(mapped);
        self.cursor = p;
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut points = std::mem::take(&mut self.current);
        // Closing vertex duplicates the start point
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        self.contours.push(Contour::new(points));
    }

    fn flatten_cubic(&mut self, curve: CubicBezierSegment<f32>) {
        if self.current.is_empty() {
            self.push(curve.from);
        }
        let n = self.segments;
        for i in 1..=n {
            let t = i as f32 / n as f32;
            self.push(curve.sample(t));
        }
    }
}

impl OutlineBuilder for ContourCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let quad = QuadraticBezierSegment {
            from: self.cursor,
            ctrl: point(x1, y1),
            to: point(x, y),
        };
        self.flatten_cubic(quad.to_cubic());
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let cubic = CubicBezierSegment {
            from: self.cursor,
            ctrl1: point(x1, y1),
            ctrl2: point(x2, y2),
            to: point(x, y),
        };
        self.flatten_cubic(cubic);
    }

    fn close(&mut self) {
        self.flush();
    }
}
