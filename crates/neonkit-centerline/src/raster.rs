//! Scan conversion of a [`Shape`] into a binary occupancy grid.
//!
//! The canvas is square: the longer side of the shape's bounding box spans
//! `resolution - 2 * padding` pixels and the shorter side is scaled by the
//! same factor and centred. Uniform scaling keeps diagonal strokes diagonal,
//! which the length estimate depends on.
//!
//! Each part is drawn into a scratch layer (exterior filled, holes punched)
//! and OR-ed into the grid, so a hole only ever clears its own part.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tiny_skia::{BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::trace;

use crate::geometry::{BoundingBox, Contour, Point};
use crate::shape::Shape;

/// Raster resolution used when the caller does not pick one.
pub const DEFAULT_RESOLUTION: u32 = 900;
/// Smallest accepted resolution.
pub const MIN_RESOLUTION: u32 = 32;
/// Largest accepted resolution; cost grows with its square.
pub const MAX_RESOLUTION: u32 = 2048;
/// Empty pixels kept around the shape on each side.
pub const DEFAULT_PADDING: u32 = 2;

/// Clamp a requested resolution into the supported range.
pub fn clamp_resolution(resolution: u32) -> u32 {
    resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION)
}

/// How polygons are scan-converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterStrategy {
    /// Span fill through tiny-skia; pixel centres inside the ring are set.
    #[default]
    Scanline,
    /// Per-pixel containment test of every pixel centre. Slow, used to
    /// cross-check the span fill at small resolutions.
    PointSample,
}

/// Affine mapping between shape coordinates and continuous grid coordinates.
///
/// Grid x = `x * scale + offset_x`. Grid y = `offset_y - y * scale` when
/// `flip_y` is set (row 0 at the top of a y-up shape), otherwise
/// `y * scale + offset_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub flip_y: bool,
}

impl GridTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            flip_y: false,
        }
    }

    /// Fit `bounds` into a `resolution` square with `padding` pixels on each
    /// side. Returns `None` for degenerate bounds or a canvas with no room
    /// left inside the padding.
    pub fn fit(bounds: &BoundingBox, resolution: u32, padding: u32) -> Option<Self> {
        if bounds.is_degenerate() {
            return None;
        }
        let available = resolution as f64 - 2.0 * padding as f64;
        if available <= 0.0 {
            return None;
        }
        let scale = available / bounds.extent();
        let margin_x = padding as f64 + (available - bounds.width() * scale) / 2.0;
        let margin_y = padding as f64 + (available - bounds.height() * scale) / 2.0;
        Some(Self {
            scale,
            offset_x: margin_x - bounds.min_x * scale,
            offset_y: margin_y + bounds.max_y * scale,
            flip_y: true,
        })
    }

    pub fn to_grid(&self, p: &Point) -> (f64, f64) {
        let gx = p.x * self.scale + self.offset_x;
        let gy = if self.flip_y {
            self.offset_y - p.y * self.scale
        } else {
            p.y * self.scale + self.offset_y
        };
        (gx, gy)
    }

    pub fn to_shape(&self, gx: f64, gy: f64) -> Point {
        let x = (gx - self.offset_x) / self.scale;
        let y = if self.flip_y {
            (self.offset_y - gy) / self.scale
        } else {
            (gy - self.offset_y) / self.scale
        };
        Point::new(x, y)
    }

    /// Centre of the pixel at column `col`, row `row`, in shape coordinates.
    pub fn pixel_center(&self, col: u32, row: u32) -> Point {
        self.to_shape(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Shape units covered by one pixel edge.
    pub fn units_per_pixel(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Row-major boolean grid with the transform that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    transform: GridTransform,
}

impl OccupancyGrid {
    /// All-false grid.
    pub fn new(width: u32, height: u32, transform: GridTransform) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
            transform,
        }
    }

    /// Grid from text rows where `#` marks a set cell and anything else is
    /// clear. Rows shorter than the longest one are padded with clear cells.
    pub fn from_pattern(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, height, GridTransform::identity());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    grid.set(x as u32, y as u32, true);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cell value; coordinates outside the grid read as clear.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.cells[self.index(x as u32, y as u32)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = value;
        }
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Coordinates of set cells in row-major order.
    pub fn set_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(move |(i, _)| ((i as u32) % width, (i as u32) / width))
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// True when every set cell of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &OccupancyGrid) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(&a, &b)| !a || b)
    }

    /// Grayscale image with set cells white on black.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.cells[self.index(x, y)] {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }
}

/// Scan-converts shapes at a fixed square resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    resolution: u32,
    padding: u32,
    strategy: RasterStrategy,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl Rasterizer {
    /// Rasterizer at `resolution`, clamped to the supported range.
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution: clamp_resolution(resolution),
            padding: DEFAULT_PADDING,
            strategy: RasterStrategy::Scanline,
        }
    }

    /// Padding is kept at one pixel or more and below half the canvas.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding.clamp(1, self.resolution / 4);
        self
    }

    pub fn with_strategy(mut self, strategy: RasterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Rasterize `shape`. Degenerate shapes give an all-false grid.
    pub fn rasterize(&self, shape: &Shape) -> OccupancyGrid {
        let r = self.resolution;
        let transform = match shape
            .bounds()
            .and_then(|b| GridTransform::fit(&b, r, self.padding))
        {
            Some(t) => t,
            None => return OccupancyGrid::new(r, r, GridTransform::identity()),
        };

        let mut grid = OccupancyGrid::new(r, r, transform);
        match self.strategy {
            RasterStrategy::Scanline => fill_scanline(shape, &mut grid),
            RasterStrategy::PointSample => fill_point_sample(shape, &mut grid),
        }
        trace!(
            resolution = r,
            scale = transform.scale,
            filled = grid.count(),
            "Rasterized shape"
        );
        grid
    }
}

fn ring_path(ring: &Contour, transform: &GridTransform) -> Option<tiny_skia::Path> {
    let mut points = ring.points.iter().map(|p| transform.to_grid(p));
    let (x0, y0) = points.next()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0 as f32, y0 as f32);
    for (x, y) in points {
        pb.line_to(x as f32, y as f32);
    }
    pb.close();
    pb.finish()
}

fn fill_scanline(shape: &Shape, grid: &mut OccupancyGrid) {
    let transform = *grid.transform();
    let Some(mut layer) = Pixmap::new(grid.width(), grid.height()) else {
        return;
    };

    let mut fill = Paint::default();
    fill.set_color(Color::BLACK);
    fill.anti_alias = false;

    let mut punch = fill.clone();
    punch.blend_mode = BlendMode::Clear;

    for part in &shape.parts {
        layer.fill(Color::TRANSPARENT);
        if let Some(path) = ring_path(&part.exterior, &transform) {
            layer.fill_path(&path, &fill, FillRule::EvenOdd, Transform::identity(), None);
        }
        for hole in &part.holes {
            if let Some(path) = ring_path(hole, &transform) {
                layer.fill_path(&path, &punch, FillRule::EvenOdd, Transform::identity(), None);
            }
        }
        for (cell, px) in grid.cells_mut().iter_mut().zip(layer.pixels()) {
            if px.alpha() > 127 {
                *cell = true;
            }
        }
    }
}

fn fill_point_sample(shape: &Shape, grid: &mut OccupancyGrid) {
    let transform = *grid.transform();
    let (w, h) = (grid.width(), grid.height());
    for part in &shape.parts {
        for y in 0..h {
            for x in 0..w {
                if part.contains(&transform.pixel_center(x, y)) {
                    grid.set(x, y, true);
                }
            }
        }
    }
}
