//! Skeleton length estimation.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};

use crate::raster::OccupancyGrid;
use crate::skeleton::Skeleton;

/// Forward neighbour offsets: each adjacent pair is visited exactly once.
const AXIS_STEPS: [(i64, i64); 2] = [(1, 0), (0, 1)];
const DIAGONAL_STEPS: [(i64, i64); 2] = [(1, 1), (-1, 1)];

/// How skeleton pixels are turned into a path length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Sum over adjacent pixel pairs: 1 per axis pair, √2 per diagonal pair.
    #[default]
    NeighborSum,
    /// Distance between consecutive pixels in row-major order. Jumps between
    /// strokes on the same rows count as length, so this overestimates
    /// anything that is not a single horizontal run.
    LegacyScanOrder,
}

/// Adjacent pixel pairs in a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborCounts {
    pub axis: usize,
    pub diagonal: usize,
}

impl NeighborCounts {
    /// Length in pixel units.
    pub fn pixel_length(&self) -> f64 {
        self.axis as f64 + SQRT_2 * self.diagonal as f64
    }
}

pub fn neighbor_counts(grid: &OccupancyGrid) -> NeighborCounts {
    let mut counts = NeighborCounts::default();
    for (x, y) in grid.set_cells() {
        let (x, y) = (x as i64, y as i64);
        counts.axis += AXIS_STEPS
            .iter()
            .filter(|(dx, dy)| grid.get(x + dx, y + dy))
            .count();
        counts.diagonal += DIAGONAL_STEPS
            .iter()
            .filter(|(dx, dy)| grid.get(x + dx, y + dy))
            .count();
    }
    counts
}

fn scan_order_length(grid: &OccupancyGrid) -> f64 {
    let cells: Vec<(u32, u32)> = grid.set_cells().collect();
    cells
        .windows(2)
        .map(|w| {
            let dx = w[1].0 as f64 - w[0].0 as f64;
            let dy = w[1].1 as f64 - w[0].1 as f64;
            dx.hypot(dy)
        })
        .sum()
}

/// Skeleton length in pixel units. Fewer than two set cells measure zero.
pub fn pixel_length(grid: &OccupancyGrid, policy: LengthPolicy) -> f64 {
    if grid.count() < 2 {
        return 0.0;
    }
    match policy {
        LengthPolicy::NeighborSum => neighbor_counts(grid).pixel_length(),
        LengthPolicy::LegacyScanOrder => scan_order_length(grid),
    }
}

/// Physical length of a skeleton given the size of one pixel in millimetres.
pub fn estimate_length(skeleton: &Skeleton, policy: LengthPolicy, mm_per_pixel: f64) -> f64 {
    pixel_length(skeleton.grid(), policy) * mm_per_pixel
}

/// Millimetres per pixel for a grid scaled by `scale` pixels per design unit,
/// with glyphs drawn `target_height_mm` tall per em.
pub fn mm_per_pixel(scale: f64, target_height_mm: f64, units_per_em: f64) -> f64 {
    (1.0 / scale) * (target_height_mm / units_per_em)
}
