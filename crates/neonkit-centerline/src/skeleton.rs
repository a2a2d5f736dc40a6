//! Morphological thinning of an occupancy grid to a one-pixel skeleton.
//!
//! Uses Zhang–Suen thinning. Each sub-iteration picks its candidates from a
//! snapshot of the grid before clearing any of them. A candidate is then
//! cleared only while it is still a simple point, so no 8-connected component
//! vanishes or splits (plain Zhang–Suen erases a 2×2 block outright).
//! Thinning only clears cells; the skeleton is always a subset of the input
//! mask.
//!
//! Neighbour labels follow the usual convention, clockwise from north:
//!
//! ```text
//! P9 P2 P3
//! P8 P1 P4
//! P7 P6 P5
//! ```

use tracing::trace;

use crate::geometry::Point;
use crate::raster::OccupancyGrid;

/// Offsets of P2..P9 as (dx, dy) with y growing downwards.
const NEIGHBOURS: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Thinned grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    grid: OccupancyGrid,
}

impl Skeleton {
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.grid.count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.grid.get(x as i64, y as i64)
    }

    /// Skeleton cells in row-major order.
    pub fn pixels(&self) -> Vec<(u32, u32)> {
        self.grid.set_cells().collect()
    }

    /// Pixel centres mapped back to shape coordinates.
    pub fn points(&self) -> Vec<Point> {
        let transform = self.grid.transform();
        self.grid
            .set_cells()
            .map(|(x, y)| transform.pixel_center(x, y))
            .collect()
    }

    /// Number of set 8-neighbours of a cell.
    pub fn degree(&self, x: u32, y: u32) -> usize {
        neighbourhood(&self.grid, x as i64, y as i64)
            .iter()
            .filter(|&&n| n)
            .count()
    }
}

/// Thin `grid` until no further cell can be removed.
pub fn skeletonize(grid: &OccupancyGrid) -> Skeleton {
    let mut out = grid.clone();
    let mut live: Vec<(u32, u32)> = out.set_cells().collect();
    let mut passes = 0usize;

    loop {
        let removed_first = thinning_step(&mut out, &mut live, true);
        let removed_second = thinning_step(&mut out, &mut live, false);
        passes += 1;
        if removed_first + removed_second == 0 {
            break;
        }
    }

    trace!(passes, remaining = live.len(), "Thinning converged");
    Skeleton { grid: out }
}

/// One Zhang–Suen sub-iteration. Returns the number of cells cleared.
fn thinning_step(grid: &mut OccupancyGrid, live: &mut Vec<(u32, u32)>, first: bool) -> usize {
    let doomed: Vec<(u32, u32)> = live
        .iter()
        .copied()
        .filter(|&(x, y)| is_removable(grid, x as i64, y as i64, first))
        .collect();

    let mut cleared = 0;
    for &(x, y) in &doomed {
        if is_simple(grid, x as i64, y as i64) {
            grid.set(x, y, false);
            cleared += 1;
        }
    }
    if cleared > 0 {
        live.retain(|&(x, y)| grid.get(x as i64, y as i64));
    }
    cleared
}

fn neighbourhood(grid: &OccupancyGrid, x: i64, y: i64) -> [bool; 8] {
    let mut n = [false; 8];
    for (slot, (dx, dy)) in n.iter_mut().zip(NEIGHBOURS) {
        *slot = grid.get(x + dx, y + dy);
    }
    n
}

fn is_removable(grid: &OccupancyGrid, x: i64, y: i64, first: bool) -> bool {
    let n = neighbourhood(grid, x, y);
    let [p2, _p3, p4, _p5, p6, _p7, p8, _p9] = n;

    let b = n.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&b) {
        return false;
    }

    let a = (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count();
    if a != 1 {
        return false;
    }

    if first {
        !(p2 && p4 && p6) && !(p4 && p6 && p8)
    } else {
        !(p2 && p4 && p8) && !(p2 && p6 && p8)
    }
}

/// Yokoi connectivity number of 1: clearing the cell changes neither the
/// number of foreground components nor the background around it.
fn is_simple(grid: &OccupancyGrid, x: i64, y: i64) -> bool {
    let n = neighbourhood(grid, x, y);
    let clear = |i: usize| !n[i % 8];
    let connectivity = [0usize, 2, 4, 6]
        .iter()
        .filter(|&&k| clear(k) && !(clear(k + 1) && clear(k + 2)))
        .count();
    connectivity == 1
}
