use std::collections::HashSet;
use std::f64::consts::SQRT_2;

use neonkit_centerline::{
    measure_source, pixel_length, skeletonize, LengthPolicy, MeasureOptions, OccupancyGrid,
};
use proptest::prelude::*;

use crate::support::memory_font;

fn small() -> MeasureOptions {
    MeasureOptions::default().with_resolution(64)
}

fn pattern(cells: &[bool], width: usize) -> OccupancyGrid {
    let rows: Vec<String> = cells
        .chunks(width)
        .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    OccupancyGrid::from_pattern(&refs)
}

/// Number of 8-connected components of set cells.
fn components(grid: &OccupancyGrid) -> usize {
    let mut seen = HashSet::new();
    let mut count = 0;
    for start in grid.set_cells() {
        if !seen.insert(start) {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        while let Some((x, y)) = stack.pop() {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if grid.get(nx, ny) && seen.insert((nx as u32, ny as u32)) {
                        stack.push((nx as u32, ny as u32));
                    }
                }
            }
        }
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_doubling_height_doubles_length(height in 1.0f64..500.0) {
        let font = memory_font();
        let single = measure_source(&font, "IO", height, &small()).unwrap();
        let double = measure_source(&font, "IO", 2.0 * height, &small()).unwrap();
        for (a, b) in single.characters().iter().zip(double.characters()) {
            prop_assert!((b.length_mm - 2.0 * a.length_mm).abs() <= 1e-9 * b.length_mm.max(1.0));
        }
        prop_assert!((double.total_mm() - 2.0 * single.total_mm()).abs() <= 1e-9 * double.total_mm().max(1.0));
    }

    #[test]
    fn test_total_is_sum_of_characters(text in "[IOAZ #]{0,8}") {
        let m = measure_source(&memory_font(), &text, 100.0, &small()).unwrap();
        prop_assert_eq!(m.len(), text.chars().count());
        let sum: f64 = m.characters().iter().map(|c| c.length_mm).sum();
        prop_assert!((m.total_mm() - sum).abs() < 1e-9);
        for (c, ch) in m.characters().iter().zip(text.chars()) {
            prop_assert_eq!(c.character, ch);
            if ch == ' ' || ch == 'Z' {
                prop_assert_eq!(c.length_mm, 0.0);
            }
        }
    }

    #[test]
    fn test_skeleton_is_subset_of_mask(cells in prop::collection::vec(any::<bool>(), 144)) {
        let grid = pattern(&cells, 12);
        let skeleton = skeletonize(&grid);
        prop_assert!(skeleton.grid().is_subset_of(&grid));
        prop_assert!(skeleton.len() <= grid.count());
    }

    #[test]
    fn test_skeleton_keeps_every_component(cells in prop::collection::vec(any::<bool>(), 144)) {
        let grid = pattern(&cells, 12);
        let skeleton = skeletonize(&grid);
        prop_assert_eq!(components(skeleton.grid()), components(&grid));
    }

    #[test]
    fn test_runs_measure_their_steps(len in 2usize..60) {
        let horizontal = "#".repeat(len);
        let grid = OccupancyGrid::from_pattern(&[horizontal.as_str()]);
        prop_assert_eq!(pixel_length(&grid, LengthPolicy::NeighborSum), (len - 1) as f64);

        let rows: Vec<String> = (0..len)
            .map(|i| format!("{}#", ".".repeat(i)))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let diagonal = OccupancyGrid::from_pattern(&refs);
        let expected = (len - 1) as f64 * SQRT_2;
        prop_assert!((pixel_length(&diagonal, LengthPolicy::NeighborSum) - expected).abs() < 1e-9);
    }
}
