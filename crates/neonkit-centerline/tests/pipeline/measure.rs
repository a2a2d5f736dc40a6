use neonkit_centerline::{
    measure_source, trace_glyph, LengthPolicy, MeasureStrategy, MeasurementStatus, RasterStrategy,
};

use crate::support::{assert_close, memory_font, quick_options, UPM};

fn length_of(ch: char, resolution: u32) -> f64 {
    let options = quick_options().with_resolution(resolution);
    let m = measure_source(&memory_font(), &ch.to_string(), 100.0, &options).unwrap();
    m.total_mm()
}

#[test]
fn test_spaces_only_measure_zero() {
    let m = measure_source(&memory_font(), "   ", 100.0, &quick_options()).unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.total_mm(), 0.0);
    for c in m.characters() {
        assert_eq!(c.length_mm, 0.0);
        assert_eq!(c.status, MeasurementStatus::Space);
    }
}

#[test]
fn test_missing_glyph_is_zero_not_error() {
    let m = measure_source(&memory_font(), "Z", 100.0, &quick_options()).unwrap();
    assert_eq!(m.len(), 1);
    assert_eq!(m.characters()[0].length_mm, 0.0);
    assert_eq!(m.characters()[0].status, MeasurementStatus::GlyphNotFound);
}

#[test]
fn test_text_with_missing_letter() {
    let m = measure_source(&memory_font(), "A B", 100.0, &quick_options()).unwrap();
    let lengths: Vec<f64> = m.characters().iter().map(|c| c.length_mm).collect();
    assert_eq!(lengths.len(), 3);
    assert!(lengths[0] > 0.0);
    assert_eq!(lengths[1], 0.0);
    assert_eq!(lengths[2], 0.0);
    assert_eq!(m.total_mm(), lengths[0]);

    let statuses: Vec<MeasurementStatus> = m.characters().iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            MeasurementStatus::Measured,
            MeasurementStatus::Space,
            MeasurementStatus::GlyphNotFound
        ]
    );
}

#[test]
fn test_characters_reported_in_input_order() {
    let text = "HI OA";
    let m = measure_source(&memory_font(), text, 100.0, &quick_options()).unwrap();
    let chars: String = m.characters().iter().map(|c| c.character).collect();
    assert_eq!(chars, text);
    assert_eq!(m.text(), text);
    let sum: f64 = m.characters().iter().map(|c| c.length_mm).sum();
    assert!((m.total_mm() - sum).abs() < 1e-9);
}

#[test]
fn test_vertical_bar_close_to_height() {
    // 700 units at 100 mm per 1000 units; the skeleton loses about half a
    // stroke width at each end
    let length = length_of('I', 400);
    assert_close(length, 70.0, 0.25);
    assert!(length < 70.0);
}

#[test]
fn test_resolution_convergence() {
    for ch in ['I', 'O', 'H'] {
        let coarse = length_of(ch, 200);
        let fine = length_of(ch, 400);
        assert_close(coarse, fine, 0.10);
    }
}

#[test]
fn test_ring_measures_its_loop() {
    let ring = length_of('O', 200);
    let block = length_of('#', 200);
    // mid-stroke loop is 2 * (540 + 640) units
    assert!(ring > 150.0 && ring < 250.0, "ring = {ring}");
    assert!(ring > 10.0 * block, "ring = {ring}, block = {block}");
}

#[test]
fn test_ring_skeleton_avoids_hole() {
    let trace = trace_glyph(&memory_font(), 'O', 100.0, &quick_options()).unwrap();
    assert_eq!(trace.shape.hole_count(), 1);
    let hole = &trace.shape.parts[0].holes[0];
    let points = trace.skeleton.points();
    assert!(!points.is_empty());
    assert!(points.iter().all(|p| !hole.contains(p)));
    assert!(trace.skeleton.grid().is_subset_of(&trace.grid));
}

#[test]
fn test_island_in_hole_adds_its_stroke() {
    let trace = trace_glyph(&memory_font(), '0', 100.0, &quick_options()).unwrap();
    assert_eq!(trace.shape.parts.len(), 2);
    assert_eq!(trace.shape.hole_count(), 1);
    assert!(trace
        .skeleton
        .points()
        .iter()
        .any(|p| (p.x - 300.0).abs() < 40.0 && (p.y - 350.0).abs() < 100.0));

    // the bar is 260 units tall and 80 wide
    let extra = length_of('0', 200) - length_of('O', 200);
    assert!(extra > 10.0 && extra < 30.0, "extra = {extra}");
}

#[test]
fn test_full_cover_hole_measures_zero() {
    let m = measure_source(&memory_font(), "Q", 100.0, &quick_options()).unwrap();
    assert_eq!(m.total_mm(), 0.0);
    assert_eq!(m.characters()[0].status, MeasurementStatus::DegenerateShape);
}

#[test]
fn test_overlapping_strokes_are_unioned() {
    let trace = trace_glyph(&memory_font(), 'H', 100.0, &quick_options()).unwrap();
    assert_eq!(trace.shape.parts.len(), 1);
    assert_eq!(trace.shape.hole_count(), 0);
    assert!(trace.length_mm > 2.0 * length_of('I', 200));
}

#[test]
fn test_parallel_matches_sequential() {
    let text = "HI OA Z";
    let sequential = measure_source(&memory_font(), text, 120.0, &quick_options()).unwrap();
    let parallel = measure_source(
        &memory_font(),
        text,
        120.0,
        &quick_options().with_parallel(true),
    )
    .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_point_sample_agrees_with_scanline() {
    let options = quick_options().with_raster_strategy(RasterStrategy::PointSample);
    let sampled = measure_source(&memory_font(), "O", 100.0, &options).unwrap();
    assert_close(sampled.total_mm(), length_of('O', 200), 0.05);
}

#[test]
fn test_legacy_policy_overestimates() {
    let legacy = quick_options().with_length_policy(LengthPolicy::LegacyScanOrder);
    let m = measure_source(&memory_font(), "O", 100.0, &legacy).unwrap();
    assert!(m.total_mm() > 2.0 * length_of('O', 200));
}

#[test]
fn test_advance_width_strategy_scales_with_em() {
    let options = quick_options().with_strategy(MeasureStrategy::AdvanceWidth);
    let m = measure_source(&memory_font(), "O ", 100.0, &options).unwrap();
    // MemoryFont advance is the right edge of the outline
    assert_close(m.characters()[0].length_mm, 600.0 * 100.0 / UPM, 1e-9);
    assert_eq!(m.characters()[1].status, MeasurementStatus::Space);
}
