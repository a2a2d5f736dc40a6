use std::io::Write;

use neonkit_centerline::{
    measure, measure_source, measure_with, trace_glyph, FontFace, GlyphSource, MeasureError,
    MeasureStrategy, MeasurementStatus,
};

use crate::support::{assert_close, memory_font, quick_options, truetype_font};

#[test]
fn test_garbage_bytes_are_font_load_error() {
    let err = measure(b"this is not a font", "I", 100.0).unwrap_err();
    assert!(err.is_font_error(), "{err}");

    let font = truetype_font();
    let err = measure_with(&font[..20], "I", 100.0, &quick_options()).unwrap_err();
    assert!(matches!(err, MeasureError::FontLoad { .. }));
}

#[test]
fn test_invalid_height_is_rejected() {
    let font = truetype_font();
    let err = measure_with(&font, "I", 0.0, &quick_options()).unwrap_err();
    assert_eq!(err, MeasureError::InvalidHeight { value: 0.0 });
    assert!(err.to_string().contains("must be > 0"));
}

#[test]
fn test_font_metrics() {
    let bytes = truetype_font();
    let face = FontFace::from_bytes(&bytes).unwrap();
    assert_eq!(face.units_per_em(), 1000.0);
    assert_eq!(face.glyph_count(), 4);
    assert!(face.has_glyph('I'));
    assert!(!face.has_glyph('Z'));
    assert_eq!(face.advance_width('I'), Some(280.0));
    assert!(face.contours('Z', 24).is_none());
}

#[test]
fn test_outline_is_in_design_units_y_up() {
    let bytes = truetype_font();
    let face = FontFace::from_bytes(&bytes).unwrap();
    let contours = face.contours('I', 24).unwrap();
    assert_eq!(contours.len(), 1);
    let bounds = contours[0].bounds().unwrap();
    assert!((bounds.min_x - 100.0).abs() < 1e-6);
    assert!((bounds.max_x - 180.0).abs() < 1e-6);
    assert!(bounds.min_y.abs() < 1e-6);
    assert!((bounds.max_y - 700.0).abs() < 1e-6);
}

#[test]
fn test_truetype_bar_matches_memory_font() {
    let bytes = truetype_font();
    let from_file = measure_with(&bytes, "I", 100.0, &quick_options()).unwrap();
    let in_memory = measure_source(&memory_font(), "I", 100.0, &quick_options()).unwrap();
    assert_close(from_file.total_mm(), 70.0, 0.25);
    assert_close(from_file.total_mm(), in_memory.total_mm(), 0.01);
}

#[test]
fn test_truetype_ring_keeps_hole() {
    let bytes = truetype_font();
    let face = FontFace::from_bytes(&bytes).unwrap();
    let trace = trace_glyph(&face, 'O', 100.0, &quick_options()).unwrap();
    assert_eq!(trace.shape.parts.len(), 1);
    assert_eq!(trace.shape.hole_count(), 1);
    assert!(trace.length_mm > 150.0, "length = {}", trace.length_mm);
}

#[test]
fn test_missing_and_blank_glyphs() {
    let bytes = truetype_font();
    let m = measure_with(&bytes, "I Z", 100.0, &quick_options()).unwrap();
    let statuses: Vec<MeasurementStatus> = m.characters().iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            MeasurementStatus::Measured,
            MeasurementStatus::Space,
            MeasurementStatus::GlyphNotFound
        ]
    );
    assert_eq!(m.total_mm(), m.characters()[0].length_mm);
}

#[test]
fn test_advance_width_from_font() {
    let bytes = truetype_font();
    let options = quick_options().with_strategy(MeasureStrategy::AdvanceWidth);
    let m = measure_with(&bytes, "IO", 100.0, &options).unwrap();
    assert_close(m.characters()[0].length_mm, 28.0, 1e-9);
    assert_close(m.characters()[1].length_mm, 70.0, 1e-9);
    assert!(m
        .characters()
        .iter()
        .all(|c| c.status == MeasurementStatus::Approximated));
}

#[test]
fn test_font_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&truetype_font()).unwrap();
    let bytes = std::fs::read(file.path()).unwrap();
    let m = measure(&bytes, "I", 50.0).unwrap();
    assert_eq!(m.len(), 1);
    assert!(m.total_mm() > 0.0);
}

#[test]
fn test_skeleton_image_written() {
    let bytes = truetype_font();
    let face = FontFace::from_bytes(&bytes).unwrap();
    let trace = trace_glyph(&face, 'O', 100.0, &quick_options()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("O.png");
    trace.skeleton.grid().to_image().save(&path).unwrap();
    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.width(), 200);
    let lit = img.pixels().filter(|p| p[0] == 255).count();
    assert_eq!(lit, trace.skeleton.len());
}
