//! Plain text rendering of measurement and cost results.

use std::fmt::Write;

use neonkit_centerline::{CostEstimate, MeasurementStatus, TextMeasurement};
use neonkit_core::{format_length, format_meters, MeasurementSystem};

fn status_label(status: MeasurementStatus) -> &'static str {
    match status {
        MeasurementStatus::Measured => "",
        MeasurementStatus::Space => "space",
        MeasurementStatus::GlyphNotFound => "missing glyph",
        MeasurementStatus::DegenerateShape => "degenerate",
        MeasurementStatus::Approximated => "approx.",
    }
}

fn display_char(ch: char) -> String {
    if ch.is_whitespace() || ch.is_control() {
        format!("U+{:04X}", ch as u32)
    } else {
        ch.to_string()
    }
}

/// Render a per-character table followed by totals.
///
/// The currency of `estimate` is used for every amount.
pub fn render_table(
    measurement: &TextMeasurement,
    estimate: &CostEstimate,
    units: MeasurementSystem,
) -> String {
    let money = |amount: f64| format!("{} {:.2}", estimate.currency, amount);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Text: {:?} at {}",
        measurement.text(),
        format_length(measurement.target_height_mm(), units)
    );
    let _ = writeln!(
        out,
        "{:<8} {:>12} {:>12} {:>12} {:>12}  {}",
        "Char", "Length", "LED", "Fabrication", "Total", "Note"
    );

    for (m, cost) in measurement.characters().iter().zip(&estimate.letters) {
        let _ = writeln!(
            out,
            "{:<8} {:>12} {:>12} {:>12} {:>12}  {}",
            display_char(m.character),
            format_length(m.length_mm, units),
            money(cost.led_cost),
            money(cost.fabrication_cost),
            money(cost.total),
            status_label(m.status)
        );
    }

    let _ = writeln!(
        out,
        "Total length: {} ({})",
        format_length(estimate.length_mm, units),
        format_meters(estimate.length_mm)
    );
    let _ = writeln!(out, "Letters: {}", money(estimate.word_total));
    let _ = writeln!(out, "Setup: {}", money(estimate.setup_cost));
    let _ = writeln!(out, "Job total: {}", money(estimate.job_total));

    let issues = measurement.issues().count();
    if issues > 0 {
        let _ = writeln!(out, "Warning: {} character(s) could not be measured", issues);
    }

    out
}
