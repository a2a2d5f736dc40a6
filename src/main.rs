//! NeonKit command line: measure a text set in a font and price the job.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use neonkit::report::render_table;
use neonkit::{init_logging, LogFormat, BUILD_DATE, VERSION};
use neonkit_centerline::{
    measure_with, trace_with, CostEstimate, GlyphTrace, MeasureStrategy, TextMeasurement,
};
use neonkit_core::{parse_decimal, parse_length, MeasurementSystem};
use neonkit_settings::Config;

#[derive(Parser)]
#[command(
    version,
    about = "Estimate LED wiring length and cost for lettering set in a TrueType font"
)]
struct Cli {
    /// TrueType or OpenType font file
    #[arg(required_unless_present = "print_config")]
    font: Option<PathBuf>,

    /// Text to measure
    #[arg(required_unless_present = "print_config")]
    text: Option<String>,

    /// Letter height in the display units (decimal comma accepted)
    #[arg(long, default_value = "100")]
    height: String,

    /// Raster canvas size in pixels
    #[arg(long)]
    resolution: Option<u32>,

    /// "skeleton" (default) or "advance-width"
    #[arg(long)]
    strategy: Option<MeasureStrategy>,

    /// Measure characters in parallel
    #[arg(long)]
    parallel: bool,

    /// Units for --height and the report: "metric" or "imperial"
    #[arg(long)]
    units: Option<MeasurementSystem>,

    /// Config file (TOML or JSON); defaults to the user config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Include skeleton points and outlines in JSON output
    #[arg(long)]
    geometry: bool,

    /// Write each glyph skeleton as a PNG into DIR
    #[arg(long, value_name = "DIR")]
    dump_skeletons: Option<PathBuf>,

    /// Currency symbol or code
    #[arg(long)]
    currency: Option<String>,

    /// LED strip cost per metre
    #[arg(long, value_parser = parse_amount)]
    led_cost: Option<f64>,

    /// Fabrication cost per millimetre of stroke
    #[arg(long, value_parser = parse_amount)]
    fab_cost: Option<f64>,

    /// Flat setup cost per job
    #[arg(long, value_parser = parse_amount)]
    setup_cost: Option<f64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let value = parse_decimal(s)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("not a finite number: {s}"))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    measurement: &'a TextMeasurement,
    cost: &'a CostEstimate,
    units: MeasurementSystem,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(format, level)?;
    debug!(version = VERSION, build_date = BUILD_DATE, "Starting NeonKit");

    let config = load_config(&cli)?;
    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let font_path = cli.font.as_deref().ok_or_else(|| anyhow!("missing FONT"))?;
    let text = cli.text.as_deref().ok_or_else(|| anyhow!("missing TEXT"))?;
    let font_bytes = fs::read(font_path)
        .with_context(|| format!("Failed to read font {}", font_path.display()))?;

    let units = config.measurement.units;
    let height = parse_length(&cli.height, units)
        .map_err(|e| anyhow!("Invalid --height {:?}: {}", cli.height, e))?;

    let options = config.measure_options();
    let (measurement, traces) = if cli.dump_skeletons.is_some() {
        trace_with(&font_bytes, text, height, &options)
    } else {
        measure_with(&font_bytes, text, height, &options).map(|m| (m, Vec::new()))
    }
    .with_context(|| format!("Failed to measure text with {}", font_path.display()))?;
    let estimate = CostEstimate::from_measurement(&measurement, &config.cost_rates());

    if let Some(dir) = &cli.dump_skeletons {
        dump_skeletons(&traces, dir)?;
    }

    if cli.json {
        let report = JsonReport {
            measurement: &measurement,
            cost: &estimate,
            units,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_table(&measurement, &estimate, units));
    }
    Ok(())
}

/// Config file, then environment, then command line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default().context("Failed to load config")?,
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    let m = &mut config.measurement;
    if let Some(resolution) = cli.resolution {
        m.resolution = resolution;
    }
    if let Some(strategy) = cli.strategy {
        m.strategy = strategy;
    }
    if let Some(units) = cli.units {
        m.units = units;
    }
    m.parallel |= cli.parallel;
    m.include_geometry |= cli.geometry;

    let c = &mut config.costing;
    if let Some(currency) = &cli.currency {
        c.currency = currency.trim().to_string();
    }
    if let Some(v) = cli.led_cost {
        c.led_cost_per_meter = v;
    }
    if let Some(v) = cli.fab_cost {
        c.fab_cost_per_mm = v;
    }
    if let Some(v) = cli.setup_cost {
        c.setup_cost = v;
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

/// One PNG per distinct character, named by code point.
fn dump_skeletons(traces: &[GlyphTrace], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = BTreeSet::new();
    for trace in traces {
        if !written.insert(trace.character) {
            continue;
        }
        let path = dir.join(format!("U+{:04X}.png", trace.character as u32));
        trace
            .skeleton
            .grid()
            .to_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(character = %trace.character, path = %path.display(), "Wrote skeleton");
    }
    Ok(())
}
