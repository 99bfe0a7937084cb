//! Command-line interface for giftwrap_measure
//!
//! Measures the object in one photo and prints the result as JSON

use clap::{Parser, ValueEnum};
use giftwrap_measure::constants::reference;
use giftwrap_measure::exif::{CaptureMetadata, ExifExtractor};
use giftwrap_measure::{report, MeasureConfig, MeasurementResult, Measurer};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    A4,
    Card,
    Marker,
    /// 10 cm printed marker
    LargeMarker,
    SquareMarker,
}

#[derive(Parser, Debug)]
#[command(about = "Measure an object against a reference in a photo")]
struct Args {
    /// Photo to measure
    image: PathBuf,

    /// JSON configuration file (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference preset
    #[arg(long, value_enum, default_value = "a4")]
    preset: Preset,

    /// Marker side in centimetres for the marker presets
    #[arg(long, default_value_t = reference::MARKER_SIDE_CM)]
    marker_side: f64,
}

/// Measurement plus whatever the camera recorded about the shot
#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    result: &'a MeasurementResult,
    capture: Option<CaptureMetadata>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match MeasureConfig::from_json_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        None => match args.preset {
            Preset::A4 => MeasureConfig::a4_sheet(),
            Preset::Card => MeasureConfig::credit_card(),
            Preset::Marker => MeasureConfig::fiducial_marker(args.marker_side),
            Preset::LargeMarker => MeasureConfig::fiducial_marker(reference::MARKER_LARGE_SIDE_CM),
            Preset::SquareMarker => MeasureConfig::square_marker(args.marker_side),
        },
    };

    let measurer = match Measurer::new(config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let capture = match ExifExtractor::extract(&args.image) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };

    match measurer.measure_file(&args.image) {
        Ok(result) => print_result(&result, capture),
        Err(error) => {
            eprintln!("Measurement failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn print_result(result: &MeasurementResult, capture: Option<CaptureMetadata>) {
    let camera = capture.as_ref().and_then(|c| c.camera_info.clone());
    let focal_length = capture.as_ref().and_then(|c| c.focal_length_mm);

    // JSON on stdout for programmatic use
    let output = Output { result, capture };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    // Summary on stderr for human reading
    eprintln!();
    eprintln!("{}", report::measurement_text(result));
    eprintln!("  Scale: {:.3} px/cm", result.scale.pixels_per_cm);
    eprintln!("  Candidates: {}", result.candidate_count);
    eprintln!("  Time: {} ms", result.processing_time_ms);
    if let Some(camera) = camera {
        eprintln!("  Camera: {} {}", camera.make, camera.model);
    }
    if let Some(mm) = focal_length {
        eprintln!("  Focal length: {:.1} mm", mm);
    }
}
