//! Generate a measurement configuration file
//!
//! Creates a JSON config from one of the presets

use clap::{Parser, ValueEnum};
use giftwrap_measure::constants::reference;
use giftwrap_measure::MeasureConfig;
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
#[command(about = "Write a measurement configuration preset as JSON")]
struct Args {
    /// Output JSON file
    output: PathBuf,

    #[arg(long, value_enum, default_value = "a4")]
    preset: Preset,

    /// Marker side in centimetres for the marker presets
    #[arg(long, default_value_t = reference::MARKER_SIDE_CM)]
    marker_side: f64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Some(parent) = args.output.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = match args.preset {
        Preset::A4 => MeasureConfig::a4_sheet(),
        Preset::Card => MeasureConfig::credit_card(),
        Preset::Marker => MeasureConfig::fiducial_marker(args.marker_side),
        Preset::LargeMarker => MeasureConfig::fiducial_marker(reference::MARKER_LARGE_SIDE_CM),
        Preset::SquareMarker => MeasureConfig::square_marker(args.marker_side),
    };

    match config.to_json_file(&args.output) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", args.output.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Reference: {} ({:?})",
                config.reference.object.name(),
                config.reference.policy
            );
            eprintln!(
                "  Edges: blur sigma {:.1}, Canny ({:.0}, {:.0})",
                config.preprocessing.blur_sigma,
                config.preprocessing.canny_low_threshold,
                config.preprocessing.canny_high_threshold
            );
            eprintln!(
                "  Object: min area {:.0} px^2, exclude reference overlap: {}",
                config.object.min_area, config.object.exclude_reference_overlap
            );
            eprintln!(
                "  Wrap: margin {:.1} cm, {} sheets, rolls {:?} cm",
                config.wrap.margin_cm,
                config.wrap.sheets.len(),
                config.wrap.roll_widths_cm
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
