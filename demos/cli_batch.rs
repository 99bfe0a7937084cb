//! Batch CLI for giftwrap_measure with JSON configuration
//!
//! Measures every photo in a directory and writes a JSON report

use clap::Parser;
use giftwrap_measure::{image_loader, MeasureConfig, MeasurementResult, Measurer};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(about = "Measure all photos in a directory")]
struct Args {
    /// Directory of photos
    input: PathBuf,

    /// Output directory for results.json
    #[arg(long, default_value = "measurements")]
    output: PathBuf,

    /// JSON configuration file, A4 preset when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct BatchEntry {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<MeasurementResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match MeasureConfig::from_json_file(path) {
            Ok(cfg) => {
                eprintln!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        None => MeasureConfig::default(),
    };

    let measurer = match Measurer::new(config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&args.output) {
        eprintln!("Error creating output directory: {}", e);
        process::exit(1);
    }

    let image_files = match find_image_files(&args.input) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error finding image files: {}", e);
            process::exit(1);
        }
    };

    if image_files.is_empty() {
        eprintln!("No image files found in {}", args.input.display());
        process::exit(1);
    }

    eprintln!("Found {} image files to process", image_files.len());
    eprintln!();

    let mut entries = Vec::with_capacity(image_files.len());
    let mut success_count = 0;
    let mut error_count = 0;

    for (i, image_path) in image_files.iter().enumerate() {
        let filename = image_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        eprint!("[{}/{}] Processing {}... ", i + 1, image_files.len(), filename);

        match measurer.measure_file(image_path) {
            Ok(result) => {
                eprintln!(
                    "{:.2} x {:.2} cm ({})",
                    result.object.width_cm, result.object.height_cm, result.object.shape
                );

                success_count += 1;
                entries.push(BatchEntry {
                    file: filename,
                    result: Some(result),
                    error: None,
                });
            }
            Err(e) => {
                eprintln!("FAILED: {}", e);
                error_count += 1;
                entries.push(BatchEntry {
                    file: filename,
                    result: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let report_path = args.output.join("results.json");
    match serde_json::to_string_pretty(&entries) {
        Ok(json) => {
            if let Err(e) = fs::write(&report_path, json) {
                eprintln!("Error writing {}: {}", report_path.display(), e);
            }
        }
        Err(e) => eprintln!("Error serializing results: {}", e),
    }

    eprintln!();
    eprintln!("Processed: {} succeeded, {} failed", success_count, error_count);
    eprintln!("Results written to {}", report_path.display());

    if error_count > 0 {
        process::exit(2);
    }
}

fn find_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, image_loader::is_supported_extension)
        })
        .collect();
    files.sort();
    Ok(files)
}
