//! Three-view measuring session and wrap planning
//!
//! Measures a box from its top and two side photos, recommends paper and
//! walks through the fold guide

use clap::{Parser, ValueEnum};
use giftwrap_measure::config::ReconcileConfig;
use giftwrap_measure::measurement::ViewMeasurement;
use giftwrap_measure::{
    plan_wrap, report, MeasureConfig, MeasurementSession, Measurer, ViewKind, WrapMethod,
};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Classic,
    Diagonal,
}

impl From<Method> for WrapMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Classic => WrapMethod::Classic,
            Method::Diagonal => WrapMethod::Diagonal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Measure a box from three photos and plan its wrapping")]
struct Args {
    /// Photo of the top face
    #[arg(long, required_unless_present = "dims")]
    top: Option<PathBuf>,

    /// Photo of the side showing height and width
    #[arg(long, required_unless_present = "dims")]
    side1: Option<PathBuf>,

    /// Photo of the side showing height and length
    #[arg(long, required_unless_present = "dims")]
    side2: Option<PathBuf>,

    /// Skip the photos and use L W H in centimetres
    #[arg(long, num_args = 3, value_names = ["L", "W", "H"])]
    dims: Option<Vec<f64>>,

    /// JSON configuration file, A4 preset when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wrap method, `wrap.method` from the configuration when omitted
    #[arg(long, value_enum)]
    method: Option<Method>,

    /// List the diagram elements revealed at each step
    #[arg(long)]
    diagram: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MeasureConfig::from_json_file(path).unwrap_or_else(|e| fail(&e.to_string())),
        None => MeasureConfig::default(),
    };

    let session = match &args.dims {
        Some(dims) => session_from_dims(dims, &config.reconcile),
        None => {
            let measurer = Measurer::new(config.clone()).unwrap_or_else(|e| fail(&e.to_string()));
            let photos = [&args.top, &args.side1, &args.side2];
            let mut session = MeasurementSession::new();
            for (kind, photo) in ViewKind::ALL.into_iter().zip(photos) {
                let Some(path) = photo else {
                    fail(&format!("missing photo for {} view", kind));
                };
                let image = giftwrap_measure::image_loader::load_image(path)
                    .unwrap_or_else(|e| fail(&e.to_string()));
                session = match measurer.capture_view(&session, kind, &image) {
                    Ok(next) => next,
                    Err(e) => {
                        eprintln!("{} view failed: {}", kind, e);
                        if e.is_recoverable() {
                            eprintln!("Suggestion: {}", e.user_message());
                        }
                        process::exit(1);
                    }
                };
            }
            session
        }
    };

    eprintln!("{}", report::session_status(&session));
    eprintln!();

    let dims = *session.require_final().unwrap_or_else(|e| fail(&e.to_string()));
    let plan = plan_wrap(&dims, &config.wrap).unwrap_or_else(|e| fail(&e.user_message()));

    let mut session = session
        .start_guide(args.method.map(WrapMethod::from), &config.wrap)
        .unwrap_or_else(|e| fail(&e.to_string()));

    loop {
        let Some(guide) = session.guide().copied() else {
            break;
        };
        println!("{}", report::guide_text(&guide));

        if args.diagram {
            for element in guide.visible_elements() {
                if element.reveal_step == guide.step() {
                    println!("  + {}", element.label);
                }
            }
        }

        if guide.is_last() {
            break;
        }
        session = session.guide_next().unwrap_or_else(|e| fail(&e.to_string()));
    }

    println!();
    println!("{}", report::summary_card(&dims, &plan, session.guide()));
}

fn session_from_dims(dims: &[f64], config: &ReconcileConfig) -> MeasurementSession {
    let [l, w, h] = [dims[0], dims[1], dims[2]];
    MeasurementSession::new()
        .record(ViewMeasurement::Top { l, w }, config)
        .record(ViewMeasurement::Side1 { h, w }, config)
        .record(ViewMeasurement::Side2 { h, l }, config)
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
