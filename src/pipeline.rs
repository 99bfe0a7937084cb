//! Measurement pipeline
//!
//! Ties the vision boundary to the estimator:
//! photo -> candidates (+ fiducials) -> reference scale -> object -> cm.
//! [`measure_candidates`] is the pure core and needs no pixels at all.

use image::RgbaImage;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

use crate::capture::{acquire_frame, FrameSource};
use crate::config::MeasureConfig;
use crate::detection::{ObjectSelector, ReferenceEstimator, Scale, SelectionPolicy};
use crate::geometry::{Candidate, Fiducial};
use crate::image_loader;
use crate::measurement::{
    measure_object, MeasurementSession, ObjectMeasurement, ShapeClassifier, ViewKind,
    ViewMeasurement,
};
use crate::vision::{BlobMarkerDetector, ImageprocBackend, MarkerDetector, VisionBackend};
use crate::{MeasurementResult, Result};

/// Reference scale and object measurement from detected geometry
///
/// # Errors
///
/// - `ReferenceNotFound` when no candidate or fiducial matches the reference
/// - `ObjectNotFound` when nothing besides the reference is large enough
pub fn measure_candidates(
    candidates: &[Candidate],
    fiducials: &[Fiducial],
    config: &MeasureConfig,
) -> Result<(Scale, ObjectMeasurement)> {
    let scale = ReferenceEstimator::new(&config.reference).estimate(candidates, fiducials)?;
    let (_, object) = ObjectSelector::new(&config.object).select(candidates, &scale)?;
    let measurement = measure_object(
        &object.rect,
        scale.pixels_per_cm,
        &ShapeClassifier::new(&config.shape),
    )?;
    Ok((scale, measurement))
}

/// Vision backend, marker detector and configuration bundled together
pub struct Measurer<B = ImageprocBackend, M = BlobMarkerDetector> {
    backend: B,
    markers: M,
    config: MeasureConfig,
}

impl Measurer {
    /// Default pure-Rust backend configured from `config`
    pub fn new(config: MeasureConfig) -> Result<Self> {
        let backend = ImageprocBackend::new(&config.preprocessing);
        Self::with_backend(backend, BlobMarkerDetector::new(), config)
    }
}

impl<B: VisionBackend, M: MarkerDetector> Measurer<B, M> {
    pub fn with_backend(backend: B, markers: M, config: MeasureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            markers,
            config,
        })
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Measure the object in one decoded photo
    pub fn measure_image(&self, image: &RgbaImage) -> Result<MeasurementResult> {
        let start = Instant::now();

        let candidates = self.backend.candidates(image)?;
        let fiducials = if self.config.reference.policy == SelectionPolicy::Fiducial {
            self.markers.detect(image)
        } else {
            Vec::new()
        };
        debug!(
            "{} candidates, {} fiducials",
            candidates.len(),
            fiducials.len()
        );

        let (scale, object) = measure_candidates(&candidates, &fiducials, &self.config)?;

        let result = MeasurementResult {
            reference: self.config.reference.object,
            scale,
            object,
            candidate_count: candidates.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "measured {:.2} x {:.2} cm ({}) in {} ms",
            object.width_cm, object.height_cm, object.shape, result.processing_time_ms
        );
        Ok(result)
    }

    /// Load a photo from disk and measure it
    pub fn measure_file(&self, path: &Path) -> Result<MeasurementResult> {
        let image = if self.config.preprocessing.exif_orientation {
            image_loader::load_image(path)?
        } else {
            image_loader::load_image_raw(path)?
        };
        self.measure_image(&image)
    }

    /// Measure one face of the box and record it in the session
    ///
    /// On error the caller keeps the session it passed in, unchanged.
    pub fn capture_view(
        &self,
        session: &MeasurementSession,
        kind: ViewKind,
        image: &RgbaImage,
    ) -> Result<MeasurementSession> {
        let result = self.measure_image(image)?;
        let view = ViewMeasurement::from_object(kind, &result.object);
        Ok(session.record(view, &self.config.reconcile))
    }

    /// Grab a frame from `source` and record it as `kind`
    pub fn capture_from<S: FrameSource + ?Sized>(
        &self,
        session: &MeasurementSession,
        kind: ViewKind,
        source: &mut S,
    ) -> Result<MeasurementSession> {
        let frame = acquire_frame(source)?;
        self.capture_view(session, kind, &frame)
    }
}

/// Measure a photo with the default A4 configuration
///
/// # Example
///
/// ```rust,no_run
/// use giftwrap_measure::analyze_photo;
/// use std::path::Path;
///
/// let result = analyze_photo(Path::new("photo.jpg"))?;
/// println!("{:.2} x {:.2} cm", result.object.width_cm, result.object.height_cm);
/// # Ok::<(), giftwrap_measure::MeasureError>(())
/// ```
pub fn analyze_photo(path: &Path) -> Result<MeasurementResult> {
    Measurer::new(MeasureConfig::default())?.measure_file(path)
}
