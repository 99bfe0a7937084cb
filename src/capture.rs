//! Frame acquisition
//!
//! A [`FrameSource`] hands out still frames. [`acquire_frame`] asks for the
//! rear camera first and retries once with any camera before giving up.

use image::RgbaImage;
use log::{debug, warn};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MeasureError, Result};
use crate::image_loader::{self, is_supported_extension};

/// Camera preference for a frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Environment-facing camera
    Rear,
    /// Whatever camera is available
    Any,
}

/// Source of still frames
pub trait FrameSource {
    fn grab(&mut self, facing: Facing) -> Result<RgbaImage>;
}

/// Grab one frame, preferring the rear camera
pub fn acquire_frame<S: FrameSource + ?Sized>(source: &mut S) -> Result<RgbaImage> {
    let rear_error = match source.grab(Facing::Rear) {
        Ok(frame) => return Ok(frame),
        Err(e) => e,
    };
    warn!("rear camera unavailable ({}), retrying with any camera", rear_error);

    source.grab(Facing::Any).map_err(|e| match e {
        MeasureError::AcquisitionFailed { .. } => e,
        other => MeasureError::acquisition("No camera frame available", other),
    })
}

/// Serves image files from a directory in name order
///
/// Files carry no facing, so every preference is served alike.
#[derive(Debug, Clone)]
pub struct DirectoryFrameSource {
    frames: VecDeque<PathBuf>,
    apply_orientation: bool,
}

impl DirectoryFrameSource {
    /// Queue every supported image in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            MeasureError::acquisition(format!("Cannot read frame directory {}", dir.display()), e)
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, is_supported_extension)
            })
            .collect();
        frames.sort();

        debug!("{} frames queued from {}", frames.len(), dir.display());
        Ok(Self::from_paths(frames))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            frames: paths.into(),
            apply_orientation: true,
        }
    }

    pub fn with_orientation(mut self, apply: bool) -> Self {
        self.apply_orientation = apply;
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Path of the frame the next grab will return
    pub fn peek(&self) -> Option<&Path> {
        self.frames.front().map(PathBuf::as_path)
    }
}

impl FrameSource for DirectoryFrameSource {
    fn grab(&mut self, _facing: Facing) -> Result<RgbaImage> {
        let path = self.frames.pop_front().ok_or_else(|| MeasureError::AcquisitionFailed {
            message: "No frames left in source".to_string(),
            source: None,
        })?;

        let loaded = if self.apply_orientation {
            image_loader::load_image(&path)
        } else {
            image_loader::load_image_raw(&path)
        };
        loaded.map_err(|e| {
            MeasureError::acquisition(format!("Unreadable frame {}", path.display()), e)
        })
    }
}
