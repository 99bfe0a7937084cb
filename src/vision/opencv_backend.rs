//! OpenCV vision backend, enabled with the `opencv` feature

use image::{imageops, RgbaImage};
use log::debug;
use opencv::{
    core::{AlgorithmHint, Mat, Point as CvPoint, Size as CvSize, Vec4i, Vector, BORDER_DEFAULT},
    imgproc::{
        bounding_rect, canny, find_contours_with_hierarchy, gaussian_blur, min_area_rect,
        CHAIN_APPROX_SIMPLE, RETR_CCOMP,
    },
    prelude::*,
};

use crate::config::PreprocessingConfig;
use crate::geometry::{Candidate, Point, Rect, Size};
use crate::vision::VisionBackend;
use crate::{MeasureError, Result};

type VectorOfPoint = Vector<CvPoint>;

/// Contour-based rectangle detector backed by OpenCV
#[derive(Debug, Clone)]
pub struct OpenCvBackend {
    config: PreprocessingConfig,
}

impl Default for OpenCvBackend {
    fn default() -> Self {
        Self::new(&PreprocessingConfig::default())
    }
}

impl OpenCvBackend {
    pub fn new(config: &PreprocessingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn edges(&self, image: &RgbaImage) -> Result<Mat> {
        let (width, height) = image.dimensions();
        let gray = imageops::grayscale(image);
        let src = Mat::new_rows_cols_with_data(height as i32, width as i32, gray.as_raw())
            .and_then(|m| m.try_clone())
            .map_err(|e| MeasureError::vision("Mat from grayscale buffer", e))?;

        let mut blurred = Mat::default();
        gaussian_blur(
            &src,
            &mut blurred,
            CvSize::new(5, 5),
            self.config.blur_sigma as f64,
            0.0,
            BORDER_DEFAULT,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| MeasureError::vision("gaussian_blur", e))?;

        let mut edges = Mat::default();
        canny(
            &blurred,
            &mut edges,
            self.config.canny_low_threshold as f64,
            self.config.canny_high_threshold as f64,
            3,
            false,
        )
        .map_err(|e| MeasureError::vision("canny", e))?;

        Ok(edges)
    }

    fn fit(&self, contour: &VectorOfPoint) -> Result<Rect> {
        if self.config.rotated_rects {
            let r = min_area_rect(contour).map_err(|e| MeasureError::vision("min_area_rect", e))?;
            Ok(Rect::rotated(
                Point::new(r.center.x as f64, r.center.y as f64),
                Size::new(r.size.width as f64, r.size.height as f64),
                r.angle as f64,
            ))
        } else {
            let r = bounding_rect(contour).map_err(|e| MeasureError::vision("bounding_rect", e))?;
            Ok(Rect::axis(r.x as f64, r.y as f64, r.width as f64, r.height as f64))
        }
    }
}

impl VisionBackend for OpenCvBackend {
    fn candidates(&self, image: &RgbaImage) -> Result<Vec<Candidate>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MeasureError::invalid_parameter(
                "image",
                format!("{}x{}", width, height),
            ));
        }

        let edges = self.edges(image)?;

        // Two-level hierarchy: shapes nested in a hole stay at the top level
        let mut contours = Vector::<VectorOfPoint>::new();
        let mut hierarchy = Vector::<Vec4i>::new();
        find_contours_with_hierarchy(
            &edges,
            &mut contours,
            &mut hierarchy,
            RETR_CCOMP,
            CHAIN_APPROX_SIMPLE,
            CvPoint::new(0, 0),
        )
        .map_err(|e| MeasureError::vision("find_contours", e))?;

        let mut candidates = Vec::new();
        for (contour, links) in contours.iter().zip(hierarchy.iter()) {
            if links[3] >= 0 {
                continue;
            }
            candidates.push(Candidate::from_rect(self.fit(&contour)?));
        }

        debug!(
            "{}x{} image: {} contours, {} candidates",
            width,
            height,
            contours.len(),
            candidates.len()
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as PixelRect;

    #[test]
    fn test_detects_filled_rectangle() {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([40, 40, 40, 255]));
        draw_filled_rect_mut(
            &mut image,
            PixelRect::at(100, 80).of_size(120, 60),
            Rgba([230, 230, 230, 255]),
        );

        let candidates = OpenCvBackend::default().candidates(&image).unwrap();
        let largest = candidates
            .iter()
            .max_by(|a, b| a.area.total_cmp(&b.area))
            .unwrap();
        assert!((largest.rect.width() - 120.0).abs() <= 3.0);
        assert!((largest.rect.height() - 60.0).abs() <= 3.0);
    }

    #[test]
    fn test_blank_image_has_no_candidates() {
        let blank = RgbaImage::from_pixel(64, 64, Rgba([128, 128, 128, 255]));
        assert!(OpenCvBackend::default().candidates(&blank).unwrap().is_empty());
    }
}
