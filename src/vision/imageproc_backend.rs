//! Pure-Rust vision backend built on `imageproc`
//!
//! grayscale -> Canny -> outer contour borders -> upright bounding boxes or
//! minimum-area rotated rectangles.
//!
//! `imageproc::edges::canny` smooths with its own Gaussian (sigma 1.4), so
//! no separate blur runs here and `blur_sigma` is ignored.

use image::{imageops, GrayImage, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use imageproc::geometry::convex_hull;
use imageproc::point::Point as PixelPoint;
use log::debug;

use crate::config::PreprocessingConfig;
use crate::geometry::{Candidate, Point, Rect, Size};
use crate::vision::VisionBackend;
use crate::{MeasureError, Result};

/// Contour-based rectangle detector
#[derive(Debug, Clone)]
pub struct ImageprocBackend {
    canny_low: f32,
    canny_high: f32,
    rotated_rects: bool,
}

impl Default for ImageprocBackend {
    fn default() -> Self {
        Self::new(&PreprocessingConfig::default())
    }
}

impl ImageprocBackend {
    pub fn new(config: &PreprocessingConfig) -> Self {
        Self {
            canny_low: config.canny_low_threshold,
            canny_high: config.canny_high_threshold,
            rotated_rects: config.rotated_rects,
        }
    }

    /// Like [`ImageprocBackend::new`], rejecting thresholds Canny cannot use
    pub fn try_new(config: &PreprocessingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Binary edge map of the photo
    pub fn edges(&self, image: &RgbaImage) -> GrayImage {
        canny(&imageops::grayscale(image), self.canny_low, self.canny_high)
    }

    fn fit(&self, points: &[PixelPoint<i32>]) -> Option<Rect> {
        if self.rotated_rects {
            min_area_rect(points)
        } else {
            bounding_rect(points)
        }
    }
}

impl VisionBackend for ImageprocBackend {
    fn candidates(&self, image: &RgbaImage) -> Result<Vec<Candidate>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MeasureError::invalid_parameter(
                "image",
                format!("{}x{}", width, height),
            ));
        }
        if !(0.0..=self.canny_high).contains(&self.canny_low) {
            return Err(MeasureError::invalid_parameter(
                "canny thresholds",
                format!("{}..{}", self.canny_low, self.canny_high),
            ));
        }

        let edges = self.edges(image);
        let contours = find_contours::<i32>(&edges);

        let candidates: Vec<Candidate> = contours
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer))
            .filter_map(|c| self.fit(&c.points))
            .map(Candidate::from_rect)
            .collect();

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

/// Upright bounding box in pixel units, inclusive of both end pixels
fn bounding_rect(points: &[PixelPoint<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::axis(
        min_x as f64,
        min_y as f64,
        (max_x - min_x + 1) as f64,
        (max_y - min_y + 1) as f64,
    ))
}

/// Minimum-area enclosing rectangle over the convex hull edges
fn min_area_rect(points: &[PixelPoint<i32>]) -> Option<Rect> {
    let hull: Vec<Point> = convex_hull(points)
        .into_iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();
    if hull.len() < 3 {
        return bounding_rect(points);
    }

    let mut best: Option<(f64, Rect)> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let length = a.distance(&b);
        if length == 0.0 {
            continue;
        }
        let (ux, uy) = ((b.x - a.x) / length, (b.y - a.y) / length);

        let (mut min_u, mut max_u, mut min_v, mut max_v) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in &hull {
            let u = (p.x - a.x) * ux + (p.y - a.y) * uy;
            let v = -(p.x - a.x) * uy + (p.y - a.y) * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.as_ref().map_or(true, |(best_area, _)| area < *best_area) {
            let cu = (min_u + max_u) / 2.0;
            let cv = (min_v + max_v) / 2.0;
            let center = Point::new(a.x + cu * ux - cv * uy, a.y + cu * uy + cv * ux);
            let rect = Rect::rotated(
                center,
                Size::new(max_u - min_u, max_v - min_v),
                uy.atan2(ux).to_degrees(),
            );
            best = Some((area, rect));
        }
    }
    match best {
        Some((area, rect)) if area > 0.0 => Some(rect),
        _ => bounding_rect(points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as PixelRect;

    fn scene() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([40, 40, 40, 255]));
        draw_filled_rect_mut(
            &mut image,
            PixelRect::at(100, 80).of_size(120, 60),
            Rgba([230, 230, 230, 255]),
        );
        image
    }

    #[test]
    fn test_bounding_rect_inclusive() {
        let points = vec![PixelPoint::new(2, 3), PixelPoint::new(11, 3), PixelPoint::new(11, 7)];
        let rect = bounding_rect(&points).unwrap();
        assert_eq!(rect, Rect::axis(2.0, 3.0, 10.0, 5.0));
        assert!(bounding_rect(&[]).is_none());
    }

    #[test]
    fn test_min_area_rect_of_tilted_square() {
        // Diamond with half-diagonal 10: a square of side 10 * sqrt(2)
        let points = vec![
            PixelPoint::new(10, 0),
            PixelPoint::new(20, 10),
            PixelPoint::new(10, 20),
            PixelPoint::new(0, 10),
        ];
        let rect = min_area_rect(&points).unwrap();
        let side = 10.0 * 2f64.sqrt();
        assert!((rect.width() - side).abs() < 1e-6);
        assert!((rect.height() - side).abs() < 1e-6);
        assert!((rect.area() - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_min_area_rect_collinear_falls_back() {
        let points = vec![PixelPoint::new(0, 0), PixelPoint::new(5, 0), PixelPoint::new(9, 0)];
        let rect = min_area_rect(&points).unwrap();
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 1.0);
    }

    #[test]
    fn test_detects_filled_rectangle() {
        let backend = ImageprocBackend::default();
        let candidates = backend.candidates(&scene()).unwrap();
        let largest = candidates
            .iter()
            .max_by(|a, b| a.area.total_cmp(&b.area))
            .unwrap();
        assert!((largest.rect.width() - 120.0).abs() <= 3.0);
        assert!((largest.rect.height() - 60.0).abs() <= 3.0);
    }

    #[test]
    fn test_blank_image_has_no_candidates() {
        let backend = ImageprocBackend::default();
        let blank = RgbaImage::from_pixel(64, 64, Rgba([128, 128, 128, 255]));
        assert!(backend.candidates(&blank).unwrap().is_empty());
    }

    #[test]
    fn test_moderate_contrast_edges_found() {
        // Luma 150 on 235 paper
        let mut image = RgbaImage::from_pixel(300, 200, Rgba([235, 235, 235, 255]));
        draw_filled_rect_mut(
            &mut image,
            PixelRect::at(60, 50).of_size(150, 80),
            Rgba([150, 150, 150, 255]),
        );

        let candidates = ImageprocBackend::default().candidates(&image).unwrap();
        assert!(candidates.iter().any(|c| {
            (c.rect.width() - 150.0).abs() <= 3.0 && (c.rect.height() - 80.0).abs() <= 3.0
        }));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = PreprocessingConfig {
            canny_low_threshold: 200.0,
            canny_high_threshold: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            ImageprocBackend::try_new(&config),
            Err(MeasureError::InvalidParameter { .. })
        ));
        let backend = ImageprocBackend::new(&config);
        assert!(matches!(
            backend.candidates(&scene()),
            Err(MeasureError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let backend = ImageprocBackend::default();
        assert!(backend.candidates(&RgbaImage::new(0, 0)).is_err());
    }
}
