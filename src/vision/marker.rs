//! Square blob marker detector
//!
//! Thresholds the photo at its mean luminance, labels connected blobs and
//! keeps the large, roughly square ones as fiducials in raster-scan order
//! of their first pixel. Good enough for a printed black square on a light
//! table; not a full ArUco decoder.

use image::{imageops, GrayImage, Luma, RgbaImage};
use imageproc::region_labelling::{connected_components, Connectivity};
use log::debug;
use std::collections::BTreeMap;

use crate::constants::processing::{
    MARKER_MAX_CANDIDATES, MARKER_MIN_BLOB_PIXELS, MARKER_MIN_SIDE_PX,
};
use crate::geometry::{Fiducial, Point};
use crate::vision::MarkerDetector;

/// Blob-based square marker detector
#[derive(Debug, Clone)]
pub struct BlobMarkerDetector {
    pub params: BlobMarkerParams,
}

#[derive(Debug, Clone)]
pub struct BlobMarkerParams {
    /// Look for blobs darker than the mean (printed markers) or brighter
    pub dark_blobs: bool,
    /// Blobs must have strictly more pixels than this
    pub min_blob_pixels: u32,
    pub min_side_px: u32,
    /// Maximum `|w - h|` as a fraction of the longer side
    pub max_side_difference: f64,
    pub max_markers: usize,
}

impl Default for BlobMarkerParams {
    fn default() -> Self {
        Self {
            dark_blobs: true,
            min_blob_pixels: MARKER_MIN_BLOB_PIXELS,
            min_side_px: MARKER_MIN_SIDE_PX,
            max_side_difference: 0.5,
            max_markers: MARKER_MAX_CANDIDATES,
        }
    }
}

impl Default for BlobMarkerDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct Blob {
    /// Row and column of the first pixel met in raster order
    first: (u32, u32),
    pixels: u32,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Blob {
    fn at(x: u32, y: u32) -> Self {
        Self {
            first: (y, x),
            pixels: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.pixels += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

impl BlobMarkerDetector {
    pub fn new() -> Self {
        Self {
            params: BlobMarkerParams::default(),
        }
    }

    pub fn with_params(params: BlobMarkerParams) -> Self {
        Self { params }
    }

    fn binarize(&self, gray: &GrayImage) -> GrayImage {
        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let count = (gray.width() as u64 * gray.height() as u64).max(1);
        let mean = (total / count) as u8;

        let dark = self.params.dark_blobs;
        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let luma = gray.get_pixel(x, y)[0];
            let foreground = if dark { luma < mean } else { luma > mean };
            Luma([if foreground { 255 } else { 0 }])
        })
    }

    fn accepts(&self, blob: &Blob) -> bool {
        let w = blob.max_x - blob.min_x + 1;
        let h = blob.max_y - blob.min_y + 1;
        let longer = w.max(h) as f64;
        blob.pixels > self.params.min_blob_pixels
            && w >= self.params.min_side_px
            && h >= self.params.min_side_px
            && (w as f64 - h as f64).abs() <= longer * self.params.max_side_difference
    }
}

impl MarkerDetector for BlobMarkerDetector {
    fn detect(&self, image: &RgbaImage) -> Vec<Fiducial> {
        let binary = self.binarize(&imageops::grayscale(image));
        let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));

        let mut blobs: BTreeMap<u32, Blob> = BTreeMap::new();
        for (x, y, label) in labels.enumerate_pixels() {
            let label = label[0];
            if label == 0 {
                continue;
            }
            blobs.entry(label).or_insert_with(|| Blob::at(x, y)).add(x, y);
        }

        let mut accepted: Vec<Blob> = blobs.into_values().filter(|b| self.accepts(b)).collect();
        // Raster order of each blob's first pixel, never by size
        accepted.sort_by_key(|b| b.first);
        accepted.truncate(self.params.max_markers);

        debug!("{} marker blobs accepted", accepted.len());

        accepted
            .into_iter()
            .map(|b| {
                // Inclusive extent, same as the contour bounding boxes
                let (x0, y0) = (b.min_x as f64, b.min_y as f64);
                let (x1, y1) = ((b.max_x + 1) as f64, (b.max_y + 1) as f64);
                Fiducial::new([
                    Point::new(x0, y0),
                    Point::new(x1, y0),
                    Point::new(x1, y1),
                    Point::new(x0, y1),
                ])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as PixelRect;

    fn paper() -> RgbaImage {
        RgbaImage::from_pixel(400, 300, Rgba([235, 235, 235, 255]))
    }

    fn black(image: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32) {
        draw_filled_rect_mut(image, PixelRect::at(x, y).of_size(w, h), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn test_detects_square_marker() {
        let mut image = paper();
        black(&mut image, 50, 60, 80, 80);

        let markers = BlobMarkerDetector::new().detect(&image);
        assert_eq!(markers.len(), 1);
        let corners = markers[0].corners;
        assert_eq!(corners[0], Point::new(50.0, 60.0));
        assert_eq!(corners[2], Point::new(130.0, 140.0));
        assert_eq!(markers[0].mean_side(), 80.0);
    }

    #[test]
    fn test_rejects_small_and_elongated_blobs() {
        let mut image = paper();
        // Too few pixels
        black(&mut image, 10, 10, 20, 20);
        // Far from square
        black(&mut image, 100, 100, 200, 40);

        assert!(BlobMarkerDetector::new().detect(&image).is_empty());
    }

    #[test]
    fn test_raster_order_and_capped() {
        let mut image = RgbaImage::from_pixel(800, 200, Rgba([235, 235, 235, 255]));
        for i in 0..6 {
            let side = 80 - i * 5;
            black(&mut image, 10 + i as i32 * 130, 20, side, side);
        }

        let markers = BlobMarkerDetector::new().detect(&image);
        assert_eq!(markers.len(), MARKER_MAX_CANDIDATES);
        let lefts: Vec<f64> = markers.iter().map(|m| m.corners[0].x).collect();
        assert_eq!(lefts, vec![10.0, 140.0, 270.0, 400.0, 530.0]);
    }

    #[test]
    fn test_small_marker_above_large_square_comes_first() {
        let mut image = RgbaImage::from_pixel(640, 480, Rgba([235, 235, 235, 255]));
        black(&mut image, 20, 20, 100, 100);
        draw_filled_rect_mut(
            &mut image,
            PixelRect::at(250, 200).of_size(200, 180),
            Rgba([40, 40, 40, 255]),
        );

        let markers = BlobMarkerDetector::new().detect(&image);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].corners[0], Point::new(20.0, 20.0));
        assert_eq!(markers[0].mean_side(), 100.0);
    }

    #[test]
    fn test_light_blob_polarity() {
        let mut image = RgbaImage::from_pixel(300, 300, Rgba([20, 20, 20, 255]));
        draw_filled_rect_mut(
            &mut image,
            PixelRect::at(100, 100).of_size(60, 60),
            Rgba([250, 250, 250, 255]),
        );

        let light = BlobMarkerDetector::with_params(BlobMarkerParams {
            dark_blobs: false,
            ..Default::default()
        });
        let markers = light.detect(&image);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].corners[0], Point::new(100.0, 100.0));
    }
}
