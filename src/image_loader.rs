//! Image loading for phone photos
//!
//! Decodes JPEG, PNG, GIF, WebP, TIFF and BMP files with the `image` crate
//! and returns RGBA pixels. [`load_image`] also turns the photo upright
//! according to its EXIF orientation; [`load_image_raw`] keeps the stored
//! pixel order.

use image::{DynamicImage, ImageReader, RgbaImage};
use log::debug;
use std::path::Path;

use crate::error::{MeasureError, Result};
use crate::exif::{ExifExtractor, Orientation};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Whether the format can carry an EXIF block
    pub fn carries_exif(&self) -> bool {
        matches!(
            self,
            ImageFormat::Jpeg | ImageFormat::Tiff | ImageFormat::Png | ImageFormat::WebP
        )
    }
}

/// Load a photo and apply its EXIF orientation
///
/// # Errors
///
/// Returns `MeasureError::ImageLoadError` if the file cannot be opened,
/// has an unsupported extension or fails to decode, and
/// `MeasureError::ExifError` if its EXIF block is corrupt.
///
/// # Example
///
/// ```rust,no_run
/// use giftwrap_measure::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), giftwrap_measure::MeasureError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let format = detect_format(path)?;
    let decoded = decode(path)?;

    let orientation = if format.carries_exif() {
        ExifExtractor::orientation(path)?
    } else {
        Orientation::Normal
    };
    if orientation != Orientation::Normal {
        debug!("applying EXIF orientation {:?} to {}", orientation, path.display());
    }

    Ok(orientation.apply(decoded).to_rgba8())
}

/// Load a photo in stored pixel order, ignoring EXIF orientation
pub fn load_image_raw(path: &Path) -> Result<RgbaImage> {
    detect_format(path)?;
    Ok(decode(path)?.to_rgba8())
}

fn detect_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_extension(path).ok_or_else(|| MeasureError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })
}

fn decode(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        MeasureError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let reader = reader.with_guessed_format().map_err(|e| {
        MeasureError::image_load(format!("Failed to read image file: {}", path.display()), e)
    })?;

    reader.decode().map_err(|e| {
        MeasureError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("photo.webp")),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("photo.heic")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("photo.xyz")), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("png"));
        assert!(!is_supported_extension("heic"));
        assert!(!is_supported_extension("doc"));
    }

    #[test]
    fn test_load_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.dimensions(), (8, 4));
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(load_image_raw(&path).unwrap().dimensions(), (8, 4));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = load_image(Path::new("notes.txt"));
        assert!(matches!(result, Err(MeasureError::ImageLoadError { .. })));
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = load_image(Path::new("missing/photo.jpg"));
        assert!(matches!(result, Err(MeasureError::ImageLoadError { .. })));
    }
}
