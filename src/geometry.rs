//! Rectangle geometry shared by every stage of the pipeline
//!
//! Vision backends return many shapes of "rectangle". They are converted
//! once, at the backend boundary, into [`Rect`], which is either axis-aligned
//! or rotated.

use serde::{Deserialize, Serialize};

/// 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Width and height of a rotated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned extent of a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest bounds containing all points; `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the interiors intersect; touching edges do not count
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// A detected rectangle, axis-aligned or rotated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rect {
    /// Upright bounding box with top-left corner at (x, y)
    Axis {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Minimum-area rectangle; `angle` in degrees, clockwise in image space
    Rotated {
        center: Point,
        size: Size,
        angle: f64,
    },
}

impl Rect {
    pub fn axis(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::Axis {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rotated(center: Point, size: Size, angle: f64) -> Self {
        Rect::Rotated {
            center,
            size,
            angle,
        }
    }

    /// Rotated rectangle through four corners given in drawing order
    ///
    /// Width is the first edge, height the second; opposite edges are
    /// averaged so a slightly skewed quadrilateral still yields one size.
    pub fn from_corners(corners: &[Point; 4]) -> Self {
        let center = Point::new(
            corners.iter().map(|p| p.x).sum::<f64>() / 4.0,
            corners.iter().map(|p| p.y).sum::<f64>() / 4.0,
        );
        let width = (corners[0].distance(&corners[1]) + corners[2].distance(&corners[3])) / 2.0;
        let height = (corners[1].distance(&corners[2]) + corners[3].distance(&corners[0])) / 2.0;
        let angle = (corners[1].y - corners[0].y)
            .atan2(corners[1].x - corners[0].x)
            .to_degrees();
        Rect::rotated(center, Size::new(width, height), angle)
    }

    pub fn width(&self) -> f64 {
        match self {
            Rect::Axis { width, .. } => *width,
            Rect::Rotated { size, .. } => size.width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Rect::Axis { height, .. } => *height,
            Rect::Rotated { size, .. } => size.height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn long_side(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn short_side(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Long side over short side, `None` for degenerate rectangles
    pub fn aspect_ratio(&self) -> Option<f64> {
        let short = self.short_side();
        (short > 0.0).then(|| self.long_side() / short)
    }

    /// `|1 - w/h|`: zero for a perfect square
    pub fn squareness_score(&self) -> Option<f64> {
        let height = self.height();
        (height > 0.0).then(|| (1.0 - self.width() / height).abs())
    }

    /// Corners clockwise from the (unrotated) top-left
    pub fn corners(&self) -> [Point; 4] {
        match *self {
            Rect::Axis {
                x,
                y,
                width,
                height,
            } => [
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            Rect::Rotated {
                center,
                size,
                angle,
            } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                let hw = size.width / 2.0;
                let hh = size.height / 2.0;
                [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(dx, dy)| {
                    Point::new(
                        center.x + dx * cos - dy * sin,
                        center.y + dx * sin + dy * cos,
                    )
                })
            }
        }
    }

    /// Axis-aligned bounds of the rectangle
    pub fn bounds(&self) -> Bounds {
        match *self {
            Rect::Axis {
                x,
                y,
                width,
                height,
            } => Bounds {
                min_x: x,
                min_y: y,
                max_x: x + width,
                max_y: y + height,
            },
            Rect::Rotated { .. } => {
                let corners = self.corners();
                // Four corners, never empty
                Bounds::from_points(&corners).unwrap_or(Bounds {
                    min_x: 0.0,
                    min_y: 0.0,
                    max_x: 0.0,
                    max_y: 0.0,
                })
            }
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

/// A rectangle produced from one contour, with the contour's area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub rect: Rect,
    /// Area in px^2 used for ranking
    pub area: f64,
}

impl Candidate {
    pub fn new(rect: Rect, area: f64) -> Self {
        Self { rect, area }
    }

    /// Candidate ranked by its rectangle area
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            area: rect.area(),
        }
    }
}

/// A detected fiducial marker: four corners clockwise from top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fiducial {
    pub corners: [Point; 4],
}

impl Fiducial {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    pub fn side_lengths(&self) -> [f64; 4] {
        let c = &self.corners;
        [
            c[0].distance(&c[1]),
            c[1].distance(&c[2]),
            c[2].distance(&c[3]),
            c[3].distance(&c[0]),
        ]
    }

    pub fn mean_side(&self) -> f64 {
        self.side_lengths().iter().sum::<f64>() / 4.0
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_corners(&self.corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rect_sides() {
        let rect = Rect::axis(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.area(), 5000.0);
        assert_eq!(rect.long_side(), 100.0);
        assert_eq!(rect.short_side(), 50.0);
        assert_eq!(rect.aspect_ratio(), Some(2.0));
    }

    #[test]
    fn test_degenerate_rect_has_no_ratio() {
        let rect = Rect::axis(0.0, 0.0, 10.0, 0.0);
        assert_eq!(rect.aspect_ratio(), None);
        assert_eq!(rect.squareness_score(), None);
    }

    #[test]
    fn test_rotated_bounds_contain_corners() {
        let rect = Rect::rotated(Point::new(100.0, 100.0), Size::new(40.0, 20.0), 45.0);
        let bounds = rect.bounds();
        for corner in rect.corners() {
            assert!(corner.x >= bounds.min_x - 1e-9 && corner.x <= bounds.max_x + 1e-9);
            assert!(corner.y >= bounds.min_y - 1e-9 && corner.y <= bounds.max_y + 1e-9);
        }
        // 45 degree rotation widens the bounds to (40 + 20) / sqrt(2)
        assert!((bounds.width() - 60.0 / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::axis(0.0, 0.0, 10.0, 10.0);
        let b = Rect::axis(10.0, 0.0, 10.0, 10.0);
        let c = Rect::axis(5.0, 5.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_rect_from_corners() {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 20.0),
            Point::new(0.0, 20.0),
        ];
        let rect = Rect::from_corners(&corners);
        assert!((rect.width() - 30.0).abs() < 1e-9);
        assert!((rect.height() - 20.0).abs() < 1e-9);
        assert!(rect.bounds().intersects(&Rect::axis(10.0, 10.0, 1.0, 1.0).bounds()));
    }

    #[test]
    fn test_fiducial_mean_side() {
        let fiducial = Fiducial::new([
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ]);
        assert_eq!(fiducial.mean_side(), 50.0);
    }

    #[test]
    fn test_rect_serde_tagged() {
        let rect = Rect::axis(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&rect).unwrap();
        assert!(json.contains("\"kind\":\"axis\""));
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, back);
    }
}
