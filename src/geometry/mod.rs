//! Geometric primitives for region ordering and cropping.
//!
//! Detector output lives in page-pixel space ([`BoundingBox`]); crops are
//! integer pixel rectangles ([`PixelRect`]); [`Rect`] is the floating-point
//! rectangle used when mapping pixel regions back to PDF points.

use serde::{Deserialize, Serialize};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// A rectangle given by its top-left corner and dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_regions::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A detected region in page-pixel coordinates with its detector confidence.
///
/// Boxes are plain values: padding and clipping derive a new [`PixelRect`]
/// and never touch the box itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
    /// Detector confidence in `[0, 1]`
    pub confidence: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_regions::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(10.0, 20.0, 110.0, 70.0, 0.9);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.center_x(), 60.0);
    /// ```
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Horizontal center, used to separate reading columns.
    pub fn center_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    /// Whether the box satisfies `x1 < x2`, `y1 < y2` with finite
    /// coordinates and a confidence in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        let finite = [self.x1, self.y1, self.x2, self.y2, self.confidence]
            .iter()
            .all(|v| v.is_finite());
        finite && self.x1 < self.x2 && self.y1 < self.y2 && (0.0..=1.0).contains(&self.confidence)
    }
}

/// An integer pixel rectangle with exclusive right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive)
    pub x1: u32,
    /// Top edge (inclusive)
    pub y1: u32,
    /// Right edge (exclusive)
    pub x2: u32,
    /// Bottom edge (exclusive)
    pub y2: u32,
}

impl PixelRect {
    /// Create a pixel rectangle. Inverted edges collapse to zero extent.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1,
            y1,
            x2: x2.max(x1),
            y2: y2.max(y1),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Map the rectangle into PDF points for a page rasterized at `dpi`.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_regions::geometry::PixelRect;
    ///
    /// let rect = PixelRect::new(0, 300, 600, 900).to_points(300.0);
    /// assert_eq!(rect.y, 72.0);
    /// assert_eq!(rect.width, 144.0);
    /// ```
    pub fn to_points(&self, dpi: f32) -> Rect {
        let to_pt = |px: u32| px as f32 * POINTS_PER_INCH / dpi;
        Rect::from_points(to_pt(self.x1), to_pt(self.y1), to_pt(self.x2), to_pt(self.y2))
    }
}
