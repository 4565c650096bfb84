//! External collaborators: region detection and orientation classification.
//!
//! Both are traits so the ordering and cropping logic can run against the
//! network-backed implementations in [`http`] or the deterministic fakes in
//! [`fake`].

pub mod fake;
pub mod http;

pub use fake::{FixedClassifier, FixedDetector};
pub use http::{HttpRegionDetector, OllamaOrientationClassifier};

use image::DynamicImage;

use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::layout::PageOrientation;

/// Detects content regions on a page.
///
/// Returned boxes are in the page's pixel space, carry a confidence score,
/// and come in no particular order.
pub trait RegionDetector: Send + Sync {
    /// Detect regions on one page.
    fn detect(&self, page: &DynamicImage) -> Result<Vec<BoundingBox>>;

    /// Return the name of this detector for logging.
    fn name(&self) -> &'static str;
}

/// Classifies a page as single- or double-column.
///
/// Implementations may be slow or fail; callers treat every error as
/// recoverable.
pub trait OrientationClassifier: Send + Sync {
    /// Classify one representative page.
    fn classify(&self, page: &DynamicImage) -> Result<PageOrientation>;

    /// Return the name of this classifier for logging.
    fn name(&self) -> &'static str;
}
