// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Folio Regions
//!
//! Reading-order and region extraction for scanned manuscript pages.
//!
//! ## Core Features
//!
//! - **Orientation**: one single/double-column decision per document, taken
//!   from its middle page and falling back to single-column on failure
//! - **Reading Order**: single-column top-to-bottom, or right-to-left
//!   two-column (right column first) using a widest-gap column split
//! - **Region Extraction**: vertically padded crops clipped to the page
//! - **Normalization**: grayscale, non-local-means denoising, Gaussian
//!   adaptive threshold, rescale to a fixed height, 1×1 dilation
//! - **Debug Visualization**: optional page overlays showing ordered regions
//!
//! ## Architecture
//!
//! Region detection and orientation classification are external services
//! behind the [`services::RegionDetector`] and
//! [`services::OrientationClassifier`] traits. The [`pipeline::RegionPipeline`]
//! drives them over a [`source::PageSource`] and recovers from every
//! per-page failure.
//!
//! ## Quick Start
//!
//! ```ignore
//! use folio_regions::config::ServiceConfig;
//! use folio_regions::pipeline::{PipelineConfig, RegionPipeline};
//! use folio_regions::services::{HttpRegionDetector, OllamaOrientationClassifier};
//! use folio_regions::source::ImageFileSource;
//!
//! # fn main() -> folio_regions::Result<()> {
//! let services = ServiceConfig::from_env();
//! let pipeline = RegionPipeline::new(
//!     PipelineConfig::default(),
//!     Box::new(HttpRegionDetector::from_config(&services)?),
//!     Box::new(OllamaOrientationClassifier::from_config(&services)?),
//! )?;
//!
//! let source = ImageFileSource::open("scans/manuscript")?;
//! let output = pipeline.process(&source)?;
//! for region in output.iter() {
//!     println!("page {} region {}: {}x{}", region.page_index, region.rank,
//!         region.image.width(), region.image.height());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometry primitives
pub mod geometry;

// Column splitting and orientation
pub mod layout;

// Region cropping and normalization
pub mod regions;

// Orchestration and reading order
pub mod pipeline;

// External collaborators
pub mod services;

// Page input
pub mod source;

// Service configuration
pub mod config;

// Debug visualization
pub mod debug;

// Re-exports
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use geometry::{BoundingBox, PixelRect, Rect};
pub use layout::PageOrientation;
pub use pipeline::{
    DocumentRegions, NormalizedRegion, OrderedRegion, PipelineConfig, ReadingOrderSource,
    RegionPipeline,
};
pub use regions::{NormalizeStatus, RegionNormalizer};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This keeps sorts of detector coordinates total even on malformed input.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "folio_regions");
    }
}
