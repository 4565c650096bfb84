//! Region extraction and normalization.
//!
//! Turns ordered bounding boxes into recognition-ready images:
//! - [`extract`]: vertical padding, page clipping, cropping
//! - [`RegionNormalizer`]: grayscale, denoise, binarize, rescale, dilate

pub mod extractor;
pub mod normalizer;

pub use extractor::{crop_rect, extract, Crop};
pub use normalizer::{
    normalize, NormalizeStatus, NormalizedImage, RegionNormalizer, TARGET_HEIGHT,
};
