//! Ordered regions for cropping.
//!
//! [`OrderedRegion`] pairs a detected box with its position in the page's
//! reconstructed reading order.

use crate::geometry::BoundingBox;

/// Source of a reading order assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingOrderSource {
    /// Straight top-to-bottom ordering.
    #[default]
    SingleColumn,
    /// Right column top-to-bottom, then left column top-to-bottom.
    TwoColumnRtl,
}

impl ReadingOrderSource {
    /// Get strategy name for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            ReadingOrderSource::SingleColumn => "SingleColumn",
            ReadingOrderSource::TwoColumnRtl => "TwoColumnRtl",
        }
    }
}

/// A bounding box with its 1-based rank in the page's reading order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedRegion {
    /// The detected box.
    pub bbox: BoundingBox,

    /// Position in reading order (1 = first to be read).
    pub rank: usize,

    /// Strategy that assigned the rank.
    pub source: ReadingOrderSource,
}

impl OrderedRegion {
    /// Create a new ordered region.
    pub fn new(bbox: BoundingBox, rank: usize, source: ReadingOrderSource) -> Self {
        Self { bbox, rank, source }
    }

    /// Rank a sequence of boxes that is already in reading order.
    pub fn rank_sequence(boxes: Vec<BoundingBox>, source: ReadingOrderSource) -> Vec<Self> {
        boxes
            .into_iter()
            .enumerate()
            .map(|(i, bbox)| Self::new(bbox, i + 1, source))
            .collect()
    }
}
