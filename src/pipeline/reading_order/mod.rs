//! Reading order strategies for detected regions.
//!
//! # Available Strategies
//!
//! - [`SingleColumnStrategy`]: straight top-to-bottom ordering
//! - [`TwoColumnRtlStrategy`]: right column, then left column, each top-to-bottom
//!
//! Both are pure and total: empty input yields empty output, and identical
//! input order always yields identical output.

mod single_column;
mod two_column_rtl;

pub use single_column::{order_single_column, SingleColumnStrategy};
pub use two_column_rtl::{order_two_column_rtl, TwoColumnRtlStrategy};

use crate::geometry::BoundingBox;
use crate::layout::PageOrientation;
use crate::pipeline::OrderedRegion;
use crate::utils::safe_float_cmp;

/// Trait for determining the reading order of a page's regions.
pub trait ReadingOrderStrategy: Send + Sync {
    /// Order boxes and assign 1-based ranks.
    fn apply(&self, boxes: Vec<BoundingBox>) -> Vec<OrderedRegion>;

    /// Return the name of this strategy for debugging.
    fn name(&self) -> &'static str;
}

/// Create the reading order strategy for a document orientation.
pub fn create_strategy(orientation: PageOrientation) -> Box<dyn ReadingOrderStrategy> {
    match orientation {
        PageOrientation::SingleColumn => Box::new(SingleColumnStrategy),
        PageOrientation::DoubleColumn => Box::new(TwoColumnRtlStrategy),
    }
}

/// Stable sort by top edge; equal tops keep their incoming order.
pub(crate) fn sort_top_to_bottom(boxes: &mut [BoundingBox]) {
    boxes.sort_by(|a, b| safe_float_cmp(a.y1, b.y1));
}
