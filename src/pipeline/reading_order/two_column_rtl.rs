//! Two-column right-to-left reading order.
//!
//! Arabic and other RTL documents are read down the right column first,
//! then down the left column.

use crate::geometry::BoundingBox;
use crate::layout::split_columns;
use crate::pipeline::{OrderedRegion, ReadingOrderSource};

use super::{sort_top_to_bottom, ReadingOrderStrategy};

/// Order boxes right column first, then left column, each top to bottom.
///
/// # Examples
///
/// ```
/// use folio_regions::geometry::BoundingBox;
/// use folio_regions::pipeline::reading_order::order_two_column_rtl;
///
/// let left = BoundingBox::new(50.0, 0.0, 150.0, 40.0, 0.9);   // center 100
/// let right = BoundingBox::new(450.0, 80.0, 550.0, 120.0, 0.9); // center 500
/// assert_eq!(order_two_column_rtl(&[left, right]), vec![right, left]);
/// ```
pub fn order_two_column_rtl(boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    let split = split_columns(boxes);
    let mut right = split.right;
    let mut left = split.left;

    sort_top_to_bottom(&mut right);
    sort_top_to_bottom(&mut left);

    right.extend(left);
    right
}

/// Column-aware reading order for two-column RTL pages.
pub struct TwoColumnRtlStrategy;

impl ReadingOrderStrategy for TwoColumnRtlStrategy {
    fn apply(&self, boxes: Vec<BoundingBox>) -> Vec<OrderedRegion> {
        OrderedRegion::rank_sequence(
            order_two_column_rtl(&boxes),
            ReadingOrderSource::TwoColumnRtl,
        )
    }

    fn name(&self) -> &'static str {
        "TwoColumnRtlStrategy"
    }
}
