//! Top-to-bottom reading order for single-column pages.

use crate::geometry::BoundingBox;
use crate::pipeline::{OrderedRegion, ReadingOrderSource};

use super::{sort_top_to_bottom, ReadingOrderStrategy};

/// Order boxes top to bottom by their top edge.
///
/// Boxes sharing a top edge keep their detector order.
///
/// # Examples
///
/// ```
/// use folio_regions::geometry::BoundingBox;
/// use folio_regions::pipeline::reading_order::order_single_column;
///
/// let lower = BoundingBox::new(0.0, 300.0, 100.0, 340.0, 0.9);
/// let upper = BoundingBox::new(0.0, 20.0, 100.0, 60.0, 0.9);
/// assert_eq!(order_single_column(&[lower, upper]), vec![upper, lower]);
/// ```
pub fn order_single_column(boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    let mut ordered = boxes.to_vec();
    sort_top_to_bottom(&mut ordered);
    ordered
}

/// Simple top-to-bottom reading order.
pub struct SingleColumnStrategy;

impl ReadingOrderStrategy for SingleColumnStrategy {
    fn apply(&self, boxes: Vec<BoundingBox>) -> Vec<OrderedRegion> {
        OrderedRegion::rank_sequence(
            order_single_column(&boxes),
            ReadingOrderSource::SingleColumn,
        )
    }

    fn name(&self) -> &'static str {
        "SingleColumnStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_box(x: f32, y: f32) -> BoundingBox {
        BoundingBox::new(x, y, x + 50.0, y + 12.0, 0.9)
    }

    #[test]
    fn test_simple_ordering() {
        let boxes = vec![
            make_box(0.0, 100.0), // bottom
            make_box(0.0, 10.0),  // top
            make_box(0.0, 50.0),  // middle
        ];

        let ordered = SingleColumnStrategy.apply(boxes);

        assert_eq!(ordered[0].bbox.y1, 10.0);
        assert_eq!(ordered[1].bbox.y1, 50.0);
        assert_eq!(ordered[2].bbox.y1, 100.0);
        assert_eq!(ordered[2].rank, 3);
    }

    #[test]
    fn test_equal_tops_keep_detector_order() {
        let boxes = vec![
            make_box(300.0, 40.0),
            make_box(0.0, 40.0),
            make_box(150.0, 40.0),
        ];

        let ordered = order_single_column(&boxes);
        assert_eq!(ordered, boxes);
    }

    #[test]
    fn test_empty_input() {
        assert!(order_single_column(&[]).is_empty());
        assert!(SingleColumnStrategy.apply(Vec::new()).is_empty());
    }
}
