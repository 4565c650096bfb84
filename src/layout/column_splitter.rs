//! Largest-gap column splitting.
//!
//! Splits a page's regions into a right and a left reading column at the
//! widest horizontal gap between consecutive box centers. The gap between
//! centers stands in for the gutter, so column widths and the number of boxes
//! per column do not matter.
//!
//! The heuristic never checks that a single dominant gap exists. Pages with
//! three or more columns, or single-column pages routed here by mistake,
//! still get split at their widest gap, and either column may come back empty.

use crate::geometry::BoundingBox;
use crate::utils::safe_float_cmp;

/// Result of splitting a page's boxes into two reading columns.
///
/// Boxes inside each column are ordered by ascending horizontal center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSplit {
    /// Boxes whose centers lie right of the widest gap
    pub right: Vec<BoundingBox>,
    /// Boxes whose centers lie left of the widest gap
    pub left: Vec<BoundingBox>,
}

impl ColumnSplit {
    /// Total number of boxes across both columns.
    pub fn len(&self) -> usize {
        self.right.len() + self.left.len()
    }

    /// True when both columns are empty.
    pub fn is_empty(&self) -> bool {
        self.right.is_empty() && self.left.is_empty()
    }
}

/// Split boxes into right and left columns at the widest center gap.
///
/// A lone box forms the right column by itself. On ties the first (leftmost)
/// maximum gap wins.
///
/// # Examples
///
/// ```
/// use folio_regions::geometry::BoundingBox;
/// use folio_regions::layout::split_columns;
///
/// let left = BoundingBox::new(50.0, 0.0, 150.0, 40.0, 0.9);   // center 100
/// let right = BoundingBox::new(450.0, 0.0, 550.0, 40.0, 0.9); // center 500
///
/// let split = split_columns(&[left, right]);
/// assert_eq!(split.right, vec![right]);
/// assert_eq!(split.left, vec![left]);
/// ```
pub fn split_columns(boxes: &[BoundingBox]) -> ColumnSplit {
    match boxes.len() {
        0 => return ColumnSplit::default(),
        1 => {
            return ColumnSplit {
                right: boxes.to_vec(),
                left: Vec::new(),
            }
        },
        _ => {},
    }

    // Stable sort: equal centers keep detector order
    let mut by_center = boxes.to_vec();
    by_center.sort_by(|a, b| safe_float_cmp(a.center_x(), b.center_x()));

    let split_idx = widest_gap_index(&by_center) + 1;
    let right = by_center.split_off(split_idx);

    log::trace!(
        "Column split at sorted index {} of {} (left={}, right={})",
        split_idx,
        boxes.len(),
        by_center.len(),
        right.len()
    );

    ColumnSplit {
        right,
        left: by_center,
    }
}

/// Index of the first maximum difference between consecutive centers.
///
/// `sorted` must be ordered by center and hold at least two boxes.
fn widest_gap_index(sorted: &[BoundingBox]) -> usize {
    let mut best_idx = 0;
    let mut best_gap = f32::NEG_INFINITY;

    for (i, pair) in sorted.windows(2).enumerate() {
        let gap = pair[1].center_x() - pair[0].center_x();
        // Strict comparison keeps the first maximum
        if gap > best_gap {
            best_gap = gap;
            best_idx = i;
        }
    }

    best_idx
}
