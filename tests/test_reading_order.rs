//! Reading order and column split properties.
//!
//! Checks the invariants the orchestrator relies on:
//! - column split is a partition of its input
//! - single-column order is a permutation sorted by top edge
//! - two-column RTL order puts the right column before the left
//! - low-confidence boxes never reach ordering

use folio_regions::geometry::BoundingBox;
use folio_regions::layout::{split_columns, PageOrientation};
use folio_regions::pipeline::{
    create_strategy, filter_by_confidence, order_single_column, order_two_column_rtl,
    ReadingOrderSource,
};
use proptest::prelude::*;

type BoxKey = (u32, u32, u32, u32, u32);

fn key(b: &BoundingBox) -> BoxKey {
    (
        b.x1.to_bits(),
        b.y1.to_bits(),
        b.x2.to_bits(),
        b.y2.to_bits(),
        b.confidence.to_bits(),
    )
}

fn sorted_keys<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Vec<BoxKey> {
    let mut keys: Vec<BoxKey> = boxes.into_iter().map(key).collect();
    keys.sort_unstable();
    keys
}

fn arb_box() -> impl Strategy<Value = BoundingBox> {
    (0u32..2000, 1u32..400, 0u32..3000, 1u32..200, 0u32..=100).prop_map(|(x, w, y, h, c)| {
        BoundingBox::new(x as f32, y as f32, (x + w) as f32, (y + h) as f32, c as f32 / 100.0)
    })
}

fn arb_boxes() -> impl Strategy<Value = Vec<BoundingBox>> {
    prop::collection::vec(arb_box(), 0..40)
}

fn boxed(cx: f32, y1: f32) -> BoundingBox {
    BoundingBox::new(cx - 40.0, y1, cx + 40.0, y1 + 30.0, 0.9)
}

// ============================================================================
// Properties
// ============================================================================

/// Property: every box lands in exactly one column
#[test]
fn proptest_split_is_partition() {
    proptest!(|(boxes in arb_boxes())| {
        let split = split_columns(&boxes);
        prop_assert_eq!(split.right.len() + split.left.len(), boxes.len());
        prop_assert_eq!(
            sorted_keys(split.right.iter().chain(split.left.iter())),
            sorted_keys(&boxes)
        );
    });
}

/// Property: the right column holds the larger centers
#[test]
fn proptest_split_right_is_rightmost() {
    proptest!(|(boxes in arb_boxes())| {
        let split = split_columns(&boxes);
        let right_min = split.right.iter().map(BoundingBox::center_x).fold(f32::INFINITY, f32::min);
        let left_max = split.left.iter().map(BoundingBox::center_x).fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(split.left.is_empty() || split.right.is_empty() || right_min >= left_max);
        prop_assert!(boxes.is_empty() || !split.right.is_empty());
    });
}

/// Property: single-column order is a permutation with non-decreasing top edge
#[test]
fn proptest_single_column_sorted_permutation() {
    proptest!(|(boxes in arb_boxes())| {
        let ordered = order_single_column(&boxes);
        prop_assert_eq!(sorted_keys(&ordered), sorted_keys(&boxes));
        prop_assert!(ordered.windows(2).all(|w| w[0].y1 <= w[1].y1));
    });
}

/// Property: two-column RTL output is the right column then the left column,
/// each sorted by top edge
#[test]
fn proptest_two_column_right_before_left() {
    proptest!(|(boxes in arb_boxes())| {
        let split = split_columns(&boxes);
        let ordered = order_two_column_rtl(&boxes);
        prop_assert_eq!(ordered.len(), boxes.len());

        let (right, left) = ordered.split_at(split.right.len());
        prop_assert_eq!(sorted_keys(right), sorted_keys(&split.right));
        prop_assert_eq!(sorted_keys(left), sorted_keys(&split.left));
        prop_assert!(right.windows(2).all(|w| w[0].y1 <= w[1].y1));
        prop_assert!(left.windows(2).all(|w| w[0].y1 <= w[1].y1));
    });
}

/// Property: filtered-out boxes never receive a rank
#[test]
fn proptest_low_confidence_never_ordered() {
    proptest!(|(boxes in arb_boxes(), threshold in 0u32..=100)| {
        let threshold = threshold as f32 / 100.0;
        for orientation in [PageOrientation::SingleColumn, PageOrientation::DoubleColumn] {
            let ordered = create_strategy(orientation).apply(filter_by_confidence(boxes.clone(), threshold));
            prop_assert!(ordered.iter().all(|r| r.bbox.confidence >= threshold));
            prop_assert_eq!(
                ordered.len(),
                boxes.iter().filter(|b| b.confidence >= threshold).count()
            );
            let ranks: Vec<usize> = ordered.iter().map(|r| r.rank).collect();
            let expected: Vec<usize> = (1..=ordered.len()).collect();
            prop_assert_eq!(ranks, expected);
        }
    });
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_two_boxes_split_on_widest_gap() {
    let left = boxed(100.0, 10.0);
    let right = boxed(500.0, 300.0);

    let split = split_columns(&[left, right]);
    assert_eq!(split.right, vec![right]);
    assert_eq!(split.left, vec![left]);

    let regions = create_strategy(PageOrientation::DoubleColumn).apply(vec![left, right]);
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].bbox, right);
    assert_eq!(regions[0].rank, 1);
    assert_eq!(regions[1].bbox, left);
    assert_eq!(regions[1].rank, 2);
    assert!(regions.iter().all(|r| r.source == ReadingOrderSource::TwoColumnRtl));
}

#[test]
fn test_single_box_single_column() {
    let only = BoundingBox::new(10.0, 20.0, 110.0, 70.0, 0.9);
    let regions = create_strategy(PageOrientation::SingleColumn).apply(vec![only]);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].bbox, only);
    assert_eq!(regions[0].rank, 1);
}

#[test]
fn test_inserted_box_inside_column_keeps_assignment() {
    let boxes = vec![
        boxed(100.0, 0.0),
        boxed(160.0, 50.0),
        boxed(600.0, 0.0),
        boxed(650.0, 50.0),
    ];
    let before = split_columns(&boxes);

    let mut with_inserted = boxes.clone();
    with_inserted.push(boxed(130.0, 100.0));
    let after = split_columns(&with_inserted);

    assert_eq!(after.right, before.right);
    assert_eq!(after.left.len(), before.left.len() + 1);
    for b in &before.left {
        assert!(after.left.contains(b));
    }
}

#[test]
fn test_rtl_page_reads_right_column_top_down_first() {
    let boxes = vec![
        boxed(150.0, 400.0),
        boxed(700.0, 200.0),
        boxed(150.0, 100.0),
        boxed(700.0, 50.0),
    ];
    let ordered = order_two_column_rtl(&boxes);
    let centers: Vec<(f32, f32)> = ordered.iter().map(|b| (b.center_x(), b.y1)).collect();
    assert_eq!(
        centers,
        vec![(700.0, 50.0), (700.0, 200.0), (150.0, 100.0), (150.0, 400.0)]
    );
}

#[test]
fn test_empty_page_orders_to_nothing() {
    assert!(order_single_column(&[]).is_empty());
    assert!(order_two_column_rtl(&[]).is_empty());
    assert!(split_columns(&[]).is_empty());
}
