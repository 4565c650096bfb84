//! Per-page processing counters.

use std::time::Duration;

/// Counters collected while processing one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetrics {
    /// Page index (0-based).
    pub page_index: usize,
    /// Boxes returned by the detector.
    pub detected: usize,
    /// Boxes at or above the confidence threshold.
    pub kept: usize,
    /// Boxes discarded for low confidence.
    pub filtered: usize,
    /// Crops that reached the normalizer without pixels.
    pub degenerate: usize,
    /// Whether detection (or loading the page) failed.
    pub detection_failed: bool,
    /// Wall time spent on the page.
    pub elapsed: Duration,
}

impl PageMetrics {
    /// Fresh counters for a page.
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            ..Default::default()
        }
    }
}

/// Aggregate over all pages of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetrics {
    /// Number of pages processed.
    pub pages: usize,
    /// Sum of detected boxes.
    pub detected: usize,
    /// Sum of kept boxes.
    pub kept: usize,
    /// Sum of filtered boxes.
    pub filtered: usize,
    /// Sum of degenerate crops.
    pub degenerate: usize,
    /// Pages whose detection failed.
    pub failed_pages: usize,
    /// Total wall time.
    pub elapsed: Duration,
}

impl DocumentMetrics {
    /// Sum page counters.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a PageMetrics>) -> Self {
        pages.into_iter().fold(Self::default(), |mut acc, page| {
            acc.pages += 1;
            acc.detected += page.detected;
            acc.kept += page.kept;
            acc.filtered += page.filtered;
            acc.degenerate += page.degenerate;
            acc.failed_pages += usize::from(page.detection_failed);
            acc.elapsed += page.elapsed;
            acc
        })
    }
}
