//! Region pipeline: from page images to ordered, normalized region crops.
//!
//! ```text
//! PageSource
//!     ↓ (once) middle page → [OrientationClassifier] → PageOrientation
//!     ↓ (per page)
//! [RegionDetector] → BoundingBox[]
//!     ↓ confidence filter
//! [ReadingOrderStrategy] → OrderedRegion[]
//!     ↓ (per region)
//! extract → Crop → RegionNormalizer → NormalizedRegion
//!     ↓
//! DocumentRegions (page index → regions in reading order)
//! ```
//!
//! # Failure policy
//!
//! Only an empty page source aborts a run. A failed classification falls
//! back to [`PageOrientation::SingleColumn`]; a page that cannot be loaded or
//! whose detection fails yields an empty region list; a degenerate crop is
//! passed through unscaled. Each of these is logged with its page (and
//! region) index.

pub mod config;
pub mod metrics;
pub mod ordered_region;
pub mod reading_order;

pub use config::PipelineConfig;
pub use metrics::{DocumentMetrics, PageMetrics};
pub use ordered_region::{OrderedRegion, ReadingOrderSource};
pub use reading_order::{
    create_strategy, order_single_column, order_two_column_rtl, ReadingOrderStrategy,
    SingleColumnStrategy, TwoColumnRtlStrategy,
};

use std::collections::BTreeMap;
use std::time::Instant;

use image::{DynamicImage, GrayImage};

use crate::debug::PageSink;
use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, PixelRect, Rect};
use crate::layout::PageOrientation;
use crate::regions::{extract, NormalizeStatus};
use crate::services::{OrientationClassifier, RegionDetector};
use crate::source::PageSource;

/// Keep boxes whose confidence is at or above `threshold`.
///
/// Detector order is preserved.
pub fn filter_by_confidence(boxes: Vec<BoundingBox>, threshold: f32) -> Vec<BoundingBox> {
    boxes
        .into_iter()
        .filter(|b| b.confidence >= threshold)
        .collect()
}

/// Index of the page used to classify the whole document.
pub fn representative_page(page_count: usize) -> usize {
    page_count / 2
}

/// A normalized crop with its place in the document.
#[derive(Debug, Clone)]
pub struct NormalizedRegion {
    /// Page index (0-based).
    pub page_index: usize,
    /// Rank in the page's reading order (1-based).
    pub rank: usize,
    /// Detected box the crop came from.
    pub bbox: BoundingBox,
    /// Padded, clipped crop rectangle in page pixels.
    pub crop_rect: PixelRect,
    /// Normalized pixels.
    pub image: GrayImage,
    /// Whether the crop was rescaled or passed through as degenerate.
    pub status: NormalizeStatus,
}

impl NormalizedRegion {
    /// Crop rectangle in PDF points for a page rasterized at `dpi`.
    pub fn crop_points(&self, dpi: f32) -> Rect {
        self.crop_rect.to_points(dpi)
    }
}

/// Output of a document run.
#[derive(Debug, Clone)]
pub struct DocumentRegions {
    /// Orientation applied to every page.
    pub orientation: PageOrientation,
    /// Rasterization DPI of the source pages.
    pub dpi: f32,
    /// Regions per page index, in reading order. Every page has an entry.
    pub pages: BTreeMap<usize, Vec<NormalizedRegion>>,
    /// Per-page counters, in page order.
    pub metrics: Vec<PageMetrics>,
}

impl DocumentRegions {
    /// Regions of one page.
    pub fn page(&self, index: usize) -> Option<&[NormalizedRegion]> {
        self.pages.get(&index).map(Vec::as_slice)
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of regions across all pages.
    pub fn total_regions(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// All regions in document order (page index, then rank).
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRegion> {
        self.pages.values().flatten()
    }

    /// Counters summed over all pages.
    pub fn summary(&self) -> DocumentMetrics {
        DocumentMetrics::from_pages(&self.metrics)
    }
}

/// Orchestrates orientation decision, detection, ordering and normalization.
pub struct RegionPipeline {
    config: PipelineConfig,
    detector: Box<dyn RegionDetector>,
    classifier: Box<dyn OrientationClassifier>,
    sink: Option<Box<dyn PageSink>>,
}

impl RegionPipeline {
    /// Create a pipeline. Fails if the configuration is invalid.
    pub fn new(
        config: PipelineConfig,
        detector: Box<dyn RegionDetector>,
        classifier: Box<dyn OrientationClassifier>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector,
            classifier,
            sink: None,
        })
    }

    /// Install a sink that observes each page's ordered regions.
    pub fn with_sink(mut self, mut sink: Box<dyn PageSink>) -> Self {
        sink.configure(&self.config);
        self.sink = Some(sink);
        self
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decide the document orientation from its middle page.
    ///
    /// Never fails: any loading or classification error falls back to
    /// [`PageOrientation::SingleColumn`].
    pub fn decide_orientation<S: PageSource + ?Sized>(&self, source: &S) -> PageOrientation {
        let page_count = source.page_count();
        if page_count == 0 {
            return PageOrientation::default();
        }

        let index = representative_page(page_count);
        log::info!("Analyzing layout using page {} ({} pages)", index, page_count);

        let result = source
            .page(index)
            .and_then(|page| self.classifier.classify(&page));

        match result {
            Ok(orientation) => {
                log::info!("Detected layout: {} ({})", orientation, self.classifier.name());
                orientation
            },
            Err(e) => {
                log::warn!(
                    "Layout classification failed on page {}: {}. Defaulting to {}",
                    index,
                    e,
                    PageOrientation::default()
                );
                PageOrientation::default()
            },
        }
    }

    /// Process every page of a document.
    ///
    /// Fails only when the source has no pages.
    pub fn process<S: PageSource + ?Sized>(&self, source: &S) -> Result<DocumentRegions> {
        let page_count = source.page_count();
        if page_count == 0 {
            log::error!("No pages found; nothing to process");
            return Err(Error::NoPages);
        }

        let orientation = self.decide_orientation(source);
        let strategy = create_strategy(orientation);
        log::debug!("Using {} for {} pages", strategy.name(), page_count);

        let mut pages = BTreeMap::new();
        let mut metrics = Vec::with_capacity(page_count);

        for index in 0..page_count {
            let started = Instant::now();
            let mut page_metrics = PageMetrics::new(index);

            let regions = match source.page(index) {
                Ok(page) => self.process_page(index, &page, strategy.as_ref(), &mut page_metrics),
                Err(e) => {
                    log::warn!("Skipping page {}: failed to load: {}", index, e);
                    page_metrics.detection_failed = true;
                    Vec::new()
                },
            };

            page_metrics.elapsed = started.elapsed();
            log::debug!(
                "Page {}: {} detected, {} kept, {} regions in {:?}",
                index,
                page_metrics.detected,
                page_metrics.kept,
                regions.len(),
                page_metrics.elapsed
            );
            pages.insert(index, regions);
            metrics.push(page_metrics);
        }

        let output = DocumentRegions {
            orientation,
            dpi: self.config.dpi,
            pages,
            metrics,
        };

        let summary = output.summary();
        log::info!(
            "Processing complete: {} pages, {} regions ({} filtered, {} degenerate, {} failed pages)",
            summary.pages,
            output.total_regions(),
            summary.filtered,
            summary.degenerate,
            summary.failed_pages
        );

        Ok(output)
    }

    /// Detect, order, crop and normalize one page.
    fn process_page(
        &self,
        index: usize,
        page: &DynamicImage,
        strategy: &dyn ReadingOrderStrategy,
        metrics: &mut PageMetrics,
    ) -> Vec<NormalizedRegion> {
        let detected = match self.detector.detect(page) {
            Ok(boxes) => boxes,
            Err(e) => {
                log::warn!("Skipping page {} ({}): {}", index, self.detector.name(), e);
                metrics.detection_failed = true;
                return Vec::new();
            },
        };

        metrics.detected = detected.len();
        let kept = filter_by_confidence(detected, self.config.confidence_threshold);
        metrics.kept = kept.len();
        metrics.filtered = metrics.detected - metrics.kept;

        if kept.is_empty() {
            log::debug!("Page {} has no regions above confidence threshold", index);
        }

        let ordered = strategy.apply(kept);

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.on_page(index, page, &ordered) {
                log::warn!("Page sink failed on page {}: {}", index, e);
            }
        }

        let mut regions = Vec::with_capacity(ordered.len());
        for region in ordered {
            let crop = extract(page, &region.bbox, self.config.padding_y);
            let normalized = self.config.normalizer.normalize(&crop.image);

            if normalized.status == NormalizeStatus::Degenerate {
                metrics.degenerate += 1;
                log::warn!(
                    "Degenerate crop on page {} region {}: {}x{}, rescale skipped",
                    index,
                    region.rank,
                    crop.rect.width(),
                    crop.rect.height()
                );
            }

            regions.push(NormalizedRegion {
                page_index: index,
                rank: region.rank,
                bbox: region.bbox,
                crop_rect: crop.rect,
                image: normalized.image,
                status: normalized.status,
            });
        }

        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{FixedClassifier, FixedDetector};
    use crate::source::InMemorySource;

    fn blank_pages(n: usize) -> InMemorySource {
        InMemorySource::new(
            (0..n)
                .map(|_| DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 150, image::Luma([230]))))
                .collect(),
        )
    }

    fn pipeline(detector: FixedDetector, classifier: FixedClassifier) -> RegionPipeline {
        RegionPipeline::new(PipelineConfig::default(), Box::new(detector), Box::new(classifier))
            .unwrap()
    }

    #[test]
    fn test_representative_page() {
        assert_eq!(representative_page(1), 0);
        assert_eq!(representative_page(4), 2);
        assert_eq!(representative_page(5), 2);
    }

    #[test]
    fn test_filter_by_confidence_keeps_boundary() {
        let boxes = vec![
            BoundingBox::new(0.0, 0.0, 1.0, 1.0, 0.70),
            BoundingBox::new(0.0, 0.0, 1.0, 1.0, 0.69),
        ];
        let kept = filter_by_confidence(boxes, 0.70);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.70);
    }

    #[test]
    fn test_no_pages_is_fatal() {
        let p = pipeline(FixedDetector::default(), FixedClassifier::new(PageOrientation::SingleColumn));
        assert!(matches!(p.process(&InMemorySource::default()), Err(Error::NoPages)));
    }

    #[test]
    fn test_classification_failure_falls_back() {
        let p = pipeline(FixedDetector::default(), FixedClassifier::failing("timeout"));
        assert_eq!(p.decide_orientation(&blank_pages(3)), PageOrientation::SingleColumn);
    }

    #[test]
    fn test_empty_pages_keep_their_entry() {
        let p = pipeline(FixedDetector::default(), FixedClassifier::new(PageOrientation::DoubleColumn));
        let out = p.process(&blank_pages(3)).unwrap();
        assert_eq!(out.page_count(), 3);
        assert!(out.pages.values().all(Vec::is_empty));
        assert_eq!(out.orientation, PageOrientation::DoubleColumn);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig::new().with_confidence_threshold(-0.1);
        let result = RegionPipeline::new(
            config,
            Box::new(FixedDetector::default()),
            Box::new(FixedClassifier::new(PageOrientation::SingleColumn)),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
