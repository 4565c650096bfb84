//! Page numbering in pipeline log output.

use std::sync::Mutex;

use folio_regions::geometry::BoundingBox;
use folio_regions::pipeline::{PipelineConfig, RegionPipeline};
use folio_regions::services::{FixedClassifier, FixedDetector};
use folio_regions::source::InMemorySource;
use image::{DynamicImage, Rgb, RgbImage};
use log::{Level, LevelFilter, Log, Metadata, Record};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("folio_regions") {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

fn warnings() -> Vec<String> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, message)| message.to_lowercase())
        .collect()
}

#[test]
fn test_logged_page_numbers_are_zero_based() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let pages: Vec<DynamicImage> = (0..5)
        .map(|_| DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([240, 240, 240]))))
        .collect();
    let detector = FixedDetector::new(vec![BoundingBox::new(10.0, 10.0, 60.0, 30.0, 0.9)])
        .with_failure(3, "model unavailable");
    let p = RegionPipeline::new(
        PipelineConfig::default(),
        Box::new(detector),
        Box::new(FixedClassifier::failing("request timed out")),
    )
    .unwrap();

    let out = p.process(&InMemorySource::new(pages)).unwrap();
    assert!(out.metrics[3].detection_failed);

    let warnings = warnings();
    let classification: Vec<&String> = warnings
        .iter()
        .filter(|m| m.contains("classification failed"))
        .collect();
    let detection: Vec<&String> = warnings
        .iter()
        .filter(|m| m.contains("detection failed"))
        .collect();

    assert_eq!(classification.len(), 1);
    assert!(classification[0].contains("page 2:"), "{}", classification[0]);
    assert_eq!(detection.len(), 1);
    assert!(detection[0].contains("page 3 "), "{}", detection[0]);
    assert!(warnings.iter().all(|m| !m.contains("page 4")));
}
