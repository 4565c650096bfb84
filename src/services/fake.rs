//! Deterministic collaborators for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::DynamicImage;

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::layout::PageOrientation;

use super::{OrientationClassifier, RegionDetector};

/// Scripted detector output for one call.
#[derive(Debug, Clone)]
enum Scripted {
    Boxes(Vec<BoundingBox>),
    Fail(String),
}

/// Detector that replays scripted results in call order.
///
/// Call `n` (0-based) returns the script registered for `n`, or the default
/// boxes when nothing was registered. Scripts follow calls, not page indices:
/// a page that fails to load is never passed to the detector, so every later
/// page is served the script one position earlier.
#[derive(Debug, Default)]
pub struct FixedDetector {
    default: Vec<BoundingBox>,
    scripts: HashMap<usize, Scripted>,
    calls: AtomicUsize,
}

impl FixedDetector {
    /// Return the same boxes for every page.
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self {
            default: boxes,
            ..Default::default()
        }
    }

    /// Return `boxes` on call `call`.
    pub fn with_page(mut self, call: usize, boxes: Vec<BoundingBox>) -> Self {
        self.scripts.insert(call, Scripted::Boxes(boxes));
        self
    }

    /// Fail on call `call`.
    pub fn with_failure(mut self, call: usize, reason: impl Into<String>) -> Self {
        self.scripts.insert(call, Scripted::Fail(reason.into()));
        self
    }

    /// Number of `detect` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegionDetector for FixedDetector {
    fn detect(&self, _page: &DynamicImage) -> Result<Vec<BoundingBox>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(&call) {
            Some(Scripted::Boxes(boxes)) => Ok(boxes.clone()),
            Some(Scripted::Fail(reason)) => Err(Error::Detection(reason.clone())),
            None => Ok(self.default.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "FixedDetector"
    }
}

/// Classifier with a fixed answer.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    answer: std::result::Result<PageOrientation, String>,
}

impl FixedClassifier {
    /// Always answer `orientation`.
    pub fn new(orientation: PageOrientation) -> Self {
        Self {
            answer: Ok(orientation),
        }
    }

    /// Always fail with `reason` (e.g. a simulated timeout).
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(reason.into()),
        }
    }
}

impl OrientationClassifier for FixedClassifier {
    fn classify(&self, _page: &DynamicImage) -> Result<PageOrientation> {
        self.answer.clone().map_err(Error::Classification)
    }

    fn name(&self) -> &'static str {
        "FixedClassifier"
    }
}
