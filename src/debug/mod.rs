//! Debug visualization of reading order.
//!
//! Visualization is a sink: it receives each page's ordered regions after
//! ordering and never feeds anything back into the pipeline. Nothing is
//! drawn unless a sink is installed on the pipeline.

mod visualizer;

pub use visualizer::{draw_ordered_regions, DebugOptions, DebugVisualizer};

use image::DynamicImage;

use crate::error::Result;
use crate::pipeline::{OrderedRegion, PipelineConfig};

/// Receives every page together with its ordered regions.
pub trait PageSink: Send + Sync {
    /// Called once when the sink is installed on a pipeline.
    fn configure(&mut self, _config: &PipelineConfig) {}

    /// Called once per page, after ordering and before cropping.
    fn on_page(&self, page_index: usize, page: &DynamicImage, regions: &[OrderedRegion])
        -> Result<()>;
}
