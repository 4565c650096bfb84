//! Configuration for the region pipeline.
//!
//! Passed to [`RegionPipeline`](crate::pipeline::RegionPipeline) at
//! construction; nothing here is process-wide state.

use crate::error::{Error, Result};
use crate::regions::RegionNormalizer;

/// Default minimum detector confidence.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.70;
/// Default vertical padding applied to each crop, in pixels.
pub const DEFAULT_PADDING_Y: u32 = 10;
/// Default page rasterization resolution.
pub const DEFAULT_DPI: f32 = 300.0;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Boxes below this confidence are discarded before ordering.
    pub confidence_threshold: f32,

    /// Pixels added above and below every box before cropping.
    pub padding_y: u32,

    /// Resolution the page source rasterized pages at.
    ///
    /// Does not influence ordering; used to map crop rectangles back to
    /// PDF points.
    pub dpi: f32,

    /// Crop normalization parameters.
    pub normalizer: RegionNormalizer,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            padding_y: DEFAULT_PADDING_Y,
            dpi: DEFAULT_DPI,
            normalizer: RegionNormalizer::default(),
        }
    }
}

impl PipelineConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the vertical padding.
    pub fn with_padding_y(mut self, padding: u32) -> Self {
        self.padding_y = padding;
        self
    }

    /// Set the rasterization DPI.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the normalizer parameters.
    pub fn with_normalizer(mut self, normalizer: RegionNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "confidence threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::InvalidConfig(format!("dpi must be positive, got {}", self.dpi)));
        }
        if self.normalizer.target_height == 0 {
            return Err(Error::InvalidConfig("target height must be positive".to_string()));
        }
        let block = self.normalizer.block_size;
        if block < 3 || block % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "threshold window must be odd and >= 3, got {}",
                block
            )));
        }
        if !(self.normalizer.denoise_strength.is_finite() && self.normalizer.denoise_strength >= 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "denoise strength must be non-negative, got {}",
                self.normalizer.denoise_strength
            )));
        }
        Ok(())
    }
}
