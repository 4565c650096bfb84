//! Debug visualizer for rendering pages with their ordered region outlines.

use std::path::PathBuf;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::error::Result;
use crate::pipeline::{OrderedRegion, PipelineConfig};
use crate::regions::crop_rect;

use super::PageSink;

/// Options for debug visualization.
#[derive(Debug, Clone)]
pub struct DebugOptions {
    /// Outline color
    pub color: Rgb<u8>,
    /// Outline thickness in pixels
    pub line_width: u32,
    /// Vertical padding; replaced by the pipeline's own padding when the
    /// visualizer is installed with `RegionPipeline::with_sink`
    pub padding_y: u32,
    /// Whether to mark each region with rank ticks above its top-left corner
    pub mark_ranks: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            color: Rgb([255, 0, 0]),
            line_width: 2,
            padding_y: crate::pipeline::config::DEFAULT_PADDING_Y,
            mark_ranks: true,
        }
    }
}

/// Draw padded region outlines onto a copy of the page.
///
/// Outlines match the crop rectangles exactly. With `mark_ranks`, region `n`
/// gets `n` small ticks above its top-left corner (capped at 20).
pub fn draw_ordered_regions(
    page: &DynamicImage,
    regions: &[OrderedRegion],
    options: &DebugOptions,
) -> RgbImage {
    let mut canvas = page.to_rgb8();
    let (width, height) = canvas.dimensions();

    for region in regions {
        let rect = crop_rect(width, height, &region.bbox, options.padding_y);
        if rect.is_empty() {
            continue;
        }

        for inset in 0..options.line_width {
            let w = rect.width().saturating_sub(2 * inset);
            let h = rect.height().saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            let outline = Rect::at((rect.x1 + inset) as i32, (rect.y1 + inset) as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut canvas, outline, options.color);
        }

        if options.mark_ranks {
            for tick in 0..region.rank.min(20) as i32 {
                let tick_rect = Rect::at(rect.x1 as i32 + tick * 6, rect.y1 as i32 - 8).of_size(4, 6);
                draw_filled_rect_mut(&mut canvas, tick_rect, options.color);
            }
        }
    }

    canvas
}

/// Page sink writing annotated pages as `page_XXXX.png`.
pub struct DebugVisualizer {
    output_dir: PathBuf,
    options: DebugOptions,
}

impl DebugVisualizer {
    /// Create a visualizer writing into `output_dir` (created if missing).
    pub fn new(output_dir: impl Into<PathBuf>, options: DebugOptions) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            options,
        })
    }
}

impl PageSink for DebugVisualizer {
    fn configure(&mut self, config: &PipelineConfig) {
        self.options.padding_y = config.padding_y;
    }

    fn on_page(
        &self,
        page_index: usize,
        page: &DynamicImage,
        regions: &[OrderedRegion],
    ) -> Result<()> {
        let canvas = draw_ordered_regions(page, regions, &self.options);
        let path = self.output_dir.join(format!("page_{:04}.png", page_index + 1));
        canvas.save(&path)?;
        log::debug!("Wrote debug page {}", path.display());
        Ok(())
    }
}
