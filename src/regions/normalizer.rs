//! Recognition-ready normalization of region crops.
//!
//! Every crop goes through the same fixed sequence:
//!
//! ```text
//! Crop (any color mode)
//!     ↓ grayscale (BT.601 luma, integer weights)
//!     ↓ non-local means denoising (h = 10, 7x7 patches, 21x21 search)
//!     ↓ adaptive Gaussian threshold (11x11 window, offset 2) → {0, 255}
//!     ↓ rescale to 120 px height, Catmull-Rom (cubic) kernel
//!     ↓ dilation with a 1x1 structuring element
//! GrayImage
//! ```
//!
//! A crop with zero height or width skips the rescale and is reported as
//! [`NormalizeStatus::Degenerate`] instead of failing.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

/// Fixed output height of normalized regions.
pub const TARGET_HEIGHT: u32 = 120;
/// Non-local means filter strength.
pub const DENOISE_STRENGTH: f32 = 10.0;
/// Side of the local window used by the adaptive threshold.
pub const THRESHOLD_BLOCK_SIZE: u32 = 11;
/// Constant subtracted from the local Gaussian mean.
pub const THRESHOLD_OFFSET: i32 = 2;

const TEMPLATE_WINDOW: u32 = 7;
const SEARCH_WINDOW: u32 = 21;
// Weights below this contribute nothing
const WEIGHT_CUTOFF: f64 = 0.001;

/// Whether a crop could be rescaled to the target height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStatus {
    /// Full pipeline applied; height equals the target.
    Rescaled,
    /// Zero-height or zero-width crop; rescale skipped.
    Degenerate,
}

/// A normalized single-channel image.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Binarized, rescaled, dilated pixels.
    pub image: GrayImage,
    /// Outcome of the rescale step.
    pub status: NormalizeStatus,
}

/// Parameters of the normalization sequence.
///
/// The defaults are the production values; they are exposed so tests and
/// callers with different recognizers can tune them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionNormalizer {
    /// Non-local means filter strength `h`.
    pub denoise_strength: f32,
    /// Adaptive threshold window side (odd, >= 3).
    pub block_size: u32,
    /// Constant subtracted from the local mean.
    pub offset: i32,
    /// Output height in pixels.
    pub target_height: u32,
    /// Dilation radius (0 = 1x1 structuring element).
    pub dilation_radius: u8,
}

impl Default for RegionNormalizer {
    fn default() -> Self {
        Self {
            denoise_strength: DENOISE_STRENGTH,
            block_size: THRESHOLD_BLOCK_SIZE,
            offset: THRESHOLD_OFFSET,
            target_height: TARGET_HEIGHT,
            dilation_radius: 0,
        }
    }
}

impl RegionNormalizer {
    /// Create a normalizer with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output height.
    pub fn with_target_height(mut self, height: u32) -> Self {
        self.target_height = height;
        self
    }

    /// Set the denoising strength (0 disables denoising).
    pub fn with_denoise_strength(mut self, strength: f32) -> Self {
        self.denoise_strength = strength;
        self
    }

    /// Run the full normalization sequence on a crop.
    pub fn normalize(&self, crop: &DynamicImage) -> NormalizedImage {
        let gray = to_grayscale(crop);
        let denoised = denoise_nl_means(&gray, self.denoise_strength);
        let binary = adaptive_threshold_gaussian(&denoised, self.block_size, self.offset);

        let (scaled, status) = match rescale_to_height(&binary, self.target_height) {
            Some(scaled) => (scaled, NormalizeStatus::Rescaled),
            None => (binary, NormalizeStatus::Degenerate),
        };

        let image = if scaled.width() == 0 || scaled.height() == 0 {
            scaled
        } else {
            dilate(&scaled, Norm::LInf, self.dilation_radius)
        };

        NormalizedImage { image, status }
    }
}

/// Normalize a crop with the production parameters.
pub fn normalize(crop: &DynamicImage) -> NormalizedImage {
    RegionNormalizer::default().normalize(crop)
}

/// Convert to 8-bit grayscale.
///
/// Color input uses the BT.601 weights in 14-bit fixed point
/// (`Y = (4899 R + 9617 G + 1868 B + 8192) >> 14`); alpha is ignored.
/// Grayscale input only has its bit depth adjusted.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        img if img.color().has_color() => {
            let rgb = img.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                let luma = (4899 * u32::from(r) + 9617 * u32::from(g) + 1868 * u32::from(b) + 8192)
                    >> 14;
                Luma([luma.min(255) as u8])
            })
        },
        img => img.to_luma8(),
    }
}

/// Non-local means weights indexed by the summed squared patch difference.
///
/// Pixel values are integers, so every patch sum is a whole number and the
/// lookup is exact. Sums past the end of the table weigh less than
/// `WEIGHT_CUTOFF` and are skipped without evaluating `exp`.
struct WeightTable {
    weights: Vec<f64>,
}

impl WeightTable {
    fn new(h: f32, area: u32) -> Self {
        let scale = f64::from(area) * f64::from(h) * f64::from(h);
        // exp(-s / scale) >= cutoff  <=>  s <= scale * ln(1 / cutoff)
        let max_sum = (scale * (1.0 / WEIGHT_CUTOFF).ln()).floor();
        let max_possible = f64::from(area) * 255.0 * 255.0;
        let max_sum = max_sum.min(max_possible) as usize;
        let weights = (0..=max_sum)
            .map(|s| (-(s as f64) / scale).exp())
            .collect();
        Self { weights }
    }

    fn len(&self) -> usize {
        self.weights.len()
    }

    fn weight(&self, patch_sum: u64) -> Option<f64> {
        usize::try_from(patch_sum)
            .ok()
            .and_then(|i| self.weights.get(i))
            .copied()
    }
}

/// Non-local means denoising for grayscale images.
///
/// Each output pixel is the weighted mean of the pixels in a 21x21 search
/// window, weighted by `exp(-d / h²)` where `d` is the mean squared
/// difference between the 7x7 patches around the two pixels. Patch distances
/// are evaluated per search offset through an integral image, so the cost is
/// independent of the patch size. Borders are mirrored without repeating the
/// edge pixel.
pub fn denoise_nl_means(src: &GrayImage, h: f32) -> GrayImage {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 || h.is_nan() || h <= 0.0 {
        return src.clone();
    }

    let tr = (TEMPLATE_WINDOW / 2) as usize;
    let sr = (SEARCH_WINDOW / 2) as usize;
    let pad = tr + sr;
    let (w, hgt) = (width as usize, height as usize);
    let pw = w + 2 * pad;
    let ph = hgt + 2 * pad;

    let mut padded = vec![0i32; pw * ph];
    for py in 0..ph {
        let sy = reflect_101(py as i64 - pad as i64, hgt);
        for px in 0..pw {
            let sx = reflect_101(px as i64 - pad as i64, w);
            padded[py * pw + px] = i32::from(src.get_pixel(sx as u32, sy as u32)[0]);
        }
    }

    // Patch windows for all pixels span this region, offset by `sr` in the padded buffer
    let dw = w + 2 * tr;
    let dh = hgt + 2 * tr;
    let iw = dw + 1;
    let mut integral = vec![0u64; iw * (dh + 1)];

    let table = WeightTable::new(h, TEMPLATE_WINDOW * TEMPLATE_WINDOW);
    let side = 2 * tr + 1;

    let mut weight_sum = vec![0f64; w * hgt];
    let mut value_sum = vec![0f64; w * hgt];

    for dy in -(sr as i64)..=(sr as i64) {
        for dx in -(sr as i64)..=(sr as i64) {
            for y in 0..dh {
                let mut row_acc = 0u64;
                let base = (y + sr) * pw + sr;
                let shifted = ((y + sr) as i64 + dy) as usize * pw;
                for x in 0..dw {
                    let diff = padded[base + x] - padded[shifted + ((x + sr) as i64 + dx) as usize];
                    row_acc += (diff * diff) as u64;
                    integral[(y + 1) * iw + x + 1] = integral[y * iw + x + 1] + row_acc;
                }
            }

            for y in 0..hgt {
                for x in 0..w {
                    let patch = (integral[(y + side) * iw + x + side] + integral[y * iw + x])
                        - (integral[y * iw + x + side] + integral[(y + side) * iw + x]);
                    let Some(weight) = table.weight(patch) else {
                        continue;
                    };
                    let sy = ((y + pad) as i64 + dy) as usize;
                    let sx = ((x + pad) as i64 + dx) as usize;
                    weight_sum[y * w + x] += weight;
                    value_sum[y * w + x] += weight * f64::from(padded[sy * pw + sx]);
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let i = y as usize * w + x as usize;
        // The zero offset always contributes weight 1
        let v = value_sum[i] / weight_sum[i];
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Adaptive threshold against a Gaussian-weighted local mean.
///
/// A pixel becomes white (255) when `src - mean > -offset`, black (0)
/// otherwise. The mean uses a `block_size` x `block_size` Gaussian window
/// with `sigma = 0.3 * ((block_size - 1) / 2 - 1) + 0.8` and replicated
/// borders, rounded to whole intensities.
pub fn adaptive_threshold_gaussian(src: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return src.clone();
    }

    let kernel = gaussian_kernel(block_size);
    let mean = gaussian_blur_replicate(src, &kernel);

    GrayImage::from_fn(width, height, |x, y| {
        let i = (y * width + x) as usize;
        let m = mean[i].round().clamp(0.0, 255.0) as i32;
        let v = i32::from(src.get_pixel(x, y)[0]);
        if v - m > -offset {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Uniformly rescale so the height equals `target_height`.
///
/// Returns `None` for images without pixels.
pub fn rescale_to_height(src: &GrayImage, target_height: u32) -> Option<GrayImage> {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let scale = f64::from(target_height) / f64::from(height);
    let new_width = (f64::from(width) * scale).round().max(1.0) as u32;
    Some(imageops::resize(src, new_width, target_height, FilterType::CatmullRom))
}

fn gaussian_kernel(size: u32) -> Vec<f64> {
    let size = size.max(1);
    let sigma = 0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (f64::from(size) - 1.0) / 2.0;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = f64::from(i) - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|v| v / total).collect()
}

/// Separable blur kept in floating point, replicating edge pixels.
fn gaussian_blur_replicate(src: &GrayImage, kernel: &[f64]) -> Vec<f64> {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let r = (kernel.len() / 2) as i64;
    let clamp = |v: i64, n: usize| v.clamp(0, n as i64 - 1) as usize;

    let mut horizontal = vec![0f64; w * h];
    for y in 0..h {
        for x in 0..w {
            horizontal[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, kv)| {
                    let sx = clamp(x as i64 + k as i64 - r, w);
                    kv * f64::from(src.get_pixel(sx as u32, y as u32)[0])
                })
                .sum();
        }
    }

    let mut out = vec![0f64; w * h];
    for y in 0..h {
        for x in 0..w {
            out[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, kv)| kv * horizontal[clamp(y as i64 + k as i64 - r, h) * w + x])
                .sum();
        }
    }
    out
}

/// Mirror an out-of-range index back into `[0, n)` without repeating the edge.
fn reflect_101(mut i: i64, n: usize) -> usize {
    let n = n as i64;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}
