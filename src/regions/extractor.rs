//! Padded, page-clipped region cropping.

use image::{DynamicImage, GenericImageView};

use crate::geometry::{BoundingBox, PixelRect};

/// A rectangular sub-image of a page.
#[derive(Debug, Clone)]
pub struct Crop {
    /// Rectangle the crop was taken from, in page pixels.
    pub rect: PixelRect,
    /// The cropped pixels (a copy; the page is never modified).
    pub image: DynamicImage,
}

impl Crop {
    /// True when the crop covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.rect.is_empty()
    }
}

/// Compute the crop rectangle for a box on a `page_width` x `page_height` page.
///
/// Coordinates are truncated to whole pixels, the vertical extent grows by
/// `pad_y` on each side, and the result is clipped to the page. The
/// horizontal extent is not padded; it is only clipped so the rectangle can
/// never leave the page.
///
/// # Examples
///
/// ```
/// use folio_regions::geometry::{BoundingBox, PixelRect};
/// use folio_regions::regions::crop_rect;
///
/// let bbox = BoundingBox::new(10.0, 20.0, 110.0, 70.0, 0.9);
/// assert_eq!(crop_rect(800, 500, &bbox, 10), PixelRect::new(10, 10, 110, 80));
/// ```
pub fn crop_rect(page_width: u32, page_height: u32, bbox: &BoundingBox, pad_y: u32) -> PixelRect {
    let pad = i64::from(pad_y);
    let clip = |v: i64, max: u32| v.clamp(0, i64::from(max)) as u32;

    let x1 = bbox.x1 as i64;
    let y1 = bbox.y1 as i64;
    let x2 = bbox.x2 as i64;
    let y2 = bbox.y2 as i64;

    PixelRect::new(
        clip(x1, page_width),
        clip(y1 - pad, page_height),
        clip(x2, page_width),
        clip(y2 + pad, page_height),
    )
}

/// Crop a box out of a page with vertical padding.
pub fn extract(page: &DynamicImage, bbox: &BoundingBox, pad_y: u32) -> Crop {
    let (width, height) = page.dimensions();
    let rect = crop_rect(width, height, bbox, pad_y);
    let image = page.crop_imm(rect.x1, rect.y1, rect.width(), rect.height());
    Crop { rect, image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn page(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
            Luma([((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn test_padding_applied_vertically_only() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 70.0, 0.9);
        let crop = extract(&page(200, 500), &bbox, 10);
        assert_eq!(crop.rect, PixelRect::new(10, 10, 110, 80));
        assert_eq!(crop.image.dimensions(), (100, 70));
    }

    #[test]
    fn test_padding_clipped_at_page_edges() {
        let bbox = BoundingBox::new(0.0, 3.0, 50.0, 98.0, 0.9);
        let rect = crop_rect(100, 100, &bbox, 25);
        assert_eq!(rect.y1, 0);
        assert_eq!(rect.y2, 100);
    }

    #[test]
    fn test_coordinates_truncated() {
        let bbox = BoundingBox::new(10.9, 20.7, 30.2, 40.99, 0.9);
        let rect = crop_rect(100, 100, &bbox, 0);
        assert_eq!(rect, PixelRect::new(10, 20, 30, 40));
    }

    #[test]
    fn test_out_of_range_detector_coordinates() {
        let bbox = BoundingBox::new(-5.0, -20.0, 140.0, 130.0, 0.9);
        let crop = extract(&page(120, 100), &bbox, 10);
        assert_eq!(crop.rect, PixelRect::new(0, 0, 120, 100));
    }

    #[test]
    fn test_box_below_page_is_degenerate() {
        let bbox = BoundingBox::new(10.0, 300.0, 50.0, 340.0, 0.9);
        let crop = extract(&page(100, 100), &bbox, 10);
        assert!(crop.is_degenerate());
        assert_eq!(crop.image.height(), 0);
    }

    #[test]
    fn test_crop_copies_pixels() {
        let src = page(64, 64);
        let bbox = BoundingBox::new(5.0, 10.0, 20.0, 30.0, 0.9);
        let crop = extract(&src, &bbox, 2);
        let gray = crop.image.to_luma8();
        assert_eq!(gray.get_pixel(0, 0), &Luma([(5 + 8) as u8]));
    }
}
