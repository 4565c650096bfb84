//! Page sources.
//!
//! Rasterizing PDFs happens outside this crate; a [`PageSource`] only hands
//! out page images in document order.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// An ordered sequence of page images.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Load page `index` (0-based).
    fn page(&self, index: usize) -> Result<DynamicImage>;
}

/// Pages held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pages: Vec<DynamicImage>,
}

impl InMemorySource {
    /// Wrap already-decoded pages.
    pub fn new(pages: Vec<DynamicImage>) -> Self {
        Self { pages }
    }
}

impl PageSource for InMemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<DynamicImage> {
        self.pages.get(index).cloned().ok_or(Error::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }
}

/// Pages read lazily from image files.
///
/// Opened from a single image or a directory; directory pages are taken in
/// file-name order, so `page_001.png, page_002.png, ...` keeps document order.
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
}

impl ImageFileSource {
    /// Open an image file or a directory of image files.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && is_image_path(p))
                .collect();
            paths.sort();
            log::info!("Found {} page images in {}", paths.len(), path.display());
            return Ok(Self { paths });
        }

        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input not found: {}", path.display()),
            )));
        }

        if has_extension(path, "pdf") {
            return Err(Error::Unsupported(format!(
                "{}: rasterize PDF pages to images before processing",
                path.display()
            )));
        }

        if !is_image_path(path) {
            return Err(Error::Unsupported(format!(
                "{}: not a supported image type",
                path.display()
            )));
        }

        Ok(Self {
            paths: vec![path.to_path_buf()],
        })
    }

    /// Paths of the pages, in document order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl PageSource for ImageFileSource {
    fn page_count(&self) -> usize {
        self.paths.len()
    }

    fn page(&self, index: usize) -> Result<DynamicImage> {
        let path = self.paths.get(index).ok_or(Error::PageOutOfRange {
            index,
            count: self.paths.len(),
        })?;
        Ok(image::open(path)?)
    }
}

/// Encode an image as base64 PNG for transport to remote services.
pub fn encode_png_base64(image: &DynamicImage) -> Result<String> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buf))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn is_image_path(path: &Path) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}
