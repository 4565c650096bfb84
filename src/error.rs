//! Error types for the region pipeline.
//!
//! Only [`Error::NoPages`] and [`Error::InvalidConfig`] abort a document run.
//! Every other variant is raised by a single page, box, or service call and
//! is recovered by the orchestrator.

/// Result type alias for region pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ordering and extracting regions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page source yielded no pages at all
    #[error("No pages found in input")]
    NoPages,

    /// Page index outside the page source
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested page index
        index: usize,
        /// Number of pages in the source
        count: usize,
    },

    /// Region detector failed for a page
    #[error("Region detection failed: {0}")]
    Detection(String),

    /// Orientation classifier failed or returned an unusable answer
    #[error("Orientation classification failed: {0}")]
    Classification(String),

    /// Remote service answered with a non-success status
    #[error("Service error ({status}): {body}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Image decoding, encoding, or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error (includes timeouts)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unsupported input or feature
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pages_error() {
        let msg = format!("{}", Error::NoPages);
        assert!(msg.contains("No pages"));
    }

    #[test]
    fn test_detection_error() {
        let err = Error::Detection("model unavailable".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("detection failed"));
        assert!(msg.contains("model unavailable"));
    }

    #[test]
    fn test_page_out_of_range_error() {
        let err = Error::PageOutOfRange { index: 7, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("Page 7"));
        assert!(msg.contains("3 pages"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
