//! Network-backed detector and orientation classifier.
//!
//! Both use a blocking `reqwest` client whose timeout bounds every call, so
//! a slow service surfaces as an error instead of stalling the run.

use std::time::Duration;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::layout::PageOrientation;
use crate::source::encode_png_base64;

use super::{OrientationClassifier, RegionDetector};

// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 512;

const LAYOUT_PROMPT: &str = "Look at the document page image provided and determine the page layout.\n\
\n\
Classify whether the page has:\n\
- \"single_column\": text/content is arranged in a regular line by line layout.\n\
- \"double_column\": text/content is arranged in two columns (side by side).\n\
\n\
Respond with a JSON object matching this exact format:\n\
{\"page_orientation\": \"single_column\" | \"double_column\"}";

fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder().timeout(timeout).build()?)
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let mut body = response.text().unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(Error::Service { status, body })
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    bboxes: Vec<DetectedBox>,
}

#[derive(Deserialize)]
struct DetectedBox {
    bbox: [f32; 4],
    confidence: f32,
}

/// Region detector served over HTTP.
///
/// Sends `{"image": "<base64 PNG>"}` and expects
/// `{"bboxes": [{"bbox": [x1, y1, x2, y2], "confidence": c}, ...]}`.
/// Boxes with inverted edges or out-of-range confidence are dropped.
#[derive(Debug, Clone)]
pub struct HttpRegionDetector {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpRegionDetector {
    /// Create a detector for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: build_client(timeout)?,
        })
    }

    /// Create a detector from service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let url = config.detector_url.clone().ok_or_else(|| {
            Error::InvalidConfig("no region detector endpoint configured".to_string())
        })?;
        Self::new(url, config.timeout)
    }
}

impl RegionDetector for HttpRegionDetector {
    fn detect(&self, page: &DynamicImage) -> Result<Vec<BoundingBox>> {
        let encoded = encode_png_base64(page)?;
        let response = self
            .client
            .post(&self.url)
            .json(&DetectRequest { image: &encoded })
            .send()?;
        let parsed: DetectResponse = check_status(response)?.json()?;

        let total = parsed.bboxes.len();
        let boxes: Vec<BoundingBox> = parsed
            .bboxes
            .into_iter()
            .map(|d| BoundingBox::new(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3], d.confidence))
            .filter(|b| b.is_valid())
            .collect();

        if boxes.len() < total {
            log::warn!("Dropped {} malformed boxes from detector response", total - boxes.len());
        }
        Ok(boxes)
    }

    fn name(&self) -> &'static str {
        "HttpRegionDetector"
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: &'a str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct PageInformation {
    page_orientation: PageOrientation,
}

/// Orientation classifier backed by a vision-language model behind the
/// Ollama chat API.
#[derive(Debug, Clone)]
pub struct OllamaOrientationClassifier {
    host: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl OllamaOrientationClassifier {
    /// Create a classifier from service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            api_key: config.ollama_api_key.clone(),
            client: build_client(config.timeout)?,
        })
    }
}

impl OrientationClassifier for OllamaOrientationClassifier {
    fn classify(&self, page: &DynamicImage) -> Result<PageOrientation> {
        let encoded = encode_png_base64(page)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: LAYOUT_PROMPT,
                images: vec![encoded],
            }],
            stream: false,
            format: "json",
        };

        let mut builder = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let reply: ChatResponse = check_status(builder.send()?)?.json()?;
        parse_orientation_reply(&reply.message.content)
    }

    fn name(&self) -> &'static str {
        "OllamaOrientationClassifier"
    }
}

/// Parse a model reply into an orientation.
///
/// The reply may wrap its JSON object in prose or a code fence; the text
/// between the first `{` and the last `}` is parsed.
pub fn parse_orientation_reply(reply: &str) -> Result<PageOrientation> {
    let json = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(Error::Classification(format!(
                "no JSON object in model reply: {:?}",
                reply
            )))
        },
    };

    serde_json::from_str::<PageInformation>(json)
        .map(|info| info.page_orientation)
        .map_err(|e| Error::Classification(format!("malformed model reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_reply() {
        let reply = r#"{"page_orientation": "double_column"}"#;
        assert_eq!(parse_orientation_reply(reply).unwrap(), PageOrientation::DoubleColumn);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "```json\n{\"page_orientation\": \"single_column\"}\n```";
        assert_eq!(parse_orientation_reply(reply).unwrap(), PageOrientation::SingleColumn);
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let reply = r#"{"page_orientation": "three_column"}"#;
        assert!(matches!(parse_orientation_reply(reply), Err(Error::Classification(_))));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_orientation_reply("It looks like two columns.").is_err());
    }

    #[test]
    fn test_detector_requires_endpoint() {
        let config = ServiceConfig::new();
        assert!(matches!(
            HttpRegionDetector::from_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_detect_response_shape() {
        let body = r#"{"bboxes": [{"bbox": [1.0, 2.0, 30.0, 40.0], "confidence": 0.8}]}"#;
        let parsed: DetectResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.bboxes.len(), 1);
        assert_eq!(parsed.bboxes[0].bbox, [1.0, 2.0, 30.0, 40.0]);
        assert_eq!(parsed.bboxes[0].confidence, 0.8);
    }
}
