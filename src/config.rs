//! Configuration for the network-backed collaborators.

use std::time::Duration;

/// Default orientation service host.
pub const DEFAULT_OLLAMA_HOST: &str = "https://ollama.com";
/// Default vision-language model used for orientation classification.
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen3-vl:235b";
/// Default timeout for every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable holding the orientation service API key.
pub const ENV_OLLAMA_API_KEY: &str = "OLLAMA_API";
/// Environment variable overriding the orientation service host.
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
/// Environment variable overriding the orientation model.
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
/// Environment variable holding the region detector endpoint.
pub const ENV_DETECTOR_URL: &str = "FOLIO_DETECTOR_URL";

/// Endpoints and credentials for the remote detector and classifier.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Orientation service base URL.
    pub ollama_host: String,

    /// Orientation model name.
    pub ollama_model: String,

    /// Bearer token for the orientation service.
    pub ollama_api_key: Option<String>,

    /// Region detector endpoint (full URL).
    pub detector_url: Option<String>,

    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_api_key: None,
            detector_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build configuration from the process environment.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        if let Some(host) = var(ENV_OLLAMA_HOST) {
            config.ollama_host = host;
        }
        if let Some(model) = var(ENV_OLLAMA_MODEL) {
            config.ollama_model = model;
        }
        config.ollama_api_key = var(ENV_OLLAMA_API_KEY);
        config.detector_url = var(ENV_DETECTOR_URL);
        config
    }

    /// Set the orientation service host.
    pub fn with_ollama_host(mut self, host: impl Into<String>) -> Self {
        self.ollama_host = host.into();
        self
    }

    /// Set the orientation model.
    pub fn with_ollama_model(mut self, model: impl Into<String>) -> Self {
        self.ollama_model = model.into();
        self
    }

    /// Set the orientation service API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.ollama_api_key = Some(key.into());
        self
    }

    /// Set the region detector endpoint.
    pub fn with_detector_url(mut self, url: impl Into<String>) -> Self {
        self.detector_url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.ollama_host, "https://ollama.com");
        assert_eq!(config.ollama_model, "qwen3-vl:235b");
        assert!(config.ollama_api_key.is_none());
        assert!(config.detector_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let config = ServiceConfig::new()
            .with_ollama_host("http://localhost:11434")
            .with_api_key("secret")
            .with_detector_url("http://localhost:8000/detect")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.ollama_host, "http://localhost:11434");
        assert_eq!(config.ollama_api_key.as_deref(), Some("secret"));
        assert_eq!(config.detector_url.as_deref(), Some("http://localhost:8000/detect"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
