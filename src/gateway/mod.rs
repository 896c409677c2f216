//! Model gateway
//!
//! The trait seam between the synthesis pipeline and the remote completion
//! endpoint, plus the per-invocation endpoint configuration.

pub mod openai;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use url::Url;

pub use openai::OpenAiGateway;

/// Model used when the caller leaves the field blank
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Per-invocation endpoint configuration
///
/// Supplied by the caller for every synthesis run; nothing is stored
/// process-wide.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl GatewayConfig {
    /// Validate and normalize caller-supplied configuration.
    ///
    /// Fails with a configuration error before any network call is made:
    /// empty credential, empty base URL, or a base URL that does not parse.
    /// Trailing slashes are stripped; a blank model falls back to
    /// [`DEFAULT_MODEL`].
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Config("请填写 API Key".to_string()));
        }

        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AppError::Config("请填写 API Base URL".to_string()));
        }
        Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("API Base URL 无效: {}", e)))?;

        let model = model.trim();
        let model = if model.is_empty() { DEFAULT_MODEL } else { model };

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Override the sampling temperature (0.6 to 0.85 in practice).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// One prompt in, the first completion choice's raw text out
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_strips_trailing_slashes() {
        let config = GatewayConfig::new("https://api.deepseek.com///", "sk-test", "").unwrap();
        assert_eq!(config.base_url, "https://api.deepseek.com");
    }

    #[test]
    fn test_config_defaults_model() {
        let config = GatewayConfig::new("https://api.deepseek.com", "sk-test", "  ").unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);

        let config =
            GatewayConfig::new("https://api.deepseek.com", "sk-test", "deepseek-reasoner").unwrap();
        assert_eq!(config.model, "deepseek-reasoner");
    }

    #[test]
    fn test_config_rejects_missing_credential() {
        let err = GatewayConfig::new("https://api.deepseek.com", "   ", "").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_rejects_missing_base_url() {
        let err = GatewayConfig::new("", "sk-test", "").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_rejects_unparsable_base_url() {
        let err = GatewayConfig::new("not a url", "sk-test", "").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_temperature_override() {
        let config = GatewayConfig::new("https://api.deepseek.com", "sk-test", "")
            .unwrap()
            .with_temperature(0.85);
        assert_eq!(config.temperature, 0.85);
    }
}
