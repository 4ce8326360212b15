//! Generative-text backends.
//!
//! Pipeline stages only see [`AiProvider`]: one capability, "generate text
//! from a prompt". Backends are selected by name from the `[ai]` config.

mod gemini;

use async_trait::async_trait;

use seowriter_shared::{AiConfig, Result, SeoWriterError};

pub use gemini::GeminiProvider;

/// A hosted generative-text model.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// Backend failures come back as [`SeoWriterError::Provider`] carrying
    /// the backend's message; callers propagate them.
    async fn generate_content(&self, prompt: &str) -> Result<String>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Construct the configured backend.
///
/// Fails with a config error if the backend is unknown or its credentials
/// are missing.
pub fn from_config(config: &AiConfig) -> Result<Box<dyn AiProvider>> {
    match config.provider.trim().to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(config)?)),
        other => Err(SeoWriterError::config(format!(
            "unknown AI provider '{other}': expected 'gemini'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_config_error() {
        let config = AiConfig {
            provider: "llama".into(),
            ..AiConfig::default()
        };
        let err = from_config(&config).err().expect("unknown provider must fail");
        assert!(matches!(err, SeoWriterError::Config { .. }));
        assert!(err.to_string().contains("llama"));
    }

    #[test]
    fn missing_key_fails_at_construction() {
        let config = AiConfig {
            api_key_env: "SEOWRITER_TEST_PROVIDER_MISSING_KEY".into(),
            ..AiConfig::default()
        };
        let err = from_config(&config).err().expect("missing key must fail");
        assert!(matches!(err, SeoWriterError::Config { .. }));
        assert!(err.to_string().contains("SEOWRITER_TEST_PROVIDER_MISSING_KEY"));
    }
}
