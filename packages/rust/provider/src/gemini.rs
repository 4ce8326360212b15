//! Google Gemini backend (`generateContent` REST endpoint).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use seowriter_shared::{AiConfig, Result, SeoWriterError, require_api_key};

use crate::AiProvider;

const BACKEND: &str = "Gemini";

/// Client for a Gemini model.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiProvider {
    /// Build a provider from config, reading the key from the configured env var.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = require_api_key(config)?;
        Self::with_api_key(config, api_key)
    }

    /// Build a provider with an explicit key.
    pub fn with_api_key(config: &AiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SeoWriterError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SeoWriterError::provider(BACKEND, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SeoWriterError::provider(BACKEND, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|env| env.error.message)
                .unwrap_or(text);
            return Err(SeoWriterError::provider(
                BACKEND,
                format!("HTTP {status}: {message}"),
            ));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            SeoWriterError::provider(BACKEND, format!("invalid response body: {e}"))
        })?;

        let output = parsed.into_text()?;
        debug!(output_len = output.len(), "generation complete");
        Ok(output)
    }

    fn name(&self) -> &str {
        BACKEND
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SeoWriterError::provider(
                BACKEND,
                format!("prompt blocked: {reason}"),
            ));
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            SeoWriterError::provider(BACKEND, "response contained no candidates")
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
            return Err(SeoWriterError::provider(
                BACKEND,
                format!("response contained no text (finish reason: {reason})"),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(endpoint: String) -> AiConfig {
        AiConfig {
            endpoint,
            model: "test-model".into(),
            timeout_secs: 5,
            ..AiConfig::default()
        }
    }

    #[test]
    fn request_serializes_to_gemini_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn response_joins_text_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]},"finishReason":"STOP"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Hello, world");
    }

    #[test]
    fn blocked_prompt_is_provider_error() {
        let json = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(err.to_string().contains("Gemini API error: prompt blocked: SAFETY"));
    }

    #[test]
    fn empty_candidate_reports_finish_reason() {
        let json = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn generate_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/models/test-model:generateContent"))
            .and(wiremock::matchers::header("x-goog-api-key", "secret"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                r#"{"candidates":[{"content":{"parts":[{"text":"مقال"}]}}]}"#,
            ))
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_api_key(&config_for(server.uri()), "secret").unwrap();
        let out = provider.generate_content("write").await.unwrap();
        assert_eq!(out, "مقال");
        assert_eq!(provider.name(), "Gemini");
    }

    #[tokio::test]
    async fn http_error_is_wrapped_with_backend_message() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(400).set_body_string(
                r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_api_key(&config_for(server.uri()), "bad").unwrap();
        let err = provider.generate_content("write").await.unwrap_err();

        assert!(matches!(err, SeoWriterError::Provider { .. }));
        assert!(err.to_string().starts_with("Gemini API error:"));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn malformed_body_is_provider_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_api_key(&config_for(server.uri()), "k").unwrap();
        let err = provider.generate_content("write").await.unwrap_err();
        assert!(err.to_string().contains("invalid response body"));
    }
}
