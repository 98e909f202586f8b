//! Gemini-based translation using the Generative AI API.

use crate::error::{Result, SubzhError};
use crate::translate::{Translator, TARGET_LANGUAGE};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Maximum request attempts before giving up.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 1000;

/// Translator using the Google Gemini API.
pub struct GeminiTranslator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranslator {
    /// Create a new Gemini translator with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "gemini-2.0-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a different model (e.g., "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the translation prompt.
    fn build_prompt(&self, text: &str) -> String {
        format!(
            r#"Translate the following subtitle text from English to {TARGET_LANGUAGE}.
Return ONLY the translated text, nothing else. Preserve the meaning and all line breaks.

Text to translate:
{text}"#
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// POST a prompt to generateContent, retrying on transient failures.
    ///
    /// Server errors (5xx) and 429 are retried with exponential backoff;
    /// other client errors fail immediately.
    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let url = self.endpoint();
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                debug!("Retry attempt {} after {}ms delay", attempt, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let response = self.client.post(&url).json(&request).send().await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    debug!("Gemini API response status: {}", status);

                    if status.is_success() {
                        let body = resp.text().await?;
                        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
                            SubzhError::Api(format!("Failed to parse Gemini response: {}", e))
                        })?;
                        return extract_text(parsed);
                    }

                    let error_body = resp.text().await.unwrap_or_default();

                    // Don't retry on client errors, except rate limiting
                    if status.is_client_error() && status.as_u16() != 429 {
                        return Err(SubzhError::Api(format!(
                            "Gemini API error ({}): {}",
                            status, error_body
                        )));
                    }

                    warn!("Gemini API transient error ({}): {}", status, error_body);
                    last_error = Some(SubzhError::Api(format!(
                        "Gemini API transient error: {}",
                        status
                    )));
                }
                Err(e) => {
                    warn!("Gemini API request failed: {}", e);
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SubzhError::Api("Unknown error".to_string())))
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

fn extract_text(response: GeminiResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(SubzhError::Api(format!("Gemini error: {}", error.message)));
    }

    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .ok_or_else(|| SubzhError::Api("Gemini response contained no text".to_string()))
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        debug!("Translating {} characters", text.len());
        self.generate(self.build_prompt(text)).await
    }

    async fn check_connection(&self) -> Result<()> {
        self.generate("Reply with the single word: OK".to_string())
            .await
            .map(|_| ())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_translator_creation() {
        let translator = GeminiTranslator::new("test-key".to_string());
        assert_eq!(translator.name(), "gemini");
        assert_eq!(translator.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_with_model() {
        let translator = GeminiTranslator::new("test-key".to_string()).with_model("gemini-1.5-pro");
        assert_eq!(translator.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_build_prompt() {
        let translator = GeminiTranslator::new("test-key".to_string());
        let prompt = translator.build_prompt("Hello, world!");
        assert!(prompt.contains("Traditional Chinese"));
        assert!(prompt.contains("Hello, world!"));
        assert!(prompt.contains("line breaks"));
    }

    #[test]
    fn test_endpoint_contains_model_and_key() {
        let translator = GeminiTranslator::new("test-key".to_string())
            .with_base_url("http://localhost:9999/v1beta");
        let url = translator.endpoint();
        assert!(url.starts_with("http://localhost:9999/v1beta/models/gemini-2.0-flash"));
        assert!(url.ends_with("key=test-key"));
    }

    #[test]
    fn test_extract_text_success() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" 你好，世界！ "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "你好，世界！");
    }

    #[test]
    fn test_extract_text_api_error() {
        let response: GeminiResponse =
            serde_json::from_str(r#"{"error":{"message":"API key not valid"}}"#).unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(extract_text(response).is_err());
    }
}
