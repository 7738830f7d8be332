//! The analysis-provider boundary: the only stage with network I/O.
//!
//! The pipeline treats the LLM as an opaque collaborator: given a system
//! prompt and a user prompt, it returns markdown text or fails. The
//! [`AnalysisProvider`] trait keeps that boundary injectable — tests supply
//! a mock, callers can wrap a provider with caching or rate-limiting — while
//! [`GeminiProvider`] is the stock implementation against the hosted Gemini
//! REST API, matching the model the tool was built around.
//!
//! Retry and backoff live in [`crate::analyze`], not here: a provider does
//! one attempt.

use crate::error::AssistantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default model when neither config nor provider specify one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Options for one completion call, derived from
/// [`crate::config::AnalysisConfig`].
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// An opaque text-completion collaborator.
///
/// Implementations must be `Send + Sync`; the same provider instance may be
/// shared across tasks.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name for diagnostics ("gemini", "mock", …).
    fn name(&self) -> &str;

    /// Run one completion: system prompt + user prompt in, text out.
    ///
    /// One attempt only; the caller owns retries.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, AssistantError>;
}

// ── Gemini REST provider ─────────────────────────────────────────────────

/// Hosted Gemini API provider (`generativelanguage.googleapis.com`).
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

// Manual impl: the API key must never end up in logs or panic messages.
impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiProvider {
    /// Create a provider with an explicit API key.
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable.
    pub fn from_env(model: Option<&str>) -> Result<Self, AssistantError> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key, model)),
            _ => Err(AssistantError::ProviderNotConfigured {
                provider: "gemini".to_string(),
                hint: "Set GEMINI_API_KEY, or inject a provider via \
                       AnalysisConfig::builder().provider(...)."
                    .to_string(),
            }),
        }
    }

    /// Override the API base URL (testing against a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        debug!("Calling {} ({} prompt bytes)", self.model, user_prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::ApiError {
                message: format!("Gemini request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::ApiError {
                message: format!("Gemini returned {status}: {body}"),
            });
        }

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| AssistantError::ApiError {
                message: format!("Failed to parse Gemini response: {e}"),
            })?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AssistantError::EmptyResponse {
                provider: "gemini".to_string(),
            })
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model() {
        let p = GeminiProvider::new("k", Some("gemini-2.0-flash"));
        assert_eq!(
            p.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn from_env_without_key_is_not_configured() {
        // Serialise env access: other tests in this binary don't touch it.
        std::env::remove_var("GEMINI_API_KEY");
        let err = GeminiProvider::from_env(None).unwrap_err();
        assert!(matches!(err, AssistantError::ProviderNotConfigured { .. }));
    }

    #[test]
    fn request_serialises_to_gemini_wire_shape() {
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: "sys".into() }],
            }),
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: "hi".into() }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 8192,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let p = GeminiProvider::new("super-secret-key", None);
        let dbg = format!("{p:?}");
        assert!(!dbg.contains("super-secret-key"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
        assert!(dbg.contains(DEFAULT_MODEL));
    }

    #[test]
    fn response_with_no_candidates_parses() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
