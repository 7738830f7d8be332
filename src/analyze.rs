//! Analysis entry point: hand the annotated text to the LLM collaborator.
//!
//! Strictly downstream of ingestion and fully opaque to it: this module
//! composes the analyst prompt, resolves a provider, and drives the call
//! with timeout, retry, and exponential backoff. The returned markdown is
//! passed through untouched — rendering is [`crate::report`]'s job.
//!
//! ## Retry Strategy
//!
//! Transient API failures (429/5xx, network blips) are frequent on long
//! generations. Exponential backoff (`retry_backoff_ms * 2^(attempt-1)`) avoids
//! hammering a recovering endpoint: with 500 ms base and 3 retries the wait
//! sequence is 500 ms → 1 s → 2 s.

use crate::config::AnalysisConfig;
use crate::error::AssistantError;
use crate::pipeline::llm::{AnalysisProvider, CompletionOptions, GeminiProvider};
use crate::prompts::{compose_user_prompt, DEFAULT_SYSTEM_PROMPT};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

/// Analyze citation-annotated document text against a user instruction.
///
/// `documents_text` is the annotated output of [`crate::ingest::ingest`];
/// `instruction` is the caller's specific assignment for the analyst.
/// Returns the analysis as markdown.
///
/// An empty `documents_text` is not rejected here — "nothing to analyze" is
/// the caller's decision to make; the model will simply have no evidence to
/// cite. Callers that want to skip the API call on empty input should check
/// [`crate::output::IngestOutput::is_empty`] first.
///
/// # Errors
/// [`AssistantError::ProviderNotConfigured`] when no provider is injected
/// and `GEMINI_API_KEY` is unset; [`AssistantError::ApiTimeout`] /
/// [`AssistantError::ApiError`] when every attempt failed.
pub async fn analyze(
    documents_text: &str,
    instruction: &str,
    config: &AnalysisConfig,
) -> Result<String, AssistantError> {
    let provider = resolve_provider(config)?;
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user_prompt = compose_user_prompt(instruction, documents_text);

    let options = CompletionOptions {
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    };

    info!(
        "Requesting analysis from '{}' ({} bytes of annotated text)",
        provider.name(),
        documents_text.len()
    );

    let mut last_err: Option<AssistantError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "Analysis retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let call = provider.generate(system_prompt, &user_prompt, &options);
        match timeout(Duration::from_secs(config.api_timeout_secs), call).await {
            Ok(Ok(markdown)) => {
                info!("Analysis complete: {} bytes of markdown", markdown.len());
                return Ok(markdown);
            }
            Ok(Err(e)) => {
                warn!("Analysis attempt {} failed: {}", attempt + 1, e);
                last_err = Some(e);
            }
            Err(_) => {
                warn!(
                    "Analysis attempt {} timed out after {}s",
                    attempt + 1,
                    config.api_timeout_secs
                );
                last_err = Some(AssistantError::ApiTimeout {
                    secs: config.api_timeout_secs,
                });
            }
        }
    }

    Err(last_err.unwrap_or_else(|| AssistantError::Internal("no attempt was made".into())))
}

/// Resolve the analysis provider, from most-specific to least-specific:
/// an injected provider wins; otherwise Gemini from `GEMINI_API_KEY` with
/// the configured (or default) model.
fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn AnalysisProvider>, AssistantError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }
    Ok(Arc::new(GeminiProvider::from_env(config.model.as_deref())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times, then answers.
    struct FlakyProvider {
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl AnalysisProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn generate(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, AssistantError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(AssistantError::ApiError {
                    message: "503".into(),
                })
            } else {
                Ok(format!("## Rapport\n\n{} bytes ontvangen", user_prompt.len()))
            }
        }
    }

    fn config_with(provider: Arc<dyn AnalysisProvider>) -> AnalysisConfig {
        AnalysisConfig::builder()
            .provider(provider)
            .retry_backoff_ms(1)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
            failures: 2,
        });
        let config = config_with(provider.clone());

        let markdown = analyze("--- START BRON: a.pdf (Pagina 1) ---", "Vat samen.", &config)
            .await
            .unwrap();
        assert!(markdown.starts_with("## Rapport"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
            failures: 100,
        });
        let config = config_with(provider.clone());

        let err = analyze("tekst", "opdracht", &config).await.unwrap_err();
        assert!(matches!(err, AssistantError::ApiError { .. }));
        // initial attempt + max_retries
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn injected_provider_receives_composed_prompt() {
        struct EchoProvider;

        #[async_trait]
        impl AnalysisProvider for EchoProvider {
            fn name(&self) -> &str {
                "echo"
            }
            async fn generate(
                &self,
                system_prompt: &str,
                user_prompt: &str,
                _options: &CompletionOptions,
            ) -> Result<String, AssistantError> {
                assert!(system_prompt.contains("START BRON"));
                assert!(user_prompt.contains("SPECIFIEKE OPDRACHT"));
                assert!(user_prompt.contains("documenttekst"));
                Ok("ok".into())
            }
        }

        let config = config_with(Arc::new(EchoProvider));
        let out = analyze("documenttekst", "opdracht", &config).await.unwrap();
        assert_eq!(out, "ok");
    }
}
