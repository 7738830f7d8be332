//! Configuration types for ingestion and analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely
//! on well-documented defaults for the rest.

use crate::error::AssistantError;
use crate::pipeline::llm::AnalysisProvider;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for document ingestion and LLM analysis.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use townhall_assistant::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gemini-2.5-pro")
///     .temperature(0.2)
///     .max_retries(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// LLM model identifier, e.g. "gemini-2.5-pro", "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Pre-constructed analysis provider. Takes precedence over the
    /// environment-based Gemini default. Useful in tests or when the caller
    /// needs custom middleware (caching, rate-limiting).
    pub provider: Option<Arc<dyn AnalysisProvider>>,

    /// Sampling temperature for the analysis completion. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the supplied documents,
    /// which is exactly what you want for a citation-grounded report.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate for the report. Default: 8192.
    ///
    /// The report covers every supplied document; setting this too low
    /// silently truncates the analysis mid-section.
    pub max_output_tokens: u32,

    /// Maximum retry attempts on a transient API failure. Default: 3.
    ///
    /// Most 5xx and timeout errors are transient. Permanent errors
    /// (bad API key, 400) still burn the retries but surface the last
    /// error message intact.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Per-API-call timeout in seconds. Default: 120.
    ///
    /// Analysing tens of pages is a long-form generation; interactive
    /// defaults of 30 s time out on real council agendas.
    pub api_timeout_secs: u64,

    /// Custom analyst persona / system prompt. If None, uses the built-in
    /// Dutch analyst prompt from [`crate::prompts`].
    pub system_prompt: Option<String>,

    /// Title used for the rendered HTML report. Default: "Analyse Raadsstukken".
    pub report_title: String,

    /// Optional per-file progress callback for the ingestion pipeline.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider: None,
            temperature: 0.2,
            max_output_tokens: 8192,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            system_prompt: None,
            report_title: "Analyse Raadsstukken".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("report_title", &self.report_title)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn report_title(mut self, title: impl Into<String>) -> Self {
        self.config.report_title = title.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AssistantError> {
        let c = &self.config;
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(AssistantError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.report_title.trim().is_empty() {
            return Err(AssistantError::InvalidConfig(
                "report title must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = AnalysisConfig::default();
        assert_eq!(c.max_retries, 3);
        assert_eq!(c.retry_backoff_ms, 500);
        assert_eq!(c.report_title, "Analyse Raadsstukken");
        assert!(c.model.is_none());
        assert!(c.provider.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = AnalysisConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = AnalysisConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = AnalysisConfig::builder().report_title("  ").build();
        assert!(matches!(err, Err(AssistantError::InvalidConfig(_))));
    }

    #[test]
    fn debug_does_not_require_provider_debug() {
        let c = AnalysisConfig::builder().model("gemini-2.5-pro").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("gemini-2.5-pro"));
    }
}
