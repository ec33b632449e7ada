//! Configuration for financial-statement extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built via its builder. The
//! bounded-prefix lengths are deliberately configuration rather than
//! constants: they are tuning parameters tied to the inference backend's
//! cost/latency profile, not domain invariants, and deployments with a
//! different model or budget will want different values.

use crate::error::ExtractError;
use crate::llm::LlmProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for one extraction pipeline.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use finstmt::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .extract_model("mistral-large-latest")
///     .classify_prefix_chars(3_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Model for the unit-classification call. Default: `open-mistral-nemo`.
    ///
    /// Classification is a closed-ended question over a short excerpt —
    /// a small, fast model answers it as well as a frontier one, at a
    /// fraction of the latency and cost.
    pub classify_model: String,

    /// Model for the structured-extraction call. Default: `mistral-large-latest`.
    ///
    /// Extraction demands reliable long-context JSON emission; this is where
    /// spending on a stronger model pays for itself, since a single dropped
    /// or misplaced figure invalidates the whole statement.
    pub extract_model: String,

    /// How many characters of normalized text the classifier sees. Default: 5 000.
    ///
    /// A document's units disclosure ("amounts in millions") sits in the
    /// cover page or statement headers, well inside the first few thousand
    /// characters. A short prefix bounds the cheap call's latency and cost;
    /// a longer one buys nothing.
    pub classify_prefix_chars: usize,

    /// How many characters of normalized text the extractor sees. Default: 30 000.
    ///
    /// Large enough to cover the primary statements of a typical annual
    /// report, small enough to stay under request-latency and cost ceilings.
    /// Raise it for filings whose statements sit deep in the document.
    pub extract_prefix_chars: usize,

    /// Sampling temperature for both calls. Default: 0.0.
    ///
    /// Extraction is transcription, not generation — determinism is the
    /// point. Anything above 0 only adds noise to numbers.
    pub temperature: f32,

    /// Maximum tokens the extraction call may generate. Default: 8 192.
    ///
    /// A full statement with passthrough sections can run long; setting this
    /// too low truncates the JSON mid-object, which surfaces as
    /// [`ExtractError::MalformedResponse`].
    pub max_tokens: usize,

    /// Per-inference-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Custom system prompt for the extraction call. If `None`, uses the
    /// built-in prompt from [`crate::prompts`], parameterised with the
    /// inferred multiplier.
    pub system_prompt: Option<String>,

    /// Pre-constructed LLM provider. If `None`, a [`crate::MistralProvider`]
    /// is built from `MISTRAL_API_KEY` at run time.
    pub provider: Option<Arc<dyn LlmProvider>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            classify_model: "open-mistral-nemo".to_string(),
            extract_model: "mistral-large-latest".to_string(),
            classify_prefix_chars: 5_000,
            extract_prefix_chars: 30_000,
            temperature: 0.0,
            max_tokens: 8_192,
            api_timeout_secs: 120,
            download_timeout_secs: 120,
            system_prompt: None,
            provider: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("classify_model", &self.classify_model)
            .field("extract_model", &self.extract_model)
            .field("classify_prefix_chars", &self.classify_prefix_chars)
            .field("extract_prefix_chars", &self.extract_prefix_chars)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn classify_model(mut self, model: impl Into<String>) -> Self {
        self.config.classify_model = model.into();
        self
    }

    pub fn extract_model(mut self, model: impl Into<String>) -> Self {
        self.config.extract_model = model.into();
        self
    }

    pub fn classify_prefix_chars(mut self, n: usize) -> Self {
        self.config.classify_prefix_chars = n.max(100);
        self
    }

    pub fn extract_prefix_chars(mut self, n: usize) -> Self {
        self.config.extract_prefix_chars = n.max(100);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.classify_model.is_empty() || c.extract_model.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Model names must be non-empty".into(),
            ));
        }
        if c.classify_prefix_chars > c.extract_prefix_chars {
            return Err(ExtractError::InvalidConfig(format!(
                "classify_prefix_chars ({}) must not exceed extract_prefix_chars ({})",
                c.classify_prefix_chars, c.extract_prefix_chars
            )));
        }
        if c.max_tokens == 0 {
            return Err(ExtractError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExtractionConfig::builder().build().expect("valid");
        assert_eq!(config.classify_prefix_chars, 5_000);
        assert_eq!(config.extract_prefix_chars, 30_000);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn prefix_chars_clamped_to_minimum() {
        let config = ExtractionConfig::builder()
            .classify_prefix_chars(1)
            .build()
            .expect("valid");
        assert_eq!(config.classify_prefix_chars, 100);
    }

    #[test]
    fn classify_prefix_must_not_exceed_extract_prefix() {
        let result = ExtractionConfig::builder()
            .classify_prefix_chars(50_000)
            .extract_prefix_chars(10_000)
            .build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn temperature_is_clamped() {
        let config = ExtractionConfig::builder()
            .temperature(5.0)
            .build()
            .expect("valid");
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn empty_model_rejected() {
        let result = ExtractionConfig::builder().extract_model("").build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }
}
