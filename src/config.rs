//! Configuration types for a paper review run.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it easy
//! to log a run's settings and to diff two runs when their reports differ.

use crate::error::PapercheckError;
use serde::{Deserialize, Serialize};

/// Default Gemini model used for document review.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL for the generative-language API.
pub const DEFAULT_API_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

/// Configuration for one paper review.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use papercheck::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gemini-2.5-flash")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model identifier, e.g. "gemini-2.5-flash". Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the `generateContent` endpoint, without trailing slash.
    /// Overridable for proxies and tests. Default: [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Review instructions. If None, the prompt is fetched from
    /// `prompt_url` before the first run.
    pub prompt: Option<String>,

    /// Remote location of the review instructions. Default:
    /// [`crate::prompts::DEFAULT_PROMPT_URL`].
    pub prompt_url: String,

    /// Sampling temperature. Default: 0.2.
    ///
    /// A review should be faithful to the document, not creative; keep this
    /// low unless you are experimenting with the prompt.
    pub temperature: f32,

    /// Maximum tokens the model may generate for the whole report.
    /// Default: 8192. A full review of a dense paper, findings table
    /// included, routinely exceeds 4k output tokens.
    pub max_output_tokens: u32,

    /// Timeout for the single analysis exchange in seconds. Default: 600.
    ///
    /// Reviewing a document takes on the order of minutes per page; this is
    /// the transport-level ceiling, not a per-run retry budget. There are no
    /// retries: when the exchange fails, the run fails.
    pub api_timeout_secs: u64,

    /// Timeout for fetching the remote prompt in seconds. Default: 30.
    pub prompt_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            prompt: None,
            prompt_url: crate::prompts::DEFAULT_PROMPT_URL.to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            api_timeout_secs: 600,
            prompt_timeout_secs: 30,
        }
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
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn prompt_url(mut self, url: impl Into<String>) -> Self {
        self.config.prompt_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn prompt_timeout_secs(mut self, secs: u64) -> Self {
        self.config.prompt_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, PapercheckError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PapercheckError::InvalidConfig("Model must not be empty".into()));
        }
        if c.api_base_url.trim().is_empty() {
            return Err(PapercheckError::InvalidConfig(
                "API base URL must not be empty".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(PapercheckError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
