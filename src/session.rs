//! Session state: one run at a time, one retained CSV artifact.
//!
//! The session owns the artifact produced by the previous run and releases
//! it before a new run begins, and again when a new artifact is produced.
//! Ownership replaces what a UI would express as "revoke the old download
//! link before creating the next one": the prior artifact is dropped
//! explicitly, never silently shadowed.
//!
//! `run` takes `&mut self`, so the borrow checker enforces the
//! no-overlapping-runs rule that the original trigger-disabling provided.

use crate::analyze;
use crate::config::AnalysisConfig;
use crate::error::PapercheckError;
use crate::output::AnalysisOutput;
use crate::prompts;
use crate::table::DEFAULT_CSV_FILENAME;
use std::path::Path;
use tracing::{debug, info};

/// A downloadable CSV artifact from a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    /// Suggested filename, by convention base name + UTF-8 marker + `.csv`.
    pub filename: String,
    /// BOM-prefixed CSV text.
    pub content: String,
}

/// A long-lived review session.
///
/// Holds the review instructions (fetched once at startup) and the last
/// run's CSV artifact. Drop the session to release everything.
pub struct AnalysisSession {
    config: AnalysisConfig,
    last_artifact: Option<CsvArtifact>,
}

impl AnalysisSession {
    /// Create a session with instructions already resolved in `config`.
    ///
    /// Returns [`PapercheckError::InvalidConfig`] when no inline prompt is
    /// present; use [`AnalysisSession::connect`] to fetch one.
    pub fn new(config: AnalysisConfig) -> Result<Self, PapercheckError> {
        if config.prompt.is_none() {
            return Err(PapercheckError::InvalidConfig(
                "Session requires a resolved prompt; use AnalysisSession::connect".into(),
            ));
        }
        Ok(Self {
            config,
            last_artifact: None,
        })
    }

    /// Create a session, fetching the review instructions up front.
    ///
    /// A failed fetch disables the feature for this session — the error is
    /// fatal and the session is never constructed.
    pub async fn connect(mut config: AnalysisConfig) -> Result<Self, PapercheckError> {
        if config.prompt.is_none() {
            let prompt =
                prompts::fetch_prompt(&config.prompt_url, config.prompt_timeout_secs).await?;
            config.prompt = Some(prompt);
        }
        info!("Session ready");
        Ok(Self {
            config,
            last_artifact: None,
        })
    }

    /// The session's configuration, prompt included.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The CSV artifact retained from the most recent successful run, if
    /// that run found a table with at least one row.
    pub fn last_artifact(&self) -> Option<&CsvArtifact> {
        self.last_artifact.as_ref()
    }

    /// Explicitly release the retained artifact.
    pub fn release_artifact(&mut self) -> Option<CsvArtifact> {
        let prior = self.last_artifact.take();
        if prior.is_some() {
            debug!("Released previous CSV artifact");
        }
        prior
    }

    /// Run one review.
    ///
    /// The previous artifact is released before the run starts. On success
    /// with a qualifying table, the new artifact replaces it; on failure or
    /// a table-less report the session ends the run holding none.
    pub async fn run(
        &mut self,
        path: impl AsRef<Path>,
        api_key: &str,
    ) -> Result<AnalysisOutput, PapercheckError> {
        // Release before a new run begins, success or not.
        self.release_artifact();

        let output = analyze::analyze(path, api_key, &self.config).await?;
        self.retain_artifact(&output);
        Ok(output)
    }

    /// Byte-slice variant of [`AnalysisSession::run`].
    pub async fn run_bytes(
        &mut self,
        bytes: &[u8],
        api_key: &str,
    ) -> Result<AnalysisOutput, PapercheckError> {
        self.release_artifact();

        let output = analyze::analyze_from_bytes(bytes, api_key, &self.config).await?;
        self.retain_artifact(&output);
        Ok(output)
    }

    fn retain_artifact(&mut self, output: &AnalysisOutput) {
        // Release again on replacement; run() already cleared it, but a
        // caller invoking retain paths twice must never leak the prior one.
        self.last_artifact = output.csv().map(|csv| CsvArtifact {
            filename: DEFAULT_CSV_FILENAME.to_string(),
            content: csv.to_string(),
        });
    }
}
