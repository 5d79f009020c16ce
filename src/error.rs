//! Error types for the papercheck library.
//!
//! Every variant here is **fatal for the run**: there are no automatic
//! retries anywhere, and a failed run must be restarted by the caller.
//! One class of failure is deliberately *not* represented here: a response
//! whose JSON shape does not match expectations. That degrades to a fixed
//! fallback report text (see [`crate::pipeline::extract`]) because the
//! caller never treats it as abnormal — the run still renders a result.

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of bytes of an error response body kept for diagnostics.
pub(crate) const ERROR_BODY_LIMIT: usize = 400;

/// All fatal errors returned by the papercheck library.
#[derive(Debug, Error)]
pub enum PapercheckError {
    // ── Setup errors ──────────────────────────────────────────────────────
    /// The review instructions could not be fetched from their remote
    /// location. Nothing can run without them.
    #[error("Failed to fetch review instructions from '{url}': {reason}\nTry again later or provide a local prompt file.")]
    PromptFetchFailed { url: String, reason: String },

    /// A local prompt file was named but could not be read.
    #[error("Failed to read prompt file '{path}': {source}")]
    PromptFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Input validation errors ──────────────────────────────────────────
    /// No API key was supplied. Rejected before any network activity.
    #[error("No API key provided.\nPass --api-key or set GEMINI_API_KEY.")]
    MissingApiKey,

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Service errors ────────────────────────────────────────────────────
    /// The request could not be sent at all (connection refused, DNS, TLS).
    #[error("Could not reach the analysis service: {reason}\nCheck your internet connection.")]
    RequestFailed { reason: String },

    /// The analysis service answered with a non-success HTTP status.
    /// `body` is truncated to keep diagnostics readable.
    #[error("Analysis failed (HTTP {status}).\nService said: {body}")]
    ServiceFailure { status: u16, body: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file (report or CSV).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Truncate a service response body for diagnostic display.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    // Cut on a char boundary at or below the limit.
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_failure_display() {
        let e = PapercheckError::ServiceFailure {
            status: 429,
            body: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn missing_key_mentions_env_var() {
        assert!(PapercheckError::MissingApiKey
            .to_string()
            .contains("GEMINI_API_KEY"));
    }

    #[test]
    fn truncate_body_short_passthrough() {
        assert_eq!(truncate_body("ok"), "ok");
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(1000);
        let t = truncate_body(&long);
        assert!(t.len() <= ERROR_BODY_LIMIT + '\u{2026}'.len_utf8());
        assert!(t.ends_with('\u{2026}'));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(400);
        let t = truncate_body(&long);
        assert!(t.ends_with('\u{2026}'));
    }
}
