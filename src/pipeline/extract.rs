//! Response interpretation: walk the envelope down to the report text.
//!
//! A structurally surprising response is not a fault. The run has already
//! paid for the exchange, so the worst acceptable outcome is a placeholder
//! report — never an error the caller has to handle. That is why this
//! stage returns a plain enum instead of a `Result`: the "failure" arms
//! are ordinary values with fixed display texts.

use crate::pipeline::gemini::GenerateContentResponse;
use tracing::debug;

/// Fallback report when the response carries no candidates at all.
pub const NO_RESULT_TEXT: &str = "No result to display.";

/// Fallback report when candidates exist but no segment carries text.
pub const NO_TEXT_IN_RESULT: &str = "No text in the result.";

/// Outcome of interpreting a response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// The first candidate produced readable text.
    Text(String),
    /// The candidate list was empty.
    NoCandidates,
    /// A candidate existed but none of its segments carried text.
    NoText,
}

impl ExtractedText {
    /// The text to render, fallback messages included.
    pub fn display_text(&self) -> &str {
        match self {
            ExtractedText::Text(t) => t,
            ExtractedText::NoCandidates => NO_RESULT_TEXT,
            ExtractedText::NoText => NO_TEXT_IN_RESULT,
        }
    }

    /// Whether this is a real model answer rather than a placeholder.
    pub fn is_report(&self) -> bool {
        matches!(self, ExtractedText::Text(_))
    }
}

/// Flatten the response into display text.
///
/// Only the first candidate is considered. Every segment with a present
/// text value is kept, in order, joined with newlines; segments without
/// text (inline data, tool calls) are skipped silently.
pub fn extract_text(response: &GenerateContentResponse) -> ExtractedText {
    let Some(candidate) = response.candidates.first() else {
        debug!("Response carried no candidates");
        return ExtractedText::NoCandidates;
    };

    let parts = candidate
        .content
        .as_ref()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    let text = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        debug!("First candidate carried no textual segments");
        ExtractedText::NoText
    } else {
        ExtractedText::Text(text)
    }
}
