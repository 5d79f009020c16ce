//! Output types returned by a review run.

use crate::table::TableExport;
use serde::Serialize;

/// The result of one paper review.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    /// The model's full report as Markdown.
    pub markdown: String,

    /// The report rendered to sanitized HTML, safe to embed in a page.
    pub html: String,

    /// The first findings table of the report, if one was detected.
    ///
    /// `None` is not an error: a report without a table simply has no CSV
    /// to offer. A table with zero body rows is also present here but
    /// should not be offered for download.
    pub table: Option<TableExport>,

    /// Timing and size figures for the run.
    pub stats: AnalysisStats,
}

impl AnalysisOutput {
    /// The CSV artifact to offer for download, if any.
    ///
    /// Present only when a table with at least one body row was found.
    pub fn csv(&self) -> Option<&str> {
        self.table
            .as_ref()
            .filter(|t| !t.rows.is_empty())
            .map(|t| t.csv.as_str())
    }
}

/// Timing and size figures for one review run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStats {
    /// HTTP status of the analysis exchange.
    pub response_status: u16,
    /// Wall-clock duration of the analysis exchange.
    pub request_duration_ms: u64,
    /// Wall-clock duration of the whole run, file read included.
    pub total_duration_ms: u64,
    /// Size of the PDF payload before base64 encoding.
    pub pdf_bytes: usize,
    /// Length of the review instructions in bytes.
    pub prompt_bytes: usize,
    /// Length of the extracted report text in bytes.
    pub report_bytes: usize,
}
