//! # papercheck
//!
//! Review PDF papers against a fixed set of instructions using the Gemini
//! `generateContent` API, and export the report's findings table as CSV.
//!
//! ## What this crate does
//!
//! The document understanding is delegated entirely to the analysis
//! service: the crate uploads the PDF inline with a review prompt, takes
//! the Markdown report the model returns, renders it to sanitized HTML for
//! display, and — when the report contains a Markdown table — encodes that
//! table as a UTF-8-BOM CSV that opens cleanly in Excel and Google Sheets.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate the file and credential, read bytes
//!  ├─ 2. Encode   PDF → base64 inline_data part
//!  ├─ 3. Exchange one generateContent request/response (no retries)
//!  ├─ 4. Extract  candidates → content → parts → text (with fallbacks)
//!  ├─ 5. Render   Markdown → sanitized HTML
//!  └─ 6. Table    first GFM table → BOM-prefixed CSV
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use papercheck::{analyze, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder()
//!         .prompt("Check this paper against the style rules …")
//!         .build()?;
//!     let api_key = std::env::var("GEMINI_API_KEY")?;
//!     let output = analyze("paper.pdf", &api_key, &config).await?;
//!     println!("{}", output.markdown);
//!     if let Some(csv) = output.csv() {
//!         std::fs::write("paper_table_utf8.csv", csv)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Every failure is terminal for the run; there are no retries and no
//! cancellation. A response with an unexpected JSON shape is the one
//! exception — it degrades to a fixed placeholder report instead of an
//! error, because the exchange itself succeeded.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `papercheck` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! papercheck = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod session;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_from_bytes, analyze_sync, analyze_to_file, RunPhase};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use error::PapercheckError;
pub use output::{AnalysisOutput, AnalysisStats};
pub use session::{AnalysisSession, CsvArtifact};
pub use table::{encode_csv, extract_first_table, TableExport, DEFAULT_CSV_FILENAME, UTF8_BOM};
