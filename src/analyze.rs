//! Eager (whole-run) review entry points.
//!
//! One call drives the whole pipeline: validate inputs, read the PDF,
//! resolve the review instructions, run the single API exchange, extract
//! and render the report, and detect the findings table. The run blocks on
//! the exchange — reviewing takes on the order of minutes per page, and
//! there is no partial streaming and no retry.

use crate::config::AnalysisConfig;
use crate::error::PapercheckError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::{encode, extract, gemini, input, render};
use crate::prompts;
use crate::table;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Phases of one review run, in order.
///
/// Terminal phases loop back to `Idle`; a failure at any point moves
/// straight to `Errored` and then `Idle` — there is no retry phase.
/// Emitted as tracing events so a host application can mirror the run's
/// progress without hooking into pipeline internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    ReadingFile,
    BuildingRequest,
    AwaitingResponse,
    Rendering,
    TableFound,
    NoTable,
    Errored,
}

/// Review a local PDF file.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `path`    — local PDF file
/// * `api_key` — access credential for the analysis service
/// * `config`  — review configuration
///
/// # Errors
/// Returns `Err(PapercheckError)` for fatal failures only: bad inputs,
/// unreadable file, prompt fetch failure, unreachable service, or a
/// non-success response status. A response with an unexpected *shape* is
/// not an error — the output then carries a fixed placeholder report.
pub async fn analyze(
    path: impl AsRef<Path>,
    api_key: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, PapercheckError> {
    let total_start = Instant::now();
    let path = path.as_ref();
    info!("Starting review: {}", path.display());

    // Both inputs are required before anything else happens.
    let api_key = input::require_api_key(api_key)?;
    debug!("Phase: {:?}", RunPhase::ReadingFile);
    let bytes = input::read_pdf(path).inspect_err(|_| {
        debug!("Phase: {:?}", RunPhase::Errored);
    })?;

    analyze_validated(&bytes, api_key, config, total_start).await
}

/// Review PDF bytes already held in memory.
///
/// The magic bytes are still validated; the rest of the pipeline is
/// identical to [`analyze`].
pub async fn analyze_from_bytes(
    bytes: &[u8],
    api_key: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, PapercheckError> {
    let total_start = Instant::now();
    let api_key = input::require_api_key(api_key)?;
    input::validate_magic(bytes, Path::new("<bytes>"))?;
    analyze_validated(bytes, api_key, config, total_start).await
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    path: impl AsRef<Path>,
    api_key: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, PapercheckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PapercheckError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(analyze(path, api_key, config))
}

/// Review a PDF and write the Markdown report directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn analyze_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    api_key: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, PapercheckError> {
    let output = analyze(path, api_key, config).await?;
    let out = output_path.as_ref();

    if let Some(parent) = out.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PapercheckError::OutputWriteFailed {
                path: out.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = out.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| PapercheckError::OutputWriteFailed {
            path: out.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, out)
        .await
        .map_err(|e| PapercheckError::OutputWriteFailed {
            path: out.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

// ── Internal pipeline ────────────────────────────────────────────────────

/// Resolve the review instructions: inline override first, remote fetch
/// otherwise. A failed fetch is fatal for the session.
async fn resolve_prompt(config: &AnalysisConfig) -> Result<String, PapercheckError> {
    if let Some(ref prompt) = config.prompt {
        debug!("Using caller-supplied prompt ({} bytes)", prompt.len());
        return Ok(prompt.clone());
    }
    prompts::fetch_prompt(&config.prompt_url, config.prompt_timeout_secs).await
}

/// The pipeline after input validation has passed.
async fn analyze_validated(
    bytes: &[u8],
    api_key: &str,
    config: &AnalysisConfig,
    total_start: Instant,
) -> Result<AnalysisOutput, PapercheckError> {
    let prompt = resolve_prompt(config).await?;

    // ── Build request ────────────────────────────────────────────────────
    debug!("Phase: {:?}", RunPhase::BuildingRequest);
    info!("Preparing analysis request ({} PDF bytes)", bytes.len());
    let document = encode::encode_pdf(bytes);
    let request = gemini::build_request(&prompt, document, config);

    // ── The one suspension point: the analysis exchange ──────────────────
    debug!("Phase: {:?}", RunPhase::AwaitingResponse);
    let (envelope, status, request_duration_ms) = gemini::generate_content(api_key, &request, config)
        .await
        .inspect_err(|_| {
            debug!("Phase: {:?}", RunPhase::Errored);
        })?;

    // ── Render ───────────────────────────────────────────────────────────
    debug!("Phase: {:?}", RunPhase::Rendering);
    let extracted = extract::extract_text(&envelope);
    if !extracted.is_report() {
        info!("Response had no readable answer; rendering placeholder");
    }
    let markdown = extracted.display_text().to_string();
    let html = render::render_html(&markdown);

    // ── Findings table ───────────────────────────────────────────────────
    let table = table::extract_first_table(&markdown);
    match &table {
        Some(t) if !t.rows.is_empty() => {
            debug!("Phase: {:?}", RunPhase::TableFound);
            info!("Found findings table: {} rows × {} columns", t.rows.len(), t.headers.len());
        }
        Some(_) => info!("Found a findings table, but it has no rows; CSV not offered"),
        None => {
            debug!("Phase: {:?}", RunPhase::NoTable);
            info!("No findings table in the report");
        }
    }

    let stats = AnalysisStats {
        response_status: status,
        request_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        pdf_bytes: bytes.len(),
        prompt_bytes: prompt.len(),
        report_bytes: markdown.len(),
    };

    info!("Review complete in {}ms", stats.total_duration_ms);
    debug!("Phase: {:?}", RunPhase::Idle);

    Ok(AnalysisOutput {
        markdown,
        html,
        table,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_rejected_before_io() {
        let config = AnalysisConfig::default();
        let err = analyze("/nonexistent.pdf", "", &config).await;
        // Key validation comes first; the bogus path must not be touched.
        assert!(matches!(err, Err(PapercheckError::MissingApiKey)));
    }

    #[tokio::test]
    async fn missing_file_rejected_before_network() {
        let config = AnalysisConfig::default();
        let err = analyze("/definitely/not/here.pdf", "key", &config).await;
        assert!(matches!(err, Err(PapercheckError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn bad_magic_rejected_from_bytes() {
        let config = AnalysisConfig::default();
        let err = analyze_from_bytes(b"not a pdf", "key", &config).await;
        assert!(matches!(err, Err(PapercheckError::NotAPdf { .. })));
    }

    #[tokio::test]
    async fn inline_prompt_skips_fetch() {
        // Unreachable service, but the prompt must resolve locally first;
        // the failure we then see is the exchange, not the prompt fetch.
        let config = AnalysisConfig::builder()
            .prompt("inline instructions")
            .api_base_url("http://192.0.2.1/models")
            .api_timeout_secs(1)
            .build()
            .unwrap();
        let err = analyze_from_bytes(b"%PDF-1.4", "key", &config).await;
        assert!(matches!(err, Err(PapercheckError::RequestFailed { .. })));
    }
}
