//! Review instructions: the fixed prompt sent alongside every document.
//!
//! The prompt lives at a fixed remote location so review criteria can be
//! updated without shipping a new binary. It is treated as an opaque string
//! here — its content matters to the model, not to this crate. When the
//! fetch fails the whole feature is unavailable for the session; there is
//! no built-in fallback prompt, because a silently outdated or generic
//! prompt would produce reports that look authoritative but check the
//! wrong criteria.

use crate::error::PapercheckError;
use std::path::Path;
use tracing::{debug, info};

/// Fixed remote location of the review instructions.
pub const DEFAULT_PROMPT_URL: &str =
    "https://raw.githubusercontent.com/papercheck/papercheck/refs/heads/main/prompt.txt";

/// Fetch the review instructions from `url`.
///
/// Each call fetches fresh — no caching layer, matching the session-scoped
/// lifetime of the prompt. Any failure (transport or non-success status) is
/// a fatal setup error.
pub async fn fetch_prompt(url: &str, timeout_secs: u64) -> Result<String, PapercheckError> {
    info!("Fetching review instructions");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| PapercheckError::PromptFetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PapercheckError::PromptFetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(PapercheckError::PromptFetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| PapercheckError::PromptFetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Fetched prompt: {} bytes", text.len());
    Ok(text)
}

/// Load review instructions from a local file instead of the remote source.
pub fn load_prompt_file(path: impl AsRef<Path>) -> Result<String, PapercheckError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| PapercheckError::PromptFileUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_prompt_file_reads_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Check the references section.").unwrap();
        let text = load_prompt_file(f.path()).unwrap();
        assert!(text.contains("references"));
    }

    #[test]
    fn load_prompt_file_missing_is_error() {
        let err = load_prompt_file("/definitely/not/here/prompt.txt");
        assert!(matches!(
            err,
            Err(PapercheckError::PromptFileUnreadable { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_prompt_unreachable_host_is_setup_error() {
        // Reserved TEST-NET-1 address; connection fails fast.
        let err = fetch_prompt("http://192.0.2.1/prompt.txt", 1).await;
        assert!(matches!(err, Err(PapercheckError::PromptFetchFailed { .. })));
    }
}
