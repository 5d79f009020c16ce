//! Input validation: read the user-supplied PDF into memory.
//!
//! The whole file is read up front because the request body embeds the
//! document as base64 — there is no streaming upload in the API exchange.
//! We validate the `%PDF` magic bytes before any network activity so the
//! user gets a meaningful error instead of a service-side rejection minutes
//! later.

use crate::error::PapercheckError;
use std::path::Path;
use tracing::debug;

/// Read and validate a local PDF file.
///
/// Checks existence, read permission, and the `%PDF` magic bytes. Any
/// failure aborts the run before the request is built.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, PapercheckError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PapercheckError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PapercheckError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(PapercheckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    validate_magic(&bytes, path)?;
    debug!("Read PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Verify the PDF magic bytes on an in-memory document.
pub fn validate_magic(bytes: &[u8], path: &Path) -> Result<(), PapercheckError> {
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    if &magic != b"%PDF" {
        return Err(PapercheckError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Validate the credential string before any network activity.
///
/// An empty or whitespace-only key rejects the run immediately.
pub fn require_api_key(api_key: &str) -> Result<&str, PapercheckError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(PapercheckError::MissingApiKey);
    }
    Ok(key)
}
