//! Normalization: turn a staged PDF into extraction-ready text.
//!
//! Uses the `pdf-extract` text layer rather than rasterising pages: the
//! numbers in a financial statement live in the text layer, and the LLM
//! stages downstream only need readable content, not pixel-faithful layout.
//! Page content is concatenated in document order; `pdf-extract` emits a
//! blank line between pages, which is enough of a boundary for the
//! extraction model to keep tables from adjacent pages apart.
//!
//! PDF parsing is CPU-bound, so it runs under `spawn_blocking` to keep it
//! off the async executor's hot path.

use crate::error::ExtractError;
use std::path::Path;
use tokio::task;
use tracing::debug;

/// Extract the text layer from the PDF at `path`.
///
/// # Errors
///
/// * [`ExtractError::UnreadableDocument`] — the file is not a parseable PDF
///   (corrupt, encrypted, or truncated).
/// * [`ExtractError::EmptyContent`] — parsing succeeded but the document has
///   no text layer (typically a scanned, image-only PDF). This is a hard
///   stop: prompting on empty input wastes an inference call and reliably
///   produces garbage.
pub async fn normalize(path: &Path) -> Result<String, ExtractError> {
    let path_buf = path.to_path_buf();
    let text = task::spawn_blocking(move || {
        pdf_extract::extract_text(&path_buf).map_err(|e| ExtractError::UnreadableDocument {
            path: path_buf.clone(),
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("normalization task: {e}")))??;

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    debug!("Normalized {} chars of text", text.len());
    Ok(text)
}

/// Guard shared with [`crate::extract_from_text`], which accepts
/// already-normalized text and must apply the same empty-content policy.
pub fn ensure_nonempty(text: &str) -> Result<(), ExtractError> {
    if text.trim().is_empty() {
        Err(ExtractError::EmptyContent)
    } else {
        Ok(())
    }
}
