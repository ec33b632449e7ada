//! Input resolution: stage a user-supplied path, URL, or byte buffer to a
//! local file.
//!
//! ## Why stage to a temp file?
//!
//! The text extractor reads from a file-system path, and uploads arrive as
//! byte buffers. Staging into `tempfile`-managed storage gives every run a
//! collision-resistant path (never derived from the caller-supplied
//! filename, so concurrent uploads of `report.pdf` cannot clobber each
//! other) and guarantees cleanup when the handle drops — on success, error,
//! or panic alike. We validate the PDF magic bytes (`%PDF`) before returning
//! so callers get a meaningful error rather than a parser failure deep in
//! normalization.

use crate::error::ExtractError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

/// The resolved input — a local path, or staged temp storage that lives
/// exactly as long as this value.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
    /// Input was a byte buffer; staged to a named temp file.
    Staged(NamedTempFile),
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
            ResolvedInput::Staged(f) => f.path(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Stage an in-memory byte buffer to a temp file with a fresh, non-colliding
/// name.
pub fn stage_bytes(bytes: &[u8]) -> Result<ResolvedInput, ExtractError> {
    check_magic_bytes(bytes, Path::new("<uploaded bytes>"))?;

    let mut tmp = NamedTempFile::new()
        .map_err(|e| ExtractError::Internal(format!("staging tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ExtractError::Internal(format!("staging write: {e}")))?;

    debug!("Staged {} bytes to {}", bytes.len(), tmp.path().display());
    Ok(ResolvedInput::Staged(tmp))
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, ExtractError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, ExtractError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let temp_dir = TempDir::new().map_err(|e| ExtractError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join("downloaded.pdf");

    check_magic_bytes(&bytes, &file_path)?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ExtractError::Internal(format!("Failed to write temp file: {e}")))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

fn check_magic_bytes(bytes: &[u8], path: &Path) -> Result<(), ExtractError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn staged_bytes_require_pdf_magic() {
        let err = stage_bytes(b"PK\x03\x04zipfile").unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));

        let err = stage_bytes(b"").unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
    }

    #[test]
    fn staged_file_is_removed_on_drop() {
        let staged = stage_bytes(b"%PDF-1.7\nfake body").expect("staging succeeds");
        let path = staged.path().to_path_buf();
        assert!(path.exists(), "staged file must exist while handle is live");
        drop(staged);
        assert!(!path.exists(), "staged file must be removed on drop");
    }

    #[test]
    fn nonexistent_local_file_is_file_not_found() {
        let err = resolve_local("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_local_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"just some text").expect("write");
        let err = resolve_local(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
    }
}
