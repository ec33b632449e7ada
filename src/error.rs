//! Error types for the finstmt library.
//!
//! One enum, one variant per failure mode, so callers can match on exactly
//! the failures they care about. A failed unit classification is deliberately
//! *not* represented here: it degrades to multiplier 1 inside the classifier
//! (see [`crate::pipeline::classify::ClassificationOutcome`]) because an
//! implausibly-small number is a recoverable downstream warning, whereas
//! aborting the whole run on a cosmetic classification miss is not.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the finstmt library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease the download timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Normalization errors ──────────────────────────────────────────────
    /// The PDF could not be parsed into text.
    #[error("Unreadable document '{path}': {detail}\nThe file may be corrupt, encrypted, or image-only (scanned).")]
    UnreadableDocument { path: PathBuf, detail: String },

    /// Normalization succeeded but produced no text.
    ///
    /// Prompting on empty input wastes an inference call and reliably
    /// produces garbage, so this is a hard stop rather than a warning.
    #[error("Document contains no extractable text.\nScanned/image-only PDFs need OCR before extraction.")]
    EmptyContent,

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider was configured and none could be built from the environment.
    #[error("LLM provider is not configured.\n{hint}")]
    ProviderNotConfigured { hint: String },

    /// An inference call's transport failed or timed out.
    #[error("LLM service unavailable during {stage}: {detail}")]
    ServiceUnavailable { stage: &'static str, detail: String },

    /// The extraction reply could not be parsed as JSON.
    ///
    /// Not retried here: a malformed reply means either a transient backend
    /// fault or a prompt/schema mismatch, and retry policy is a caller
    /// concern, not a pipeline one.
    #[error("Extraction reply is not valid JSON: {detail}\nReply began: {snippet:?}")]
    MalformedResponse { detail: String, snippet: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
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
