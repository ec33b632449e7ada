//! Extraction entry points: the pipeline orchestrator.
//!
//! A single linear path — `Start → Normalized → Classified → Extracted →
//! Validated → Done` — where any stage failure propagates immediately as one
//! terminal [`ExtractError`]. There is no partial recovery and no partial
//! result: the caller gets a complete statement (with zero or more advisory
//! warnings embedded) or an unambiguous failure.
//!
//! Staged input resources (downloaded files, byte-buffer temp files) are
//! scoped values dropped as soon as normalization finishes, so they are
//! released on every exit path — success, error, or panic — and never
//! outlive the run that created them.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::llm::{LlmProvider, MistralProvider};
use crate::pipeline::{classify, input, normalize, structured, validate};
use crate::statement::FinancialStatement;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Extract a financial statement from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Extraction configuration
///
/// # Returns
/// `Ok(FinancialStatement)` on success. Validation findings do not fail the
/// run; they are attached under `extraction_warnings`.
///
/// # Errors
/// Returns `Err(ExtractError)` when any stage fails:
/// - File not found / not a PDF / download failed
/// - Unreadable or empty document
/// - Extraction call failed or returned malformed JSON
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let text = normalize::normalize(resolved.path()).await?;
    // The raw document is no longer needed; release staged storage before
    // the (slow) inference stages run.
    drop(resolved);

    let statement = run_llm_stages(&text, config).await?;

    info!(
        "Extraction complete: {}ms total",
        total_start.elapsed().as_millis()
    );
    Ok(statement)
}

/// Extract a financial statement from PDF bytes in memory.
///
/// The recommended API when the PDF arrives from an upload, database, or
/// network stream. `filename` is used only for logging — the staged copy
/// gets a collision-resistant temp name, so concurrent uploads with the
/// same caller-supplied filename cannot clobber each other.
pub async fn extract_from_bytes(
    bytes: &[u8],
    filename: &str,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    info!("Starting extraction from {} bytes: {}", bytes.len(), filename);

    let staged = input::stage_bytes(bytes)?;
    let text = normalize::normalize(staged.path()).await?;
    drop(staged);

    run_llm_stages(&text, config).await
}

/// Extract a financial statement from already-normalized text.
///
/// Skips staging and normalization; useful when the caller has its own
/// document-to-text step. Applies the same empty-content guard as the
/// normalizer.
pub async fn extract_from_text(
    text: &str,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    normalize::ensure_nonempty(text)?;
    run_llm_stages(text, config).await
}

/// Extract and write the statement as a JSON document.
///
/// Uses atomic write (temp file + rename) to prevent partial files. Output
/// naming is entirely the caller's: each run should be given a fresh,
/// non-colliding path.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    let statement = extract(input_str, config).await?;
    let path = output_path.as_ref();

    let json = serde_json::to_string_pretty(&statement)
        .map_err(|e| ExtractError::Internal(format!("serialising statement: {e}")))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(statement)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Classification → extraction → validation over normalized text.
///
/// The two inference calls are strictly ordered: the classifier's multiplier
/// parameterises the extraction prompt, so they can never run concurrently
/// within one run.
async fn run_llm_stages(
    text: &str,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    let provider = resolve_provider(config)?;

    let outcome = classify::infer_multiplier(&provider, text, config).await;
    let multiplier = outcome.multiplier();

    let mut statement = structured::extract_statement(&provider, text, multiplier, config).await?;

    let warnings = validate::validate(&statement);
    if !warnings.is_empty() {
        info!("Validation found {} issue(s)", warnings.len());
        statement.extraction_warnings = Some(warnings);
    }

    Ok(statement)
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; used as-is. This is also the
///    seam tests use to inject a mock.
/// 2. **Environment** — a [`MistralProvider`] built from `MISTRAL_API_KEY`.
fn resolve_provider(config: &ExtractionConfig) -> Result<Arc<dyn LlmProvider>, ExtractError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let provider =
        MistralProvider::from_env(config.api_timeout_secs).map_err(|e| {
            ExtractError::ProviderNotConfigured {
                hint: format!(
                    "Set MISTRAL_API_KEY, or pass a provider via ExtractionConfig::builder().provider(…).\n\
                     Error: {e}"
                ),
            }
        })?;

    Ok(Arc::new(provider))
}
