//! Pipeline stages for financial-statement extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the text-extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ classify ──▶ structured ──▶ validate
//! (URL/path) (pdf text)  (multiplier)  (JSON stmt)   (warnings)
//! ```
//!
//! 1. [`input`]      — stage the user-supplied path, URL, or byte buffer to
//!    a local file; scoped temp resources are released on every exit path
//! 2. [`normalize`]  — extract the text layer; runs in `spawn_blocking`
//!    because PDF parsing is CPU-bound
//! 3. [`classify`]   — one cheap LLM call over a bounded prefix to infer the
//!    reporting-unit multiplier; fails open to 1
//! 4. [`structured`] — one JSON-mode LLM call over a larger bounded prefix
//!    with the multiplier baked into the prompt; the only fatal LLM stage
//! 5. [`validate`]   — pure accounting-identity checks producing advisory
//!    warnings; never mutates the extracted values

pub mod classify;
pub mod input;
pub mod normalize;
pub mod structured;
pub mod validate;

/// Truncate `text` to at most `max_chars` characters, respecting char
/// boundaries.
///
/// Both LLM stages bound their input with this before prompting; sending a
/// whole 10-K would blow past cost and latency ceilings for no accuracy
/// gain.
pub(crate) fn bounded_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
