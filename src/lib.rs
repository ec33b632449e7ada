//! # finstmt
//!
//! Extract structured, consistency-checked financial statements from PDF
//! documents using LLMs.
//!
//! ## Why this crate?
//!
//! Financial statements are published as PDFs whose numbers are meaningless
//! without their context: a balance sheet "in millions" reads as `1,234`
//! where the true figure is 1,234,000,000. Naive extraction silently produces
//! figures that are off by three to nine orders of magnitude, and LLM
//! extraction on top of that occasionally drops or misreads a line item.
//! This crate pairs a cheap unit-classification call with a precision
//! JSON-mode extraction call, then runs deterministic accounting identities
//! over the result so inconsistent output is flagged rather than trusted.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL, stage bytes
//!  ├─ 2. Normalize  extract the text layer (CPU-bound, spawn_blocking)
//!  ├─ 3. Classify   one cheap LLM call → unit multiplier (1 / 1e3 / 1e6 / 1e9)
//!  ├─ 4. Extract    one JSON-mode LLM call with the multiplier baked in
//!  ├─ 5. Validate   balance-sheet identity + retained-earnings roll-forward
//!  └─ 6. Output     FinancialStatement (+ advisory extraction_warnings)
//! ```
//!
//! Stages 3 and 4 are strictly ordered — the classifier's answer
//! parameterises the extraction prompt — so a single run never parallelises
//! its two inference calls. Independent runs share no mutable state and may
//! execute concurrently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use finstmt::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from MISTRAL_API_KEY
//!     let config = ExtractionConfig::default();
//!     let statement = extract("annual_report.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&statement)?);
//!     if let Some(ref warnings) = statement.extraction_warnings {
//!         for w in warnings {
//!             eprintln!("warning: {w}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `finstmt` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! finstmt = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! The caller receives either a complete [`FinancialStatement`] — with zero
//! or more advisory warnings embedded — or a single typed
//! [`ExtractError`]. There is no partial result. The only silently absorbed
//! fault is a failed unit classification, which degrades to multiplier 1
//! (see [`pipeline::classify::ClassificationOutcome`]).

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod statement;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{extract, extract_from_bytes, extract_from_text, extract_sync, extract_to_file};
pub use llm::{ChatMessage, CompletionRequest, LlmProvider, MistralProvider, Role};
pub use statement::{BalanceSheet, FinancialStatement, RetainedEarnings, UnitMultiplier};
