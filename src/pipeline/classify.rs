//! Unit classification: infer the document's reporting-unit multiplier.
//!
//! One cheap inference call over a bounded prefix of the normalized text,
//! asking a closed-ended question whose answer is a bare integer. The stage
//! **fails open**: any transport error, unparseable reply, or
//! out-of-set value degrades to multiplier 1 rather than aborting the run.
//! An incorrect default shows up downstream as implausibly small numbers —
//! a recoverable, visible condition — whereas crashing the pipeline on a
//! cosmetic classification miss would not be. No retry is performed; a
//! single failed classification silently degrades.
//!
//! The fallback is a named outcome, not a swallowed error, so tests can
//! assert exactly which path was taken.

use crate::config::ExtractionConfig;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::bounded_prefix;
use crate::prompts::classification_prompt;
use crate::statement::UnitMultiplier;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// The classifier's reply is short; anything longer is chatter we will
/// parse around or discard.
const CLASSIFY_MAX_TOKENS: usize = 32;

/// Result of the unit-classification stage.
///
/// `Degraded` is the recognised, named form of the fail-open fallback —
/// recovered locally, logged, and never escalated to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// The reply parsed to a member of the closed multiplier set.
    Inferred(UnitMultiplier),
    /// The call failed or the reply was unusable; multiplier forced to 1.
    Degraded { detail: String },
}

impl ClassificationOutcome {
    /// The multiplier to use downstream. Degradation always yields 1.
    pub fn multiplier(&self) -> UnitMultiplier {
        match self {
            ClassificationOutcome::Inferred(m) => *m,
            ClassificationOutcome::Degraded { .. } => UnitMultiplier::Units,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ClassificationOutcome::Degraded { .. })
    }
}

/// Infer the reporting-unit multiplier for `text`.
///
/// Issues exactly one inference call over the first
/// `config.classify_prefix_chars` characters. Never fails — see
/// [`ClassificationOutcome`].
pub async fn infer_multiplier(
    provider: &Arc<dyn LlmProvider>,
    text: &str,
    config: &ExtractionConfig,
) -> ClassificationOutcome {
    let excerpt = bounded_prefix(text, config.classify_prefix_chars);

    let request = CompletionRequest {
        model: config.classify_model.clone(),
        messages: vec![ChatMessage::user(classification_prompt(excerpt))],
        temperature: config.temperature,
        max_tokens: Some(CLASSIFY_MAX_TOKENS),
        json_object: false,
    };

    let outcome = match provider.chat(request).await {
        Ok(reply) => parse_multiplier_reply(&reply),
        Err(e) => ClassificationOutcome::Degraded {
            detail: format!("classification call failed: {e}"),
        },
    };

    match &outcome {
        ClassificationOutcome::Inferred(m) => {
            debug!("Inferred unit multiplier: {}", m.factor());
        }
        ClassificationOutcome::Degraded { detail } => {
            warn!("Unit classification degraded to multiplier 1: {detail}");
        }
    }
    outcome
}

static RE_FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Parse a classifier reply into an outcome.
///
/// Fast path: the trimmed reply is the bare integer we asked for. Fallback:
/// pull the first digit run out of a chatty reply ("The multiplier is
/// 1000000."). Either way the value must belong to the closed set
/// {1, 1000, 1000000, 1000000000}; anything else degrades.
pub fn parse_multiplier_reply(reply: &str) -> ClassificationOutcome {
    let trimmed = reply.trim();

    let candidate = match trimmed.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => RE_FIRST_INTEGER
            .find(trimmed)
            .and_then(|m| m.as_str().parse::<u64>().ok()),
    };

    match candidate {
        Some(n) => match UnitMultiplier::from_factor(n) {
            Some(m) => ClassificationOutcome::Inferred(m),
            None => ClassificationOutcome::Degraded {
                detail: format!("reply value {n} is not in the multiplier set"),
            },
        },
        None => ClassificationOutcome::Degraded {
            detail: format!("no integer found in reply {:?}", bounded_prefix(trimmed, 80)),
        },
    }
}
