//! Structured extraction: one JSON-mode inference call producing the
//! financial statement.
//!
//! The multiplier inferred upstream is baked into the system prompt, so the
//! model emits base-unit values directly — the pipeline never rescales
//! numbers after extraction. The reply must parse as JSON; a malformed reply
//! is surfaced as [`ExtractError::MalformedResponse`] rather than retried,
//! since retry/backoff policy belongs to the caller, not the pipeline.
//! Schema validation deeper than JSON-parseability is the consistency
//! validator's job.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::bounded_prefix;
use crate::prompts::{extraction_system_prompt, extraction_user_prompt};
use crate::statement::{FinancialStatement, UnitMultiplier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Extract a structured statement from normalized text.
///
/// Issues exactly one JSON-mode inference call over the first
/// `config.extract_prefix_chars` characters.
///
/// # Errors
///
/// * [`ExtractError::ServiceUnavailable`] — the call's transport failed or
///   timed out.
/// * [`ExtractError::MalformedResponse`] — the reply is not parseable JSON.
pub async fn extract_statement(
    provider: &Arc<dyn LlmProvider>,
    text: &str,
    multiplier: UnitMultiplier,
    config: &ExtractionConfig,
) -> Result<FinancialStatement, ExtractError> {
    let excerpt = bounded_prefix(text, config.extract_prefix_chars);

    let system = config
        .system_prompt
        .clone()
        .unwrap_or_else(|| extraction_system_prompt(multiplier));

    let request = CompletionRequest {
        model: config.extract_model.clone(),
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(extraction_user_prompt(excerpt)),
        ],
        temperature: config.temperature,
        max_tokens: Some(config.max_tokens),
        json_object: true,
    };

    let reply = provider
        .chat(request)
        .await
        .map_err(|e| ExtractError::ServiceUnavailable {
            stage: "extraction",
            detail: e.to_string(),
        })?;

    debug!("Extraction reply: {} chars", reply.len());
    parse_statement_reply(&reply)
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\n(.*)\n```\s*$").unwrap());

/// Parse the model's reply into a [`FinancialStatement`].
///
/// Models occasionally wrap JSON in markdown fences despite the prompt
/// saying not to; strip one outer fence pair before parsing. Anything that
/// still fails `serde_json` is a malformed response.
pub fn parse_statement_reply(reply: &str) -> Result<FinancialStatement, ExtractError> {
    let trimmed = reply.trim();
    let body = match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps.get(1).map_or(trimmed, |m| m.as_str()),
        None => trimmed,
    };

    serde_json::from_str(body).map_err(|e| ExtractError::MalformedResponse {
        detail: e.to_string(),
        snippet: bounded_prefix(trimmed, 120).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;

    const STATEMENT_JSON: &str = r#"{
        "balance_sheet": {
            "assets": { "total_assets": 100.0 },
            "liabilities": { "total_liabilities": 60.0 },
            "owners_equity": { "total_shareholders_equity": 40.0 }
        },
        "retained_earnings": {
            "opening_balance": 100.0,
            "net_income": 20.0,
            "dividends": 10.0,
            "closing_balance": 110.0
        }
    }"#;

    #[test]
    fn plain_json_reply_parses() {
        let stmt = parse_statement_reply(STATEMENT_JSON).expect("parses");
        assert_eq!(stmt.balance_sheet.assets.total_assets, 100.0);
        assert_eq!(stmt.retained_earnings.closing_balance, 110.0);
    }

    #[test]
    fn fenced_json_reply_parses() {
        let fenced = format!("```json\n{STATEMENT_JSON}\n```");
        let stmt = parse_statement_reply(&fenced).expect("parses after fence strip");
        assert_eq!(stmt.balance_sheet.liabilities.total_liabilities, 60.0);
    }

    #[test]
    fn prose_reply_is_malformed() {
        let err = parse_statement_reply("I'm sorry, I cannot extract that.").unwrap_err();
        match err {
            ExtractError::MalformedResponse { snippet, .. } => {
                assert!(snippet.starts_with("I'm sorry"));
            }
            other => panic!("expected MalformedResponse, got {other}"),
        }
    }

    #[tokio::test]
    async fn request_uses_json_mode_and_bakes_in_multiplier() {
        let mock = Arc::new(MockProvider::with_responses(vec![STATEMENT_JSON.into()]));
        let provider: Arc<dyn LlmProvider> = mock.clone();
        let config = ExtractionConfig::default();

        extract_statement(&provider, "Total assets 100", UnitMultiplier::Millions, &config)
            .await
            .expect("extraction succeeds");

        let recorded = mock.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].json_object, "must request a JSON object reply");
        assert_eq!(recorded[0].model, "mistral-large-latest");
        assert!(
            recorded[0].messages[0].content.contains("1000000"),
            "system prompt must carry the multiplier"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_service_unavailable() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider::failing());
        let err = extract_statement(
            &provider,
            "text",
            UnitMultiplier::Units,
            &ExtractionConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ServiceUnavailable {
                stage: "extraction",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn input_is_truncated_to_extraction_prefix() {
        let mock = Arc::new(MockProvider::with_responses(vec![STATEMENT_JSON.into()]));
        let provider: Arc<dyn LlmProvider> = mock.clone();
        let config = ExtractionConfig::builder()
            .extract_prefix_chars(1_000)
            .classify_prefix_chars(500)
            .build()
            .expect("valid");

        let text = "y".repeat(50_000);
        extract_statement(&provider, &text, UnitMultiplier::Units, &config)
            .await
            .expect("extraction succeeds");

        let user = &mock.recorded_requests()[0].messages[1].content;
        assert!(
            user.chars().count() < 1_200,
            "user prompt must be bounded, sent {} chars",
            user.chars().count()
        );
    }
}
