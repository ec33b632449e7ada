//! End-to-end integration tests for finstmt.
//!
//! The mock-provider tests always run and exercise the full LLM portion of
//! the pipeline (classification → extraction → validation) without network
//! access. Live tests make real Mistral API calls and are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run live tests with:
//!   E2E_ENABLED=1 MISTRAL_API_KEY=... cargo test --test e2e -- --nocapture

use finstmt::{
    extract, extract_from_bytes, extract_from_text, ExtractError, ExtractionConfig,
};
use finstmt::llm::MockProvider;
use std::path::PathBuf;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A plausible normalized statement excerpt, units disclosure up front.
const DOCUMENT_TEXT: &str = "\
ACME CORPORATION\n\
CONSOLIDATED BALANCE SHEET\n\
(In millions, except per-share data)\n\n\
Total assets                          1,000\n\
Total liabilities                       600\n\
Total shareholders' equity              400\n\n\
RETAINED EARNINGS\n\
Opening balance                         100\n\
Net income                               20\n\
Dividends paid                          (10)\n\
Closing balance                         110\n";

/// Extraction reply consistent with DOCUMENT_TEXT at multiplier 1e6.
const CONSISTENT_REPLY: &str = r#"{
    "balance_sheet": {
        "assets": { "total_assets": 1000000000.0 },
        "liabilities": { "total_liabilities": 600000000.0 },
        "owners_equity": { "total_shareholders_equity": 400000000.0 }
    },
    "retained_earnings": {
        "opening_balance": 100000000.0,
        "net_income": 20000000.0,
        "dividends": -10000000.0,
        "closing_balance": 110000000.0
    },
    "income_statement": { "revenue": 5000000000.0 }
}"#;

fn config_with(mock: Arc<MockProvider>) -> ExtractionConfig {
    ExtractionConfig::builder()
        .provider(mock)
        .build()
        .expect("valid config")
}

/// Skip a live test unless E2E_ENABLED and MISTRAL_API_KEY are both set.
macro_rules! e2e_skip_unless_live {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run live e2e tests");
            return;
        }
        if std::env::var("MISTRAL_API_KEY").is_err() {
            println!("SKIP — MISTRAL_API_KEY not set");
            return;
        }
    };
}

// ── Mock-provider pipeline tests (no network, always run) ────────────────────

#[tokio::test]
async fn consistent_statement_passes_without_warnings() {
    let mock = Arc::new(MockProvider::with_responses(vec![
        "1000000".into(),
        CONSISTENT_REPLY.into(),
    ]));
    let config = config_with(mock.clone());

    let stmt = extract_from_text(DOCUMENT_TEXT, &config)
        .await
        .expect("pipeline succeeds");

    assert!(stmt.extraction_warnings.is_none(), "statement reconciles");
    assert_eq!(stmt.balance_sheet.assets.total_assets, 1_000_000_000.0);

    // Passthrough content survives.
    let json = serde_json::to_value(&stmt).expect("serialises");
    assert_eq!(json["income_statement"]["revenue"], 5_000_000_000.0);

    // Exactly two calls, classification first and truncated, extraction in
    // JSON mode — the pipeline's call discipline in one place.
    let requests = mock.recorded_requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].json_object);
    assert!(requests[1].json_object);
    assert!(requests[0].messages[0].content.contains("In millions"));
    assert!(requests[1].messages[0].content.contains("1000000"));
}

#[tokio::test]
async fn inconsistent_statement_carries_warnings_in_output_json() {
    let inconsistent = CONSISTENT_REPLY.replace("400000000.0", "300000000.0");
    let mock = Arc::new(MockProvider::with_responses(vec![
        "1000000".into(),
        inconsistent,
    ]));
    let config = config_with(mock);

    let stmt = extract_from_text(DOCUMENT_TEXT, &config)
        .await
        .expect("inconsistency is advisory, not fatal");

    let json = serde_json::to_value(&stmt).expect("serialises");
    let warnings = json["extraction_warnings"]
        .as_array()
        .expect("warnings array present");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0]
        .as_str()
        .unwrap()
        .contains("Balance Sheet Mismatch"));
}

#[tokio::test]
async fn chatty_classifier_degrades_and_pipeline_continues() {
    let mock = Arc::new(MockProvider::with_responses(vec![
        "The units are not specified anywhere in this document.".into(),
        CONSISTENT_REPLY.into(),
    ]));
    let config = config_with(mock.clone());

    extract_from_text(DOCUMENT_TEXT, &config)
        .await
        .expect("degraded classification must not be fatal");

    // The extraction prompt must carry the fallback multiplier of 1.
    let system = &mock.recorded_requests()[1].messages[0].content;
    assert!(
        system.contains("multiplier of 1."),
        "fallback multiplier must reach the prompt, got: {system}"
    );
}

#[tokio::test]
async fn malformed_extraction_reply_is_a_typed_failure() {
    let mock = Arc::new(MockProvider::with_responses(vec![
        "1000000".into(),
        "Here is the data you asked for: assets are one billion.".into(),
    ]));
    let config = config_with(mock);

    let err = extract_from_text(DOCUMENT_TEXT, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::MalformedResponse { .. }));
}

#[tokio::test]
async fn empty_and_whitespace_text_is_empty_content() {
    let config = config_with(Arc::new(MockProvider::default()));
    for text in ["", "   ", "\n\t\n"] {
        let err = extract_from_text(text, &config).await.unwrap_err();
        assert!(matches!(err, ExtractError::EmptyContent), "input: {text:?}");
    }
}

#[tokio::test]
async fn non_pdf_bytes_fail_before_any_inference_call() {
    let mock = Arc::new(MockProvider::default());
    let config = config_with(mock.clone());

    let err = extract_from_bytes(b"<html>not a pdf</html>", "report.pdf", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NotAPdf { .. }));
    assert!(
        mock.recorded_requests().is_empty(),
        "no inference call may be spent on unreadable input"
    );
}

#[tokio::test]
async fn nonexistent_path_is_file_not_found() {
    let config = config_with(Arc::new(MockProvider::default()));
    let err = extract("/definitely/not/a/real/file.pdf", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }));
}

// ── Live Mistral tests (gated) ───────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

#[tokio::test]
async fn live_extract_sample_statement() {
    e2e_skip_unless_live!();

    let pdf_path = test_cases_dir().join("sample_statement.pdf");
    if !pdf_path.exists() {
        println!("SKIP — test file not found: {}", pdf_path.display());
        return;
    }

    let config = ExtractionConfig::default();
    let stmt = extract(pdf_path.to_string_lossy(), &config)
        .await
        .expect("live extraction should succeed");

    assert!(
        stmt.balance_sheet.assets.total_assets != 0.0
            || !stmt.extra.is_empty(),
        "live extraction should produce some content"
    );
    println!(
        "--- BEGIN OUTPUT ---\n{}\n--- END OUTPUT ---",
        serde_json::to_string_pretty(&stmt).unwrap()
    );
}

#[tokio::test]
async fn live_classification_over_plain_text() {
    e2e_skip_unless_live!();

    let config = ExtractionConfig::default();
    let stmt = extract_from_text(DOCUMENT_TEXT, &config)
        .await
        .expect("live text extraction should succeed");

    println!(
        "Live statement: {}",
        serde_json::to_string_pretty(&stmt).unwrap()
    );
}
