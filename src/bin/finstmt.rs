//! CLI binary for finstmt.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints the extracted statement as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use finstmt::{extract, extract_to_file, ExtractionConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract to stdout
  finstmt annual_report.pdf

  # Extract to a file (atomic write)
  finstmt annual_report.pdf -o statement.json

  # Extract from a URL
  finstmt https://example.com/10k.pdf --pretty

  # Use different models
  finstmt report.pdf --extract-model mistral-large-latest --classify-model open-mistral-nemo

  # Widen the extraction window for filings with deep statements
  finstmt report.pdf --extract-prefix-chars 60000

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY    API key for the Mistral inference backend

OUTPUT:
  A JSON financial statement. When the consistency validator finds
  accounting-identity violations (balance sheet, retained-earnings
  roll-forward), an "extraction_warnings" array is embedded in the output;
  the extracted values themselves are never altered.

SETUP:
  1. Set API key:  export MISTRAL_API_KEY=...
  2. Extract:      finstmt annual_report.pdf -o statement.json
"#;

/// Extract structured, consistency-checked financial statements from PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "finstmt",
    version,
    about = "Extract structured, consistency-checked financial statements from PDFs using LLMs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "FINSTMT_OUTPUT")]
    output: Option<PathBuf>,

    /// Model for the unit-classification call.
    #[arg(long, env = "FINSTMT_CLASSIFY_MODEL", default_value = "open-mistral-nemo")]
    classify_model: String,

    /// Model for the structured-extraction call.
    #[arg(long, env = "FINSTMT_EXTRACT_MODEL", default_value = "mistral-large-latest")]
    extract_model: String,

    /// Characters of document text sent to the classifier.
    #[arg(long, env = "FINSTMT_CLASSIFY_PREFIX_CHARS", default_value_t = 5_000)]
    classify_prefix_chars: usize,

    /// Characters of document text sent to the extractor.
    #[arg(long, env = "FINSTMT_EXTRACT_PREFIX_CHARS", default_value_t = 30_000)]
    extract_prefix_chars: usize,

    /// Max LLM output tokens for the extraction call.
    #[arg(long, env = "FINSTMT_MAX_TOKENS", default_value_t = 8_192)]
    max_tokens: usize,

    /// Per-inference-call timeout in seconds.
    #[arg(long, env = "FINSTMT_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, env = "FINSTMT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Path to a text file containing a custom extraction system prompt.
    #[arg(long, env = "FINSTMT_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long, env = "FINSTMT_PRETTY")]
    pretty: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FINSTMT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FINSTMT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    // ── Run extraction ───────────────────────────────────────────────────
    let statement = if let Some(ref output_path) = cli.output {
        let statement = extract_to_file(&cli.input, output_path, &config)
            .await
            .context("Extraction failed")?;
        if !cli.quiet {
            eprintln!("Wrote {}", output_path.display());
        }
        statement
    } else {
        let statement = extract(&cli.input, &config)
            .await
            .context("Extraction failed")?;

        let json = if cli.pretty {
            serde_json::to_string_pretty(&statement)
        } else {
            serde_json::to_string(&statement)
        }
        .context("Failed to serialise statement")?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
        statement
    };

    if !cli.quiet {
        if let Some(ref warnings) = statement.extraction_warnings {
            for w in warnings {
                eprintln!("warning: {w}");
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .classify_model(cli.classify_model.clone())
        .extract_model(cli.extract_model.clone())
        .classify_prefix_chars(cli.classify_prefix_chars)
        .extract_prefix_chars(cli.extract_prefix_chars)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {path:?}"))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
