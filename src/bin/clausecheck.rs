//! CLI binary for clausecheck.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints or writes the export.

use anyhow::{Context, Result};
use clap::Parser;
use clausecheck::{
    analyze_file, export_to_file, extract_only, report, AnalysisConfig, DEFAULT_MODEL,
    SUPPORTED_MODELS,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a contract, canonical JSON to stdout
  clausecheck contract.pdf

  # Markdown report to a file
  clausecheck contract.pdf --report -o analysis.md

  # Use the more thorough pro model
  clausecheck --model gemini-1.5-pro-latest msa.pdf

  # Preview the extracted text (no API key needed)
  clausecheck --extract-only contract.pdf

RISK CATEGORIES DETECTED:
  Vague Payment Terms, Uncapped Liability, Ambiguous Scope of Work,
  Missing Termination Terms, Missing Insurance Requirements,
  Broad Indemnification, Unilateral Terms

SUPPORTED MODELS:
  gemini-2.0-flash         fastest, free tier, default
  gemini-1.5-flash-latest  thorough flash tier
  gemini-1.5-flash         balanced
  gemini-1.5-pro-latest    most thorough, tighter rate limits

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY     Google AI API key (https://aistudio.google.com/apikey)

NOTES:
  Only text-based PDFs are supported — scanned documents need OCR, which
  clausecheck does not perform. Findings are AI-generated; always review
  them against the original contract with legal counsel.
"#;

/// Identify legal and financial risks in PDF contracts using Google Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "clausecheck",
    version,
    about = "Identify legal and financial risks in PDF contracts using Google Gemini",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the contract PDF.
    input: PathBuf,

    /// Write the export to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Google AI API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier.
    #[arg(long, default_value = DEFAULT_MODEL,
          value_parser = clap::builder::PossibleValuesParser::new(SUPPORTED_MODELS))]
    model: String,

    /// Emit the grouped markdown report instead of canonical JSON.
    #[arg(long)]
    report: bool,

    /// Print the extracted text and exit; no API key needed.
    #[arg(long)]
    extract_only: bool,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, default_value_t = 8192)]
    max_tokens: u32,

    /// API call timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the export itself.
    #[arg(short, long)]
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
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let bytes = tokio::fs::read(&cli.input)
            .await
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        let extracted = extract_only(&bytes).await.context("Extraction failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} chars, {} words{}",
                green("✔"),
                extracted.char_count,
                extracted.word_count,
                if extracted.is_degraded() {
                    format!("  {}", yellow("(degraded: likely image-based)"))
                } else {
                    String::new()
                }
            );
        }
        println!("{}", extracted.text);
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = AnalysisConfig::builder()
        .api_key(cli.api_key.clone().unwrap_or_default())
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_tokens)
        .api_timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let spinner = if !cli.quiet {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Analyzing with {}…", cli.model));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = analyze_file(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = result.context("Analysis failed")?;

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        if output.degraded_input {
            eprintln!(
                "{}  very little text extracted ({} chars) — the document may be \
                 scanned or image-based",
                yellow("⚠"),
                output.stats.extracted_chars
            );
        }
        let tick = if output.result.is_empty() {
            green("✔")
        } else {
            yellow("⚠")
        };
        eprintln!(
            "{}  {} risk(s) in {} categor(ies)  {}",
            tick,
            bold(&output.stats.finding_count.to_string()),
            output.result.distinct_risk_types(),
            dim(&format!(
                "{}ms total ({}ms model)",
                output.stats.total_duration_ms, output.stats.llm_duration_ms
            )),
        );
        if output.stats.dropped_findings > 0 {
            eprintln!(
                "{}  {} malformed finding(s) dropped by validation",
                yellow("⚠"),
                output.stats.dropped_findings
            );
        }
    }

    // ── Export ───────────────────────────────────────────────────────────
    let source = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.input.display().to_string());

    let export = if cli.report {
        report::markdown_report(&output, &source)
    } else {
        report::canonical_json(&output.result).context("Failed to serialise result")?
    };

    if let Some(ref path) = cli.output {
        export_to_file(path, &export)
            .await
            .context("Failed to write export")?;
        if !cli.quiet {
            eprintln!("{}  wrote {}", green("✔"), bold(&path.display().to_string()));
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(export.as_bytes())
            .context("Failed to write to stdout")?;
        if !export.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}
