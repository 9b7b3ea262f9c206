//! # clausecheck
//!
//! Identify legal and financial risks in PDF contracts using Google Gemini.
//!
//! ## What this crate does
//!
//! The intelligence lives entirely in the external model; the local code is
//! careful plumbing. A contract PDF becomes plain text, the text is embedded
//! in a fixed risk-analysis prompt behind explicit boundary markers, one
//! HTTPS call asks Gemini for JSON-structured output, and the response is
//! validated field-by-field against a fixed schema before anything reaches
//! the caller.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   pdf-extract text layer (no OCR)
//!  ├─ 2. Prompt    fixed template + delimited contract text
//!  ├─ 3. Analyze   one Gemini generateContent call, JSON mode
//!  ├─ 4. Validate  schema check, drop malformed findings with a warning
//!  └─ 5. Export    canonical JSON or grouped markdown report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clausecheck::{analyze_file, report, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .model("gemini-2.0-flash")
//!         .build()?;
//!     let output = analyze_file("contract.pdf", &config).await?;
//!     println!("{}", report::canonical_json(&output.result)?);
//!     eprintln!("{} risks found ({} dropped by validation)",
//!         output.stats.finding_count,
//!         output.stats.dropped_findings);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without the API
//!
//! Risk detection itself cannot be unit-tested deterministically — it is
//! delegated to the external model. Inject a stub through
//! [`AnalysisConfig::model_client`] to exercise the rest of the pipeline
//! with fixed JSON:
//!
//! ```rust,ignore
//! let config = AnalysisConfig::builder()
//!     .model_client(Arc::new(MyStubModel))
//!     .build()?;
//! ```
//!
//! ## Known limits
//!
//! - Image-only scans come back as degraded input, not findings. No OCR.
//! - `clause_text` is whatever the model quoted; it is guaranteed non-empty,
//!   not guaranteed to appear in the source document.
//! - One attempt per request: no retries, no caching, no persistence.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_file, analyze_sync, export_to_file, extract_only};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_MODEL, SUPPORTED_MODELS};
pub use error::{AnalysisError, AnalyzerError, ExtractionError};
pub use output::{AnalysisOutput, AnalysisResult, AnalysisStats, RiskFinding};
pub use pipeline::extract::{ExtractedText, DEGRADED_TEXT_THRESHOLD};
pub use pipeline::model::{GeminiClient, ModelRequest, RiskModel};
