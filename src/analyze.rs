//! Analysis entry points: compose the pipeline stages into one request.
//!
//! Control flow is strictly linear — extract, build prompt, call model,
//! validate — and each stage's failure aborts the request with an error
//! naming the stage. No state survives the call: the document, prompt, and
//! result all live for one invocation.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::extract::{self, ExtractedText};
use crate::pipeline::model::{GeminiClient, ModelRequest, RiskModel};
use crate::pipeline::validate;
use crate::prompts;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Analyze a contract PDF provided as an in-memory byte stream.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`AnalysisError::Extraction`] when the PDF yields no usable text
/// - [`AnalysisError::Analyzer`] when the model call fails or the response
///   does not conform to the schema
///
/// A degraded text layer (image-only scan) is NOT an error; it is flagged on
/// the returned [`AnalysisOutput`] so the caller can warn the user.
pub async fn analyze(
    bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalysisError> {
    let total_start = Instant::now();

    // ── Step 1: Extract text ─────────────────────────────────────────────
    let extraction_start = Instant::now();
    let extracted = extract_blocking(bytes.to_vec()).await?;
    let extraction_duration_ms = extraction_start.elapsed().as_millis() as u64;
    info!(
        chars = extracted.char_count,
        words = extracted.word_count,
        "extraction complete in {}ms",
        extraction_duration_ms
    );

    let degraded_input = extracted.is_degraded();
    if degraded_input {
        warn!(
            chars = extracted.char_count,
            "very little text extracted; document may be scanned or image-based"
        );
    }

    // ── Step 2: Build prompt ─────────────────────────────────────────────
    let request = ModelRequest {
        system_prompt: config
            .system_prompt
            .clone()
            .unwrap_or_else(|| prompts::SYSTEM_PROMPT.to_string()),
        user_prompt: prompts::build_user_prompt(&extracted.text),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    };

    // ── Step 3: Call the model ───────────────────────────────────────────
    let client = resolve_client(config)?;
    let model_name = client.name().to_string();
    let llm_start = Instant::now();
    let raw = client.generate(&request).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    info!(model = %model_name, "model call complete in {}ms", llm_duration_ms);

    // ── Step 4: Validate the response ────────────────────────────────────
    let validated = validate::validate_response(&raw)?;
    if validated.dropped > 0 {
        warn!(
            dropped = validated.dropped,
            kept = validated.result.risks.len(),
            "model returned findings that failed validation"
        );
    }

    let stats = AnalysisStats {
        extracted_chars: extracted.char_count,
        extracted_words: extracted.word_count,
        finding_count: validated.result.risks.len(),
        dropped_findings: validated.dropped,
        extraction_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        model: model_name,
    };

    info!(
        findings = stats.finding_count,
        dropped = stats.dropped_findings,
        "analysis complete in {}ms",
        stats.total_duration_ms
    );

    Ok(AnalysisOutput {
        result: validated.result,
        stats,
        degraded_input,
    })
}

/// Analyze a contract PDF on disk.
///
/// Validates the path before reading so missing files and permission
/// problems surface as their own error variants rather than extraction noise.
pub async fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalysisError> {
    let path = path.as_ref();
    let bytes = read_input(path).await?;
    analyze(&bytes, config).await
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally; for callers without an
/// async context (desktop UI threads, simple scripts).
pub fn analyze_sync(
    bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalysisError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalysisError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(analyze(bytes, config))
}

/// Extract text without analysing.
///
/// Does not require an API key; useful for previewing what the model would
/// see and for checking a document's text layer before spending a call.
pub async fn extract_only(bytes: &[u8]) -> Result<ExtractedText, AnalysisError> {
    Ok(extract_blocking(bytes.to_vec()).await?)
}

/// Write an export (JSON or report) to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn export_to_file(
    path: impl AsRef<Path>,
    contents: &str,
) -> Result<(), AnalysisError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AnalysisError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| AnalysisError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| AnalysisError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run the synchronous PDF parser off the async executor's hot path.
async fn extract_blocking(bytes: Vec<u8>) -> Result<ExtractedText, AnalysisError> {
    tokio::task::spawn_blocking(move || extract::extract_text(&bytes))
        .await
        .map_err(|e| AnalysisError::Internal(format!("extraction task panicked: {e}")))?
        .map_err(AnalysisError::from)
}

/// Resolve the model client: an injected one takes priority, otherwise a
/// fresh [`GeminiClient`] from the config's key and model.
fn resolve_client(config: &AnalysisConfig) -> Result<Arc<dyn RiskModel>, AnalysisError> {
    if let Some(ref client) = config.model_client {
        return Ok(Arc::clone(client));
    }
    let client = GeminiClient::new(&config.api_key, &config.model, config.api_timeout_secs)
        .map_err(AnalysisError::from)?;
    Ok(Arc::new(client))
}

/// Validate and read the input path.
async fn read_input(path: &Path) -> Result<Vec<u8>, AnalysisError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(AnalysisError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(AnalysisError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}
