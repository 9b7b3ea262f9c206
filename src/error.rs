//! Error types for the clausecheck library.
//!
//! Three distinct error types reflect three distinct failure stages:
//!
//! * [`ExtractionError`] — the uploaded document could not be turned into
//!   plain text (not a PDF, corrupt, encrypted, no text layer). Analysis
//!   never starts.
//!
//! * [`AnalyzerError`] — the external model call failed or produced a payload
//!   that is not recognisably an analysis result. One variant per signal the
//!   caller can act on: fix the key, back off, check the network, or retry.
//!
//! * [`AnalysisError`] — the top-level enum returned by the `analyze*` entry
//!   points, wrapping the two above plus file I/O on the input path.
//!
//! Per-finding validation problems are deliberately NOT errors: a finding
//! missing a required field is dropped with a logged warning and the rest of
//! the batch survives. Only the dropped count is surfaced, in
//! [`crate::output::AnalysisStats`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors turning a PDF byte stream into plain text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The input does not start with the `%PDF` magic bytes.
    #[error("Input is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    /// The PDF parser could not read the document (corrupt or encrypted).
    #[error("Failed to extract text from PDF: {detail}\nTry a text-based, unencrypted PDF.")]
    Unreadable { detail: String },

    /// The document parsed but contains no extractable text at all.
    ///
    /// Image-only scans with a *partial* text layer do not hit this variant;
    /// they come back as degraded input instead (no OCR is attempted).
    #[error("PDF contains no extractable text layer.\nScanned documents need OCR, which clausecheck does not perform.")]
    NoTextLayer,

    /// The input byte stream is empty.
    #[error("Input is empty (0 bytes)")]
    EmptyInput,
}

/// Errors from the external model call or its response.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The API rejected the key (HTTP 401/403, or a 400 naming the key).
    #[error("Authentication failed for model '{model}': {detail}\nCheck your API key.")]
    AuthFailure { model: String, detail: String },

    /// HTTP 429 — the caller should wait before trying again.
    #[error("Rate limit exceeded for model '{model}'\nWait a moment or switch to a flash-tier model.")]
    RateLimited { model: String },

    /// Transport failure: timeout, DNS, connection refused.
    #[error("Network error calling the model API: {detail}\nCheck your internet connection.")]
    Network { detail: String },

    /// The API answered but the body (or the model text inside it) is not
    /// JSON conforming to the analysis schema.
    #[error("Model returned a malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// Any other non-success status.
    #[error("Model API error (HTTP {status}): {detail}")]
    Unknown { status: u16, detail: String },
}

/// All failures of a single analysis request.
///
/// Nothing here is fatal to the process: every variant is scoped to one
/// request and the caller can immediately try again with a different
/// document, key, or model.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file was not found at the given path.
    #[error("Contract file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Text extraction failed.
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The model call or response validation failed.
    #[error("Analysis failed: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Could not write the export file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_display_names_the_key() {
        let e = AnalyzerError::AuthFailure {
            model: "gemini-2.0-flash".into(),
            detail: "API_KEY_INVALID".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini-2.0-flash"));
        assert!(msg.contains("API key"), "got: {msg}");
    }

    #[test]
    fn rate_limited_display() {
        let e = AnalyzerError::RateLimited {
            model: "gemini-1.5-pro-latest".into(),
        };
        assert!(e.to_string().contains("gemini-1.5-pro-latest"));
    }

    #[test]
    fn no_text_layer_mentions_ocr() {
        let msg = ExtractionError::NoTextLayer.to_string();
        assert!(msg.contains("OCR"));
    }

    #[test]
    fn extraction_error_wraps_into_analysis_error() {
        let e: AnalysisError = ExtractionError::EmptyInput.into();
        assert!(matches!(e, AnalysisError::Extraction(_)));
    }
}
