//! Text extraction: PDF bytes to plain text via `pdf-extract`.
//!
//! ## Degraded input vs. failure
//!
//! A corrupt or encrypted PDF is a hard failure — nothing can be analysed.
//! An image-only scan with a near-empty text layer is different: extraction
//! technically succeeds, and the caller decides whether a risk analysis of
//! fifty characters is worth a paid API call. [`ExtractedText::is_degraded`]
//! carries that signal instead of this module guessing. No OCR is attempted
//! and no content is ever fabricated.

use crate::error::ExtractionError;
use tracing::debug;

/// Extracted text below this length marks the input as degraded.
///
/// Matches the point at which a contract is clearly not text-based: even a
/// one-page letter yields several hundred characters.
pub const DEGRADED_TEXT_THRESHOLD: usize = 50;

/// Plain text recovered from a PDF, with basic size metrics.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Concatenated text of all pages in reading order.
    pub text: String,
    /// Character count of `text`.
    pub char_count: usize,
    /// Whitespace-separated word count of `text`.
    pub word_count: usize,
}

impl ExtractedText {
    /// True when so little text came out that the document is probably an
    /// image-only scan. The caller should surface a warning rather than
    /// treat this as a crash.
    pub fn is_degraded(&self) -> bool {
        self.char_count < DEGRADED_TEXT_THRESHOLD
    }
}

/// Extract the plain text of all pages from a PDF byte stream.
///
/// # Errors
/// - [`ExtractionError::EmptyInput`] for a zero-byte stream
/// - [`ExtractionError::NotAPdf`] when the `%PDF` magic bytes are missing
/// - [`ExtractionError::Unreadable`] when the parser rejects the document
///   (corrupt structure, encryption)
/// - [`ExtractionError::NoTextLayer`] when parsing succeeds but zero
///   non-whitespace text comes out
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractionError::NotAPdf { magic });
    }

    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Unreadable {
            detail: e.to_string(),
        })?;

    let text = normalise(&raw);
    if text.is_empty() {
        return Err(ExtractionError::NoTextLayer);
    }

    let extracted = ExtractedText {
        char_count: text.chars().count(),
        word_count: text.split_whitespace().count(),
        text,
    };
    debug!(
        chars = extracted.char_count,
        words = extracted.word_count,
        degraded = extracted.is_degraded(),
        "extracted text from PDF"
    );
    Ok(extracted)
}

/// Join pages cleanly: pdf-extract separates pages with form feeds; replace
/// them with blank lines, trim each page, and drop empty pages.
fn normalise(raw: &str) -> String {
    raw.split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
