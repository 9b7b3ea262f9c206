//! Result types returned by an analysis.
//!
//! [`AnalysisResult`] is the canonical wire shape — exactly the JSON contract
//! exported to consumers:
//!
//! ```json
//! {
//!   "risks": [
//!     {
//!       "risk_type": "...",
//!       "clause_text": "...",
//!       "explanation": "...",
//!       "remediation_suggestion": "..."
//!     }
//!   ]
//! }
//! ```
//!
//! Serialization is lossless: serialising a validated result and parsing it
//! back yields an identical structure.

use serde::{Deserialize, Serialize};

/// One identified contract risk.
///
/// `clause_text` is the verbatim clause the model flagged. Validation
/// guarantees it is non-empty, but NOT that it actually appears in the source
/// document — the model may hallucinate, and this library does not guard
/// against that. Always review findings against the original contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Risk category, e.g. "Uncapped Liability". Usually one of
    /// [`crate::prompts::RISK_CATEGORIES`], but the model may use an open
    /// string for risks outside the enumerated set.
    pub risk_type: String,

    /// Verbatim text of the clause containing the risk.
    pub clause_text: String,

    /// Why this is a risk and its potential legal/financial impact.
    pub explanation: String,

    /// How the clause could be revised to mitigate the risk.
    pub remediation_suggestion: String,
}

/// Ordered sequence of findings for one analysed document. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All identified risks, in the order the model reported them.
    pub risks: Vec<RiskFinding>,
}

impl AnalysisResult {
    /// True when the model identified no significant risks.
    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }

    /// Number of distinct `risk_type` values in the result.
    pub fn distinct_risk_types(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for finding in &self.risks {
            if !seen.contains(&finding.risk_type.as_str()) {
                seen.push(&finding.risk_type);
            }
        }
        seen.len()
    }
}

/// Per-request metrics, collected alongside the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Characters of text extracted from the PDF.
    pub extracted_chars: usize,
    /// Whitespace-separated words in the extracted text.
    pub extracted_words: usize,
    /// Findings that survived validation.
    pub finding_count: usize,
    /// Findings the model returned but validation dropped (missing required
    /// fields or empty clause text).
    pub dropped_findings: usize,
    /// Wall-clock time for PDF text extraction.
    pub extraction_duration_ms: u64,
    /// Wall-clock time for the model call (network + generation).
    pub llm_duration_ms: u64,
    /// Total request time.
    pub total_duration_ms: u64,
    /// Model identifier that produced the result.
    pub model: String,
}

/// Everything `analyze` returns for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The validated findings.
    pub result: AnalysisResult,
    /// Request metrics.
    pub stats: AnalysisStats,
    /// True when the extracted text was suspiciously short — the PDF is
    /// likely image-only and the analysis ran on a near-empty text layer.
    pub degraded_input: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(risk_type: &str) -> RiskFinding {
        RiskFinding {
            risk_type: risk_type.into(),
            clause_text: "Contractor shall be liable without limit.".into(),
            explanation: "Exposes the client to unbounded damages.".into(),
            remediation_suggestion: "Cap liability at the contract value.".into(),
        }
    }

    #[test]
    fn serialization_round_trip_is_identity() {
        let result = AnalysisResult {
            risks: vec![finding("Uncapped Liability"), finding("Unilateral Terms")],
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn canonical_shape_uses_risks_key() {
        let json = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "risks": [] }));
    }

    #[test]
    fn distinct_risk_types_counts_first_occurrences() {
        let result = AnalysisResult {
            risks: vec![
                finding("Uncapped Liability"),
                finding("Uncapped Liability"),
                finding("Vague Payment Terms"),
            ],
        };
        assert_eq!(result.distinct_risk_types(), 2);
    }
}
