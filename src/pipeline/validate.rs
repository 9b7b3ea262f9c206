//! Response validation: raw model text to a typed [`AnalysisResult`].
//!
//! Models asked for JSON still misbehave in predictable ways: wrapping the
//! payload in markdown fences, nesting `{"risks": [...]}` under an invented
//! root key, or emitting a bare array. The normalisation steps here absorb
//! those quirks deterministically before field-level validation runs.
//!
//! ## Partial tolerance
//!
//! A finding missing a required field (or quoting an empty clause) is
//! dropped with a logged warning; the rest of the batch survives. Losing one
//! hallucinated entry is cheaper than re-running a paid model call for the
//! whole document. The dropped count is reported so callers can see when the
//! model is degrading. Unknown extra fields on a finding are ignored.

use crate::error::AnalyzerError;
use crate::output::{AnalysisResult, RiskFinding};
use serde_json::Value;
use tracing::warn;

/// Outcome of validating one model response.
#[derive(Debug)]
pub struct ValidatedResponse {
    /// Findings that passed field-level validation, in model order.
    pub result: AnalysisResult,
    /// Findings rejected by field-level validation.
    pub dropped: usize,
}

/// Parse and validate the model's raw text output.
///
/// # Errors
/// [`AnalyzerError::MalformedResponse`] when the text is not JSON at all, or
/// when no `risks` array can be located after root normalisation. Individual
/// bad findings never fail the batch.
pub fn validate_response(raw: &str) -> Result<ValidatedResponse, AnalyzerError> {
    let stripped = strip_code_fences(raw);

    let parsed: Value =
        serde_json::from_str(stripped).map_err(|e| AnalyzerError::MalformedResponse {
            detail: format!("model output is not valid JSON: {e}"),
        })?;

    let risks = locate_risks_array(parsed)?;

    let mut findings = Vec::with_capacity(risks.len());
    let mut dropped = 0usize;
    for (index, entry) in risks.into_iter().enumerate() {
        match validate_finding(&entry) {
            Ok(finding) => findings.push(finding),
            Err(reason) => {
                dropped += 1;
                warn!(index, %reason, "dropping finding that failed validation");
            }
        }
    }

    Ok(ValidatedResponse {
        result: AnalysisResult { risks: findings },
        dropped,
    })
}

/// Remove a surrounding ```json fence if the model added one.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Locate the `risks` array, tolerating the root shapes models emit:
/// the canonical object, a single wrapping key around it, or a bare array.
fn locate_risks_array(root: Value) -> Result<Vec<Value>, AnalyzerError> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("risks") {
                return Ok(items);
            }
            // A single invented wrapper key whose value holds "risks".
            if map.len() == 1 {
                if let Some(Value::Object(mut inner)) = map.into_iter().next().map(|(_, v)| v) {
                    if let Some(Value::Array(items)) = inner.remove("risks") {
                        return Ok(items);
                    }
                }
            }
            Err(AnalyzerError::MalformedResponse {
                detail: "JSON root contains no 'risks' array".into(),
            })
        }
        other => Err(AnalyzerError::MalformedResponse {
            detail: format!("JSON root must be an object or array, got {other}"),
        }),
    }
}

/// Validate one finding field-by-field.
///
/// Required fields must be present and of string type; `clause_text` must be
/// non-empty. Extra fields are ignored.
fn validate_finding(entry: &Value) -> Result<RiskFinding, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| format!("finding is not an object: {entry}"))?;

    let field = |name: &str| -> Result<String, String> {
        obj.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("missing or non-string field '{name}'"))
    };

    let finding = RiskFinding {
        risk_type: field("risk_type")?,
        clause_text: field("clause_text")?,
        explanation: field("explanation")?,
        remediation_suggestion: field("remediation_suggestion")?,
    };

    if finding.clause_text.trim().is_empty() {
        return Err("empty clause_text".into());
    }

    Ok(finding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn well_formed() -> String {
        json!({
            "risks": [
                {
                    "risk_type": "Uncapped Liability",
                    "clause_text": "Contractor shall be liable without limit for any damages.",
                    "explanation": "Unbounded financial exposure.",
                    "remediation_suggestion": "Cap liability at the contract value."
                },
                {
                    "risk_type": "Vague Payment Terms",
                    "clause_text": "Payment shall be made in due course.",
                    "explanation": "No dates or milestones.",
                    "remediation_suggestion": "Specify net-30 with milestones."
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn well_formed_response_round_trips_all_findings() {
        let v = validate_response(&well_formed()).unwrap();
        assert_eq!(v.dropped, 0);
        assert_eq!(v.result.risks.len(), 2);
        assert_eq!(v.result.risks[0].risk_type, "Uncapped Liability");
        assert_eq!(
            v.result.risks[1].remediation_suggestion,
            "Specify net-30 with milestones."
        );
    }

    #[test]
    fn empty_risks_is_a_valid_result() {
        let v = validate_response(r#"{"risks": []}"#).unwrap();
        assert!(v.result.is_empty());
        assert_eq!(v.dropped, 0);
    }

    #[test]
    fn fenced_output_is_unwrapped() {
        let fenced = format!("```json\n{}\n```", well_formed());
        let v = validate_response(&fenced).unwrap();
        assert_eq!(v.result.risks.len(), 2);
    }

    #[test]
    fn bare_fence_without_language_is_unwrapped() {
        let fenced = format!("```\n{}\n```", r#"{"risks": []}"#);
        assert!(validate_response(&fenced).unwrap().result.is_empty());
    }

    #[test]
    fn bare_array_root_is_wrapped() {
        let raw = json!([{
            "risk_type": "Unilateral Terms",
            "clause_text": "Client may terminate at any time without notice.",
            "explanation": "One-sided.",
            "remediation_suggestion": "Add mutual termination rights."
        }])
        .to_string();
        let v = validate_response(&raw).unwrap();
        assert_eq!(v.result.risks.len(), 1);
    }

    #[test]
    fn single_wrapper_key_is_unwrapped() {
        let raw = json!({"analysis": {"risks": [], "summary": "fine"}}).to_string();
        let v = validate_response(&raw).unwrap();
        assert!(v.result.is_empty());
    }

    #[test]
    fn finding_missing_a_field_is_dropped_rest_intact() {
        let raw = json!({
            "risks": [
                {
                    "risk_type": "Uncapped Liability",
                    "clause_text": "Liable for any and all damages.",
                    "explanation": "Unbounded.",
                    "remediation_suggestion": "Add a cap."
                },
                {
                    "risk_type": "Broad Indemnification",
                    "clause_text": "Indemnify against all claims."
                    // explanation and remediation_suggestion missing
                }
            ]
        })
        .to_string();
        let v = validate_response(&raw).unwrap();
        assert_eq!(v.result.risks.len(), 1);
        assert_eq!(v.dropped, 1);
        assert_eq!(v.result.risks[0].risk_type, "Uncapped Liability");
    }

    #[test]
    fn empty_clause_text_is_dropped() {
        let raw = json!({
            "risks": [{
                "risk_type": "Unilateral Terms",
                "clause_text": "   ",
                "explanation": "x",
                "remediation_suggestion": "y"
            }]
        })
        .to_string();
        let v = validate_response(&raw).unwrap();
        assert!(v.result.is_empty());
        assert_eq!(v.dropped, 1);
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let raw = json!({
            "risks": [{
                "risk_type": "Unilateral Terms",
                "clause_text": "Client may amend terms at will.",
                "explanation": "One-sided amendment right.",
                "remediation_suggestion": "Require mutual written consent.",
                "severity": "high",
                "confidence": 0.92
            }]
        })
        .to_string();
        let v = validate_response(&raw).unwrap();
        assert_eq!(v.result.risks.len(), 1);
        assert_eq!(v.dropped, 0);
    }

    #[test]
    fn non_json_is_malformed() {
        let err = validate_response("I could not analyze this contract.").unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse { .. }));
    }

    #[test]
    fn object_without_risks_is_malformed() {
        let err = validate_response(r#"{"findings": []}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse { .. }));
    }

    #[test]
    fn scalar_root_is_malformed() {
        assert!(validate_response("42").is_err());
    }
}
