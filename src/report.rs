//! Export formatting: canonical JSON and a human-readable markdown report.
//!
//! Pure functions over an already-validated [`AnalysisResult`] — no
//! validation happens here, and nothing touches the filesystem or screen.
//! The UI layer (or the CLI binary) decides where the strings go.

use crate::output::{AnalysisOutput, AnalysisResult, RiskFinding};

/// Canonical JSON serialization of the result.
///
/// Pretty-printed and bit-exact against the documented schema: the root
/// object holds one `risks` array whose entries carry exactly the four
/// documented fields.
pub fn canonical_json(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Render a markdown report with findings grouped by `risk_type`.
///
/// Groups appear in first-seen order; findings keep model order within each
/// group. An empty result produces a short all-clear report.
pub fn markdown_report(output: &AnalysisOutput, source: &str) -> String {
    let result = &output.result;
    let mut report = String::new();

    report.push_str("# Contract Risk Analysis\n\n");
    report.push_str(&format!("**File:** {source}\n"));
    report.push_str(&format!("**Model:** {}\n", output.stats.model));
    report.push_str(&format!("**Risks Found:** {}\n\n", result.risks.len()));

    if output.degraded_input {
        report.push_str(
            "> **Warning:** very little text was extracted from this document. \
             The file may be scanned or image-based, and the findings below may \
             be incomplete.\n\n",
        );
    }

    if result.is_empty() {
        report.push_str("No significant risks identified.\n");
        return report;
    }

    for risk_type in group_order(result) {
        report.push_str(&format!("## {risk_type}\n\n"));
        for finding in result.risks.iter().filter(|f| f.risk_type == risk_type) {
            push_finding(&mut report, finding);
        }
    }

    report
}

/// Distinct `risk_type` values in first-seen order.
fn group_order(result: &AnalysisResult) -> Vec<&str> {
    let mut order: Vec<&str> = Vec::new();
    for finding in &result.risks {
        if !order.contains(&finding.risk_type.as_str()) {
            order.push(&finding.risk_type);
        }
    }
    order
}

fn push_finding(report: &mut String, finding: &RiskFinding) {
    report.push_str(&format!("**Clause:** {}\n\n", finding.clause_text));
    report.push_str(&format!("**Explanation:** {}\n\n", finding.explanation));
    report.push_str(&format!(
        "**Remediation:** {}\n\n---\n\n",
        finding.remediation_suggestion
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::AnalysisStats;

    fn finding(risk_type: &str, clause: &str) -> RiskFinding {
        RiskFinding {
            risk_type: risk_type.into(),
            clause_text: clause.into(),
            explanation: "why it hurts".into(),
            remediation_suggestion: "how to fix it".into(),
        }
    }

    fn output(risks: Vec<RiskFinding>) -> AnalysisOutput {
        AnalysisOutput {
            result: AnalysisResult { risks },
            stats: AnalysisStats {
                model: "gemini-2.0-flash".into(),
                ..Default::default()
            },
            degraded_input: false,
        }
    }

    #[test]
    fn canonical_json_matches_documented_schema() {
        let result = AnalysisResult {
            risks: vec![finding("Uncapped Liability", "liable for everything")],
        };
        let json = canonical_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value["risks"][0];
        let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            ["clause_text", "explanation", "remediation_suggestion", "risk_type"]
                .iter()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn canonical_json_reparses_identically() {
        let result = AnalysisResult {
            risks: vec![finding("Unilateral Terms", "client decides alone")],
        };
        let back: AnalysisResult =
            serde_json::from_str(&canonical_json(&result).unwrap()).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn report_groups_by_risk_type_in_first_seen_order() {
        let out = output(vec![
            finding("Uncapped Liability", "clause a"),
            finding("Vague Payment Terms", "clause b"),
            finding("Uncapped Liability", "clause c"),
        ]);
        let md = markdown_report(&out, "contract.pdf");

        let liability = md.find("## Uncapped Liability").unwrap();
        let payment = md.find("## Vague Payment Terms").unwrap();
        assert!(liability < payment);
        // Both liability clauses land under the one heading.
        assert_eq!(md.matches("## Uncapped Liability").count(), 1);
        let section = &md[liability..payment];
        assert!(section.contains("clause a") && section.contains("clause c"));
    }

    #[test]
    fn empty_result_renders_all_clear() {
        let md = markdown_report(&output(vec![]), "contract.pdf");
        assert!(md.contains("No significant risks identified."));
        assert!(md.contains("**Risks Found:** 0"));
    }

    #[test]
    fn degraded_input_adds_a_warning() {
        let mut out = output(vec![]);
        out.degraded_input = true;
        let md = markdown_report(&out, "scan.pdf");
        assert!(md.contains("scanned or image-based"));
    }
}
