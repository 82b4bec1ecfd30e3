use crate::model::VerifyReport;

/// Render a deterministic markdown summary of a verification pass.
pub fn render_report(report: &VerifyReport) -> String {
    let mut lines = Vec::new();

    lines.push("# Linkage Verification Report".to_string());
    lines.push(String::new());
    lines.push(format!("- checked_pairs: {}", report.checked_pairs));
    lines.push(format!("- mismatches: {}", report.mismatches.len()));
    lines.push(format!("- all_match: {}", report.all_match()));

    if !report.mismatches.is_empty() {
        lines.push(String::new());
        lines.push("## Mismatched pairs".to_string());
        lines.push("| qual_id | quant_id | field | interview | survey |".to_string());
        lines.push("| --- | --- | --- | --- | --- |".to_string());
        for mismatch in &report.mismatches {
            for field in &mismatch.fields {
                lines.push(format!(
                    "| {} | {} | {} | {} | {} |",
                    mismatch.qual_id, mismatch.quant_id, field.field, field.interview, field.survey
                ));
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}
