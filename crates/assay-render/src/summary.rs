use crate::RenderableAssessment;

/// One line per result plus a verdict footer, for terminals.
pub fn render_summary(report: &RenderableAssessment) -> String {
    let mut out = String::new();
    out.push_str(&format!("assessment {} ({})\n", report.id, report.uri));

    let width = report
        .results
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0);
    for r in &report.results {
        out.push_str(&format!(
            "  {:<width$}  {:<14} {}",
            r.name,
            r.outcome,
            r.severity,
            width = width
        ));
        if let Some(message) = &r.message {
            out.push_str(&format!("  {message}"));
        }
        out.push('\n');
    }

    let counts: Vec<String> = report
        .stats
        .iter()
        .map(|s| format!("{}={}", s.outcome, s.count))
        .collect();
    out.push_str(&format!(
        "verdict: {} severity: {}",
        report.verdict.label(),
        report.severity
    ));
    if !counts.is_empty() {
        out.push_str(&format!(" [{}]", counts.join(", ")));
    }
    if let Some(code) = report.error_code {
        out.push_str(&format!(" error_code={code}"));
    }
    out.push('\n');
    out
}
