use crate::RenderableAssessment;

pub fn render_markdown(report: &RenderableAssessment) -> String {
    let mut out = String::new();

    out.push_str("# Assessment report\n\n");
    out.push_str(&format!("- Target: `{}`\n", report.uri));
    out.push_str(&format!("- Assessment: `{}`\n", report.id));
    out.push_str(&format!(
        "- Verdict: **{}** (severity: {})\n",
        report.verdict.label(),
        report.severity
    ));
    if let Some((start, end)) = &report.period {
        out.push_str(&format!("- Period: {} .. {}\n", start, end));
    }
    if let Some((accepted, total)) = report.dispatched {
        out.push_str(&format!("- Dispatched: {}/{}\n", accepted, total));
    }
    out.push('\n');

    if let Some(code) = report.error_code {
        out.push_str(&format!(
            "> Note: the run stopped early (error code {}); results are partial.\n\n",
            code
        ));
    }

    if report.results.is_empty() {
        out.push_str("No results.\n");
        return out;
    }

    out.push_str("## Results\n\n");
    out.push_str("| Policy | Outcome | Severity | Message |\n");
    out.push_str("|---|---|---|---|\n");
    for r in &report.results {
        let marker = if r.successful { "" } else { " ❌" };
        out.push_str(&format!(
            "| {} (`{}`) | {}{} | {} | {} |\n",
            escape_cell(&r.title),
            r.name,
            r.outcome,
            marker,
            r.severity,
            escape_cell(r.message.as_deref().unwrap_or(""))
        ));
    }

    if !report.stats.is_empty() {
        out.push_str("\n## Totals\n\n");
        for s in &report.stats {
            out.push_str(&format!("- {}: {}\n", s.outcome, s.count));
        }
    }

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
