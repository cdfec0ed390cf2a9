//! Render use cases: map a finished assessment into the renderer's model.

use assay_domain::Assessment;
use assay_render::{RenderableAssessment, RenderableResult, RenderableStat, RenderableVerdict};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn to_renderable(assessment: &Assessment) -> RenderableAssessment {
    let complete = assessment
        .dispatch_summary()
        .is_none_or(|summary| summary.is_complete());
    let verdict = if assessment.error_code().is_some() || !complete {
        RenderableVerdict::Incomplete
    } else if assessment.is_successful() {
        RenderableVerdict::Pass
    } else {
        RenderableVerdict::Fail
    };

    RenderableAssessment {
        id: assessment.id().to_string(),
        uri: assessment.uri().to_string(),
        verdict,
        severity: assessment.severity_code().to_string(),
        period: assessment
            .reporting_period()
            .map(|p| (timestamp(p.start), timestamp(p.end))),
        error_code: assessment.error_code(),
        results: assessment
            .results()
            .into_iter()
            .map(|r| RenderableResult {
                name: r.policy.name.clone(),
                title: r.policy.title.clone(),
                outcome: r.outcome.to_string(),
                severity: r.severity.to_string(),
                successful: r.is_successful(),
                message: r.message.clone(),
            })
            .collect(),
        stats: assessment
            .stats_by_result()
            .iter()
            .map(|(outcome, count)| RenderableStat {
                outcome: outcome.to_string(),
                count: *count,
            })
            .collect(),
        dispatched: assessment
            .dispatch_summary()
            .map(|s| (s.accepted, s.total)),
    }
}

pub fn render_markdown(assessment: &Assessment) -> String {
    assay_render::render_markdown(&to_renderable(assessment))
}

pub fn render_summary(assessment: &Assessment) -> String {
    assay_render::render_summary(&to_renderable(assessment))
}

fn timestamp(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| t.to_string())
}
