//! The `run` use case: resolve config, bind built-in audits, dispatch, aggregate.

use crate::{PropertyTarget, builtin_registry};
use anyhow::Context;
use assay_dispatch::{DispatchConfig, InlineDispatcher, ThreadDispatcher};
use assay_domain::audit::Target;
use assay_domain::dispatch::Dispatcher;
use assay_domain::ids::IdGenerator;
use assay_domain::{Assessment, RunInput};
use assay_settings::{AssayConfigV1, Overrides, ResolvedConfig};
use assay_types::ReportingPeriod;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::info;

/// Input for the run use case.
pub struct RunAssessmentInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    pub ids: &'a dyn IdGenerator,
    /// End of the reporting period; now when `None`.
    pub period_end: Option<OffsetDateTime>,
}

/// Output from the run use case.
#[derive(Debug)]
pub struct RunAssessmentOutput {
    pub assessment: Assessment,
    /// The resolved configuration used.
    pub resolved: ResolvedConfig,
}

/// Run every configured policy against the configured target.
///
/// A dispatcher fault still returns `Ok`: the assessment carries the error code and the
/// partial results.
pub fn run_assessment(input: RunAssessmentInput<'_>) -> anyhow::Result<RunAssessmentOutput> {
    let cfg = if input.config_text.trim().is_empty() {
        AssayConfigV1::default()
    } else {
        assay_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        assay_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let target: Arc<dyn Target> = Arc::new(PropertyTarget::new(
        resolved.uri.clone(),
        resolved.properties.clone(),
    ));
    let registry = builtin_registry(&target);

    let span = Duration::hours(i64::from(resolved.period_hours));
    let period = match input.period_end {
        Some(end) => ReportingPeriod::ending_at(end, span),
        None => ReportingPeriod::trailing(span),
    };

    let mut dispatcher = dispatcher_for(&resolved);
    let mut assessment = Assessment::new(resolved.uri.clone(), input.ids);
    info!(
        id = %assessment.id(),
        uri = %resolved.uri,
        policies = resolved.policies.len(),
        "starting assessment"
    );
    assessment
        .run(
            RunInput {
                target: &target,
                policies: &resolved.policies,
                period,
                remediate: resolved.remediate,
            },
            &registry,
            dispatcher.as_mut(),
        )
        .context("run assessment")?;

    Ok(RunAssessmentOutput {
        assessment,
        resolved,
    })
}

/// A single worker runs inline on the calling thread.
fn dispatcher_for(resolved: &ResolvedConfig) -> Box<dyn Dispatcher> {
    if resolved.workers == Some(1) {
        return Box::new(InlineDispatcher::new());
    }
    Box::new(ThreadDispatcher::new(DispatchConfig {
        workers: resolved.workers,
        channel_capacity: resolved.channel_capacity,
    }))
}

/// Map the assessment verdict to an exit code: 0 = successful, 2 = unsuccessful or incomplete.
pub fn assessment_exit_code(assessment: &Assessment) -> i32 {
    let complete = assessment
        .dispatch_summary()
        .is_none_or(|summary| summary.is_complete());
    if assessment.is_successful() && complete {
        0
    } else {
        2
    }
}
