use crate::AssessmentError;
use crate::audit::{AuditContext, AuditResolver, Target};
use crate::dispatch::{DispatchSummary, Dispatcher};
use crate::ids::IdGenerator;
use crate::stats::Stats;
use assay_types::{AuditResponse, OutcomeKind, Policy, ReportingPeriod, Severity};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Input for a single assessment run.
#[derive(Clone, Copy)]
pub struct RunInput<'a> {
    /// Every resolved audit must be bound to this exact instance.
    pub target: &'a Arc<dyn Target>,
    /// Dispatch order; also the order results are reported in.
    pub policies: &'a [Policy],
    pub period: ReportingPeriod,
    pub remediate: bool,
}

/// The aggregated result of running a set of policies against one target.
///
/// Mutated only inside its single `run` call (or rebuilt by `from_snapshot`);
/// afterwards it is a read-only record.
#[derive(Clone, Debug)]
pub struct Assessment {
    pub(crate) uri: String,
    pub(crate) id: Uuid,
    pub(crate) reporting_period: Option<ReportingPeriod>,
    pub(crate) policy_order: Vec<String>,
    pub(crate) results: BTreeMap<String, AuditResponse>,
    pub(crate) superseded: BTreeMap<String, Vec<AuditResponse>>,
    pub(crate) successful: bool,
    pub(crate) severity_code: Severity,
    pub(crate) stats: Stats,
    pub(crate) error_code: Option<i32>,
    pub(crate) dispatch: Option<DispatchSummary>,
    pub(crate) sealed: bool,
}

impl Assessment {
    pub fn new(uri: impl Into<String>, ids: &dyn IdGenerator) -> Self {
        Self::with_id(uri, ids.generate())
    }

    pub(crate) fn with_id(uri: impl Into<String>, id: Uuid) -> Self {
        Self {
            uri: uri.into(),
            id,
            reporting_period: None,
            policy_order: Vec::new(),
            results: BTreeMap::new(),
            superseded: BTreeMap::new(),
            successful: true,
            severity_code: Severity::FLOOR,
            stats: Stats::default(),
            error_code: None,
            dispatch: None,
            sealed: false,
        }
    }

    /// Assess `input.target` with every policy, concurrently through `dispatcher`.
    ///
    /// All policies are resolved and checked against the target before anything is
    /// submitted, so a configuration error never leaves a partial dispatch behind.
    /// A dispatcher fault does not fail the call: the assessment is marked
    /// unsuccessful, the fault code is recorded, and whatever was aggregated stays.
    pub fn run(
        &mut self,
        input: RunInput<'_>,
        resolver: &dyn AuditResolver,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<&mut Self, AssessmentError> {
        if self.sealed {
            return Err(AssessmentError::AlreadyRun(self.id));
        }
        if !input.period.is_valid() {
            return Err(AssessmentError::InvalidPeriod {
                start: input.period.start,
                end: input.period.end,
            });
        }

        let mut bound = Vec::with_capacity(input.policies.len());
        for policy in input.policies {
            let audit =
                resolver
                    .resolve(policy)
                    .ok_or_else(|| AssessmentError::UnresolvedCheck {
                        policy: policy.name.clone(),
                        check: policy.check.clone(),
                    })?;
            if !Arc::ptr_eq(audit.target(), input.target) {
                return Err(AssessmentError::TargetMismatch {
                    policy: policy.name.clone(),
                });
            }
            bound.push((policy.clone(), audit));
        }

        self.sealed = true;
        self.reporting_period = Some(input.period);
        input.target.set_uri(&self.uri);

        let ctx = AuditContext {
            period: input.period,
            remediate: input.remediate,
        };
        let total = bound.len();

        for (policy, audit) in bound {
            info!(policy = %policy.name, uri = %self.uri, "assessing policy");
            self.policy_order.push(policy.name.clone());
            let label = policy.name.clone();
            dispatcher.submit(&label, Box::new(move || audit.execute(&policy, &ctx)));
        }

        let drained = dispatcher.drain(&mut |response: AuditResponse| self.receive(response));
        let accepted = match drained {
            Ok(accepted) => accepted,
            Err(fault) => {
                error!(code = fault.code, uri = %self.uri, "{fault}");
                self.successful = false;
                self.error_code = Some(fault.code);
                fault.accepted
            }
        };

        info!(
            uri = %self.uri,
            "assessment returned {accepted}/{total} from the dispatcher"
        );
        self.dispatch = Some(DispatchSummary { accepted, total });

        Ok(self)
    }

    fn receive(&mut self, response: AuditResponse) {
        info!(
            policy = %response.policy.title,
            uri = %self.uri,
            outcome = %response.outcome,
            "policy assessment completed"
        );
        if response.is_irrelevant() {
            info!(
                policy = %response.policy.name,
                "omitting policy result from assessment"
            );
            return;
        }
        self.record_result(response);
    }

    /// Record one accepted response.
    ///
    /// Re-recording a policy name overwrites the stored response but applies the
    /// success/severity/stats deltas again. The overwritten response is kept aside
    /// so a snapshot can replay the same deltas.
    pub fn record_result(&mut self, response: AuditResponse) {
        let successful = response.is_successful();
        let severity = response.severity();

        self.successful = self.successful && successful;
        if !successful && severity > self.severity_code {
            debug!(
                policy = %response.policy.name,
                from = %self.severity_code,
                to = %severity,
                "raising assessment severity"
            );
            self.severity_code = severity;
        }
        self.stats.record(response.outcome(), severity);
        let name = response.policy.name.clone();
        if let Some(previous) = self.results.insert(name.clone(), response) {
            debug!(policy = %name, "policy recorded again; superseding earlier response");
            self.superseded.entry(name).or_default().push(previous);
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn reporting_period(&self) -> Option<&ReportingPeriod> {
        self.reporting_period.as_ref()
    }

    pub fn policy_order(&self) -> &[String] {
        &self.policy_order
    }

    pub fn result(&self, name: &str) -> Result<&AuditResponse, AssessmentError> {
        self.results
            .get(name)
            .ok_or_else(|| AssessmentError::NotFound {
                name: name.to_string(),
                available: self.results.keys().cloned().collect(),
            })
    }

    /// Responses in dispatch order, skipping policies with no stored result.
    pub fn results(&self) -> Vec<&AuditResponse> {
        self.policy_order
            .iter()
            .filter_map(|name| self.results.get(name))
            .collect()
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn severity_code(&self) -> Severity {
        self.severity_code
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_by_result(&self) -> &BTreeMap<OutcomeKind, u32> {
        self.stats.by_result()
    }

    pub fn stats_by_severity(&self) -> &BTreeMap<Severity, BTreeMap<OutcomeKind, u32>> {
        self.stats.by_severity()
    }

    pub fn error_code(&self) -> Option<i32> {
        self.error_code
    }

    /// `accepted/total` of the run; `None` before a run and after an import.
    pub fn dispatch_summary(&self) -> Option<DispatchSummary> {
        self.dispatch
    }
}
