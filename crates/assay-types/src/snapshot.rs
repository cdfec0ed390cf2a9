use crate::{AuditResponse, ReportingPeriod};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stable schema identifier for persisted assessments.
pub const SCHEMA_ASSESSMENT_V1: &str = "assay.assessment.v1";

/// Persisted form of a finished assessment.
///
/// Carries enough to rebuild the full query surface (verdict, severity, stats)
/// without re-running any check. Derived state is absent; import recomputes it
/// by replaying `superseded` and then `results`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentSnapshot {
    /// Versioned schema identifier for the snapshot shape.
    pub schema: String,
    pub uri: String,
    #[schemars(with = "String")]
    pub id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,

    /// Accepted responses keyed by policy name.
    pub results: BTreeMap<String, AuditResponse>,
    /// Earlier accepted responses for a repeated policy name, in delivery order,
    /// that a later response overwrote in `results`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub superseded: BTreeMap<String, Vec<AuditResponse>>,
    /// Dispatch order of policy names.
    pub policy_order: Vec<String>,

    pub successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
}
