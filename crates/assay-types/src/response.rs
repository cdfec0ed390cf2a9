use crate::{Policy, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Outcome of executing one policy's check.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Warning,
    Notice,
    NotApplicable,
    Failure,
    Error,
    /// The check did not apply to this target; excluded from aggregation.
    Irrelevant,
}

impl OutcomeKind {
    pub fn is_successful(self) -> bool {
        match self {
            OutcomeKind::Success
            | OutcomeKind::Warning
            | OutcomeKind::Notice
            | OutcomeKind::NotApplicable
            | OutcomeKind::Irrelevant => true,
            OutcomeKind::Failure | OutcomeKind::Error => false,
        }
    }

    pub fn is_irrelevant(self) -> bool {
        self == OutcomeKind::Irrelevant
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Warning => "warning",
            OutcomeKind::Notice => "notice",
            OutcomeKind::NotApplicable => "not_applicable",
            OutcomeKind::Failure => "failure",
            OutcomeKind::Error => "error",
            OutcomeKind::Irrelevant => "irrelevant",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result a runner produces for one dispatched policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditResponse {
    pub policy: Policy,
    pub outcome: OutcomeKind,
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Check-specific structured payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl AuditResponse {
    /// Response carrying the policy's own severity.
    pub fn new(policy: Policy, outcome: OutcomeKind) -> Self {
        let severity = policy.severity;
        Self {
            policy,
            outcome,
            severity,
            message: None,
            data: JsonValue::Null,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn outcome(&self) -> OutcomeKind {
        self.outcome
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }

    pub fn is_irrelevant(&self) -> bool {
        self.outcome.is_irrelevant()
    }
}
