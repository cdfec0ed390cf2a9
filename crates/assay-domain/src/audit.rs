//! Seams to the check runner: targets, audits, and how policies bind to them.

use assay_types::{AuditResponse, Policy, ReportingPeriod};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The system under assessment.
///
/// Shared read-only between concurrently running audits; the only mutation is
/// `set_uri`, done once before dispatch.
pub trait Target: Send + Sync + fmt::Debug {
    fn uri(&self) -> String;
    fn set_uri(&self, uri: &str);
    fn property(&self, key: &str) -> Option<JsonValue>;
}

/// Per-run parameters handed to every audit execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuditContext {
    pub period: ReportingPeriod,
    /// Remediate when the policy fails and the audit supports it.
    pub remediate: bool,
}

/// An executable check bound to a target.
pub trait Audit: Send + Sync {
    fn target(&self) -> &Arc<dyn Target>;

    /// Execute the check. Failures are reported through the response outcome.
    fn execute(&self, policy: &Policy, ctx: &AuditContext) -> AuditResponse;
}

pub trait AuditResolver {
    fn resolve(&self, policy: &Policy) -> Option<Arc<dyn Audit>>;
}

/// Maps check refs (`Policy::check`) to audits.
#[derive(Clone, Default)]
pub struct AuditRegistry {
    audits: BTreeMap<String, Arc<dyn Audit>>,
}

impl AuditRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: impl Into<String>, audit: Arc<dyn Audit>) -> &mut Self {
        self.audits.insert(check.into(), audit);
        self
    }

    pub fn with(mut self, check: impl Into<String>, audit: Arc<dyn Audit>) -> Self {
        self.register(check, audit);
        self
    }

    pub fn checks(&self) -> impl Iterator<Item = &str> {
        self.audits.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.audits.is_empty()
    }
}

impl AuditResolver for AuditRegistry {
    fn resolve(&self, policy: &Policy) -> Option<Arc<dyn Audit>> {
        self.audits.get(&policy.check).cloned()
    }
}

impl fmt::Debug for AuditRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditRegistry")
            .field("checks", &self.audits.keys().collect::<Vec<_>>())
            .finish()
    }
}
