use assay_types::{OutcomeKind, Severity};
use std::collections::BTreeMap;

/// Per-outcome counters over accepted responses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    by_result: BTreeMap<OutcomeKind, u32>,
    by_severity: BTreeMap<Severity, BTreeMap<OutcomeKind, u32>>,
}

impl Stats {
    /// Count one response in exactly one bucket of each map.
    pub fn record(&mut self, outcome: OutcomeKind, severity: Severity) {
        *self.by_result.entry(outcome).or_insert(0) += 1;
        *self
            .by_severity
            .entry(severity)
            .or_default()
            .entry(outcome)
            .or_insert(0) += 1;
    }

    pub fn by_result(&self) -> &BTreeMap<OutcomeKind, u32> {
        &self.by_result
    }

    pub fn by_severity(&self) -> &BTreeMap<Severity, BTreeMap<OutcomeKind, u32>> {
        &self.by_severity
    }

    pub fn count(&self, outcome: OutcomeKind) -> u32 {
        self.by_result.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.by_result.values().sum()
    }
}
