//! Fuzz target for snapshot import.
//!
//! Goal: importing a structurally valid snapshot should **never panic**, and any snapshot that
//! imports must export back to itself.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_snapshot_import
//! ```

#![no_main]

use arbitrary::Arbitrary;
use assay_domain::Assessment;
use assay_types::{
    AssessmentSnapshot, AuditResponse, OutcomeKind, Policy, SCHEMA_ASSESSMENT_V1, Severity,
};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

const OUTCOMES: [OutcomeKind; 7] = [
    OutcomeKind::Success,
    OutcomeKind::Warning,
    OutcomeKind::Notice,
    OutcomeKind::NotApplicable,
    OutcomeKind::Failure,
    OutcomeKind::Error,
    OutcomeKind::Irrelevant,
];

/// Structured input so libFuzzer spends its time on plausible snapshots.
#[derive(Arbitrary, Debug)]
struct SnapshotInput {
    /// (name index, severity, outcome index, stored under a different key)
    results: Vec<(u8, u8, u8, bool)>,
    /// (name index, severity, outcome index) recorded as superseded
    superseded: Vec<(u8, u8, u8)>,
    order: Vec<u8>,
    successful: bool,
    error_code: Option<i32>,
}

fuzz_target!(|input: SnapshotInput| {
    if input.results.len() > 32 || input.superseded.len() > 32 || input.order.len() > 32 {
        return;
    }

    let mut results = BTreeMap::new();
    for (name, severity, outcome, rekey) in input.results {
        let name = format!("p{}", name % 16);
        let policy = Policy::new(name.clone(), name.clone(), Severity::new(severity), "fuzz");
        let response = AuditResponse::new(policy, OUTCOMES[outcome as usize % OUTCOMES.len()]);
        let key = if rekey { format!("{name}-moved") } else { name };
        results.insert(key, response);
    }

    let mut superseded: BTreeMap<String, Vec<AuditResponse>> = BTreeMap::new();
    for (name, severity, outcome) in input.superseded {
        let name = format!("p{}", name % 16);
        let policy = Policy::new(name.clone(), name.clone(), Severity::new(severity), "fuzz");
        let response = AuditResponse::new(policy, OUTCOMES[outcome as usize % OUTCOMES.len()]);
        superseded.entry(name).or_default().push(response);
    }

    let snapshot = AssessmentSnapshot {
        schema: SCHEMA_ASSESSMENT_V1.to_string(),
        uri: "https://fuzz.example".to_string(),
        id: Default::default(),
        reporting_period: None,
        results,
        superseded,
        policy_order: input.order.iter().map(|i| format!("p{}", i % 16)).collect(),
        successful: input.successful,
        error_code: input.error_code,
    };

    if let Ok(assessment) = Assessment::from_snapshot(snapshot.clone()) {
        assert_eq!(assessment.to_snapshot(), snapshot);
    }

    // Raw JSON path as well
    if let Ok(json) = serde_json::to_string(&snapshot)
        && let Ok(parsed) = serde_json::from_str::<AssessmentSnapshot>(&json)
    {
        let _ = Assessment::from_snapshot(parsed);
    }
});
