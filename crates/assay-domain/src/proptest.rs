//! Property-based tests for the assessment core.
//!
//! These tests use proptest to verify invariants around:
//! - result ordering independent of completion order
//! - severity aggregation and success folding
//! - irrelevant responses never reaching results or stats
//! - snapshot round trips, including repeated policy names

use crate::audit::{AuditRegistry, Target};
use crate::ids::SequentialIds;
use crate::test_support::{
    CHECK_SCRIPTED, ScriptedAudit, ScriptedDispatcher, fixed_period, policy, target,
};
use crate::{Assessment, RunInput};
use assay_types::{OutcomeKind, Policy, Severity};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

fn arb_outcome() -> impl Strategy<Value = OutcomeKind> {
    prop_oneof![
        Just(OutcomeKind::Success),
        Just(OutcomeKind::Warning),
        Just(OutcomeKind::Notice),
        Just(OutcomeKind::NotApplicable),
        Just(OutcomeKind::Failure),
        Just(OutcomeKind::Error),
        Just(OutcomeKind::Irrelevant),
    ]
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    (1u8..=6).prop_map(Severity::new)
}

/// Unique policy names with a severity and a scripted outcome each.
fn arb_plan() -> impl Strategy<Value = Vec<(Severity, OutcomeKind)>> {
    prop::collection::vec((arb_severity(), arb_outcome()), 0..16)
}

/// A plan plus a shuffled completion order over its indexes.
fn arb_plan_and_order() -> impl Strategy<Value = (Vec<(Severity, OutcomeKind)>, Vec<usize>)> {
    arb_plan().prop_flat_map(|plan| {
        let order: Vec<usize> = (0..plan.len()).collect();
        (Just(plan), Just(order).prop_shuffle())
    })
}

/// Policy names drawn from a small pool so names repeat, each with an outcome.
fn arb_repeated() -> impl Strategy<Value = Vec<(usize, OutcomeKind)>> {
    prop::collection::vec((0usize..4, arb_outcome()), 0..12)
}

// ============================================================================
// Helpers
// ============================================================================

fn build(plan: &[(Severity, OutcomeKind)]) -> (Vec<Policy>, ScriptedAudit, Arc<dyn Target>) {
    let target = target();
    let mut audit = ScriptedAudit::new(&target);
    let mut policies = Vec::with_capacity(plan.len());
    for (i, (severity, outcome)) in plan.iter().enumerate() {
        let name = format!("policy-{i:02}");
        audit = audit.outcome(&name, *outcome);
        policies.push(policy(&name, *severity));
    }
    (policies, audit, target)
}

fn run_plan(plan: &[(Severity, OutcomeKind)], order: Option<Vec<usize>>) -> Assessment {
    let (policies, audit, target) = build(plan);
    let registry = AuditRegistry::new().with(CHECK_SCRIPTED, Arc::new(audit));
    let mut dispatcher = match order {
        Some(order) => ScriptedDispatcher::in_order(order),
        None => ScriptedDispatcher::default(),
    };
    let mut assessment = Assessment::new("https://prop.example", &SequentialIds::default());
    assessment
        .run(
            RunInput {
                target: &target,
                policies: &policies,
                period: fixed_period(),
                remediate: false,
            },
            &registry,
            &mut dispatcher,
        )
        .expect("run");
    assessment
}

fn result_names(assessment: &Assessment) -> Vec<String> {
    assessment
        .results()
        .iter()
        .map(|r| r.policy.name.clone())
        .collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Exposed order is dispatch order no matter how completions arrive.
    #[test]
    fn results_follow_dispatch_order((plan, order) in arb_plan_and_order()) {
        let in_order = run_plan(&plan, None);
        let shuffled = run_plan(&plan, Some(order));

        prop_assert_eq!(result_names(&in_order), result_names(&shuffled));
        prop_assert_eq!(in_order.stats(), shuffled.stats());
        prop_assert_eq!(in_order.severity_code(), shuffled.severity_code());
        prop_assert_eq!(in_order.is_successful(), shuffled.is_successful());

        let expected: Vec<String> = plan
            .iter()
            .enumerate()
            .filter(|(_, (_, outcome))| !outcome.is_irrelevant())
            .map(|(i, _)| format!("policy-{i:02}"))
            .collect();
        prop_assert_eq!(result_names(&shuffled), expected);
    }

    /// Severity is the max over unsuccessful responses, or the floor.
    #[test]
    fn severity_is_max_of_failures(plan in arb_plan()) {
        let assessment = run_plan(&plan, None);

        let expected = plan
            .iter()
            .filter(|(_, outcome)| !outcome.is_irrelevant() && !outcome.is_successful())
            .map(|(severity, _)| *severity)
            .max()
            .unwrap_or(Severity::FLOOR);
        prop_assert_eq!(assessment.severity_code(), expected);

        let all_ok = plan
            .iter()
            .all(|(_, outcome)| outcome.is_successful());
        prop_assert_eq!(assessment.is_successful(), all_ok);
    }

    /// Irrelevant responses never reach results or either stats map.
    #[test]
    fn irrelevant_is_excluded(plan in arb_plan()) {
        let assessment = run_plan(&plan, None);

        prop_assert!(assessment.results().iter().all(|r| !r.is_irrelevant()));
        prop_assert_eq!(assessment.stats().count(OutcomeKind::Irrelevant), 0);
        for by_kind in assessment.stats_by_severity().values() {
            prop_assert!(!by_kind.contains_key(&OutcomeKind::Irrelevant));
        }

        let relevant = plan.iter().filter(|(_, o)| !o.is_irrelevant()).count();
        prop_assert_eq!(assessment.stats().total() as usize, relevant);
        let by_severity_total: u32 = assessment
            .stats_by_severity()
            .values()
            .flat_map(|m| m.values())
            .sum();
        prop_assert_eq!(by_severity_total as usize, relevant);
    }

    /// Import of an export reproduces the query surface.
    #[test]
    fn snapshot_round_trip((plan, order) in arb_plan_and_order()) {
        let assessment = run_plan(&plan, Some(order));
        let restored = Assessment::from_snapshot(assessment.to_snapshot())
            .expect("import");

        prop_assert_eq!(restored.results(), assessment.results());
        prop_assert_eq!(restored.policy_order(), assessment.policy_order());
        prop_assert_eq!(restored.is_successful(), assessment.is_successful());
        prop_assert_eq!(restored.error_code(), assessment.error_code());
        prop_assert_eq!(restored.severity_code(), assessment.severity_code());
        prop_assert_eq!(restored.stats(), assessment.stats());
    }

    /// A fault after `k` deliveries keeps exactly those `k` (relevant) results.
    #[test]
    fn fault_preserves_prefix(plan in arb_plan(), cut in 0usize..16) {
        let cut = cut.min(plan.len());
        let (policies, audit, target) = build(&plan);
        let registry = AuditRegistry::new().with(CHECK_SCRIPTED, Arc::new(audit));
        let mut dispatcher = ScriptedDispatcher::default().fault_after(cut, 71);
        let mut assessment = Assessment::new("https://prop.example", &SequentialIds::default());
        assessment
            .run(
                RunInput {
                    target: &target,
                    policies: &policies,
                    period: fixed_period(),
                    remediate: false,
                },
                &registry,
                &mut dispatcher,
            )
            .expect("run");

        let summary = assessment.dispatch_summary().expect("summary");
        prop_assert_eq!(summary.total, plan.len());
        if cut < plan.len() {
            prop_assert_eq!(summary.accepted, cut);
            prop_assert_eq!(assessment.error_code(), Some(71));
            prop_assert!(!assessment.is_successful());
        } else {
            prop_assert_eq!(summary.accepted, plan.len());
            prop_assert_eq!(assessment.error_code(), None);
        }
        let kept = plan[..summary.accepted]
            .iter()
            .filter(|(_, o)| !o.is_irrelevant())
            .count();
        prop_assert_eq!(assessment.results().len(), kept);
    }

    /// Repeated names double-count on run and the snapshot replays the same counts.
    #[test]
    fn repeated_names_round_trip(plan in arb_repeated()) {
        let target = target();
        let mut audit = ScriptedAudit::new(&target);
        let mut policies = Vec::with_capacity(plan.len());
        for (slot, outcome) in &plan {
            let name = format!("shared-{slot}");
            audit = audit.outcome(&name, *outcome);
            policies.push(policy(&name, Severity::new(*slot as u8 + 1)));
        }
        let registry = AuditRegistry::new().with(CHECK_SCRIPTED, Arc::new(audit));
        let mut assessment = Assessment::new("https://prop.example", &SequentialIds::default());
        assessment
            .run(
                RunInput {
                    target: &target,
                    policies: &policies,
                    period: fixed_period(),
                    remediate: false,
                },
                &registry,
                &mut ScriptedDispatcher::default(),
            )
            .expect("run");

        let restored = Assessment::from_snapshot(assessment.to_snapshot())
            .expect("import");

        prop_assert_eq!(restored.stats(), assessment.stats());
        prop_assert_eq!(restored.severity_code(), assessment.severity_code());
        prop_assert_eq!(restored.is_successful(), assessment.is_successful());
        prop_assert_eq!(restored.results(), assessment.results());
        prop_assert_eq!(restored.to_snapshot(), assessment.to_snapshot());
    }
}
