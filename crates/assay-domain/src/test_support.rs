use crate::audit::{Audit, AuditContext, Target};
use crate::dispatch::{DispatchFault, Dispatcher, Unit, UnitHandle};
use assay_types::{AuditResponse, OutcomeKind, Policy, ReportingPeriod, Severity};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use time::macros::datetime;

pub const CHECK_SCRIPTED: &str = "scripted";

#[derive(Debug)]
pub struct StubTarget {
    uri: Mutex<String>,
    properties: BTreeMap<String, JsonValue>,
}

impl StubTarget {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: Mutex::new(uri.to_string()),
            properties: BTreeMap::new(),
        }
    }
}

impl Target for StubTarget {
    fn uri(&self) -> String {
        self.uri.lock().map(|u| u.clone()).unwrap_or_default()
    }

    fn set_uri(&self, uri: &str) {
        if let Ok(mut current) = self.uri.lock() {
            *current = uri.to_string();
        }
    }

    fn property(&self, key: &str) -> Option<JsonValue> {
        self.properties.get(key).cloned()
    }
}

pub fn target() -> Arc<dyn Target> {
    Arc::new(StubTarget::new("https://stub.example"))
}

pub fn policy(name: &str, severity: Severity) -> Policy {
    Policy::new(name, format!("Policy {name}"), severity, CHECK_SCRIPTED)
}

pub fn fixed_period() -> ReportingPeriod {
    ReportingPeriod::new(
        datetime!(2024-03-01 00:00 UTC),
        datetime!(2024-03-02 00:00 UTC),
    )
}

pub fn response(name: &str, severity: Severity, outcome: OutcomeKind) -> AuditResponse {
    AuditResponse::new(policy(name, severity), outcome)
}

/// Audit answering from a per-policy outcome table (default: success).
pub struct ScriptedAudit {
    target: Arc<dyn Target>,
    outcomes: BTreeMap<String, OutcomeKind>,
}

impl ScriptedAudit {
    pub fn new(target: &Arc<dyn Target>) -> Self {
        Self {
            target: Arc::clone(target),
            outcomes: BTreeMap::new(),
        }
    }

    pub fn outcome(mut self, policy: &str, outcome: OutcomeKind) -> Self {
        self.outcomes.insert(policy.to_string(), outcome);
        self
    }
}

impl Audit for ScriptedAudit {
    fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    fn execute(&self, policy: &Policy, _ctx: &AuditContext) -> AuditResponse {
        let outcome = self
            .outcomes
            .get(&policy.name)
            .copied()
            .unwrap_or(OutcomeKind::Success);
        AuditResponse::new(policy.clone(), outcome)
    }
}

/// Dispatcher that runs units inline in a chosen completion order,
/// optionally faulting after a number of deliveries.
#[derive(Default)]
pub struct ScriptedDispatcher {
    units: Vec<(String, Unit)>,
    order: Option<Vec<usize>>,
    fault: Option<(usize, i32)>,
    submitted: usize,
}

impl ScriptedDispatcher {
    /// Deliver submission indexes in `order`.
    pub fn in_order(order: Vec<usize>) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn fault_after(mut self, deliveries: usize, code: i32) -> Self {
        self.fault = Some((deliveries, code));
        self
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl Dispatcher for ScriptedDispatcher {
    fn submit(&mut self, label: &str, unit: Unit) -> UnitHandle {
        self.units.push((label.to_string(), unit));
        self.submitted += 1;
        UnitHandle(self.submitted - 1)
    }

    fn drain(
        &mut self,
        on_receive: &mut dyn FnMut(AuditResponse),
    ) -> Result<usize, DispatchFault> {
        let mut slots: Vec<Option<Unit>> = self
            .units
            .drain(..)
            .map(|(_, unit)| Some(unit))
            .collect();
        let order = self
            .order
            .take()
            .unwrap_or_else(|| (0..slots.len()).collect());

        let mut delivered = 0;
        for index in order {
            if let Some((limit, code)) = self.fault
                && delivered == limit
            {
                return Err(DispatchFault::new(code, delivered, "scripted fault"));
            }
            if let Some(unit) = slots.get_mut(index).and_then(Option::take) {
                on_receive(unit());
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}
