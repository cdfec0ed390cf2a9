//! Built-in audits over a [`PropertyTarget`](crate::PropertyTarget)'s static properties.

use assay_domain::audit::{Audit, AuditContext, AuditRegistry, Target};
use assay_types::ids::{
    CHECK_PROPERTY_ABSENT, CHECK_PROPERTY_EQUALS, CHECK_PROPERTY_PRESENT, PARAM_KEY, PARAM_VALUE,
};
use assay_types::{AuditResponse, OutcomeKind, Policy};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use tracing::debug;

/// Registry with every built-in check bound to `target`.
pub fn builtin_registry(target: &Arc<dyn Target>) -> AuditRegistry {
    AuditRegistry::new()
        .with(
            CHECK_PROPERTY_PRESENT,
            Arc::new(PropertyPresent::new(target)),
        )
        .with(CHECK_PROPERTY_EQUALS, Arc::new(PropertyEquals::new(target)))
        .with(CHECK_PROPERTY_ABSENT, Arc::new(PropertyAbsent::new(target)))
}

/// `success` when `parameters.key` exists on the target.
pub struct PropertyPresent {
    target: Arc<dyn Target>,
}

/// `success` when the property equals `parameters.value`; `irrelevant` when it is missing.
pub struct PropertyEquals {
    target: Arc<dyn Target>,
}

/// `success` when `parameters.key` is missing from the target.
pub struct PropertyAbsent {
    target: Arc<dyn Target>,
}

impl PropertyPresent {
    pub fn new(target: &Arc<dyn Target>) -> Self {
        Self {
            target: Arc::clone(target),
        }
    }
}

impl PropertyEquals {
    pub fn new(target: &Arc<dyn Target>) -> Self {
        Self {
            target: Arc::clone(target),
        }
    }
}

impl PropertyAbsent {
    pub fn new(target: &Arc<dyn Target>) -> Self {
        Self {
            target: Arc::clone(target),
        }
    }
}

impl Audit for PropertyPresent {
    fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    fn execute(&self, policy: &Policy, ctx: &AuditContext) -> AuditResponse {
        let key = match required_key(policy) {
            Ok(key) => key,
            Err(response) => return response,
        };
        let response = match self.target.property(key) {
            Some(observed) => AuditResponse::new(policy.clone(), OutcomeKind::Success)
                .with_data(json!({ "key": key, "observed": observed })),
            None => AuditResponse::new(policy.clone(), OutcomeKind::Failure)
                .with_message(format!("property '{key}' is not set"))
                .with_data(json!({ "key": key })),
        };
        note_remediation(policy, ctx, &response);
        response
    }
}

impl Audit for PropertyEquals {
    fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    fn execute(&self, policy: &Policy, ctx: &AuditContext) -> AuditResponse {
        let key = match required_key(policy) {
            Ok(key) => key,
            Err(response) => return response,
        };
        let Some(expected) = policy.parameter(PARAM_VALUE) else {
            return missing_parameter(policy, PARAM_VALUE);
        };
        let Some(observed) = self.target.property(key) else {
            return AuditResponse::new(policy.clone(), OutcomeKind::Irrelevant)
                .with_message(format!("property '{key}' is not set"));
        };

        let data = json!({ "key": key, "expected": expected, "observed": observed });
        let response = if observed == *expected {
            AuditResponse::new(policy.clone(), OutcomeKind::Success).with_data(data)
        } else {
            AuditResponse::new(policy.clone(), OutcomeKind::Failure)
                .with_message(format!(
                    "property '{key}' is {}, expected {}",
                    display(&observed),
                    display(expected)
                ))
                .with_data(data)
        };
        note_remediation(policy, ctx, &response);
        response
    }
}

impl Audit for PropertyAbsent {
    fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    fn execute(&self, policy: &Policy, ctx: &AuditContext) -> AuditResponse {
        let key = match required_key(policy) {
            Ok(key) => key,
            Err(response) => return response,
        };
        let response = match self.target.property(key) {
            None => AuditResponse::new(policy.clone(), OutcomeKind::Success)
                .with_data(json!({ "key": key })),
            Some(observed) => AuditResponse::new(policy.clone(), OutcomeKind::Failure)
                .with_message(format!(
                    "property '{key}' should not be set (found {})",
                    display(&observed)
                ))
                .with_data(json!({ "key": key, "observed": observed })),
        };
        note_remediation(policy, ctx, &response);
        response
    }
}

fn required_key(policy: &Policy) -> Result<&str, AuditResponse> {
    match policy.parameter(PARAM_KEY) {
        Some(JsonValue::String(key)) if !key.is_empty() => Ok(key.as_str()),
        Some(_) => Err(AuditResponse::new(policy.clone(), OutcomeKind::Error)
            .with_message(format!("parameter '{PARAM_KEY}' must be a non-empty string"))),
        None => Err(missing_parameter(policy, PARAM_KEY)),
    }
}

fn missing_parameter(policy: &Policy, name: &str) -> AuditResponse {
    AuditResponse::new(policy.clone(), OutcomeKind::Error)
        .with_message(format!("missing parameter: {name}"))
}

/// Strings without quotes, everything else as JSON.
fn display(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Static properties cannot be changed from here.
fn note_remediation(policy: &Policy, ctx: &AuditContext, response: &AuditResponse) {
    if ctx.remediate && !response.is_successful() {
        debug!(
            policy = %policy.name,
            check = %policy.check,
            "remediation requested but not supported by this check"
        );
    }
}
