use crate::{Assessment, AssessmentError};
use assay_types::{AssessmentSnapshot, SCHEMA_ASSESSMENT_V1};
use tracing::debug;

impl Assessment {
    /// Export everything needed to rebuild this assessment without re-running checks.
    pub fn to_snapshot(&self) -> AssessmentSnapshot {
        AssessmentSnapshot {
            schema: SCHEMA_ASSESSMENT_V1.to_string(),
            uri: self.uri.clone(),
            id: self.id,
            reporting_period: self.reporting_period,
            results: self.results.clone(),
            superseded: self.superseded.clone(),
            policy_order: self.policy_order.clone(),
            successful: self.successful,
            error_code: self.error_code,
        }
    }

    /// Rebuild an assessment from a snapshot.
    ///
    /// The stored responses are replayed through [`Assessment::record_result`],
    /// superseded ones first; that replay is the source of truth for success,
    /// severity and stats. The
    /// snapshot's `successful` flag must agree with `replayed && error_code.is_none()`,
    /// otherwise the snapshot is rejected.
    pub fn from_snapshot(snapshot: AssessmentSnapshot) -> Result<Self, AssessmentError> {
        if snapshot.schema != SCHEMA_ASSESSMENT_V1 {
            return Err(AssessmentError::UnknownSchema(snapshot.schema));
        }

        for (name, response) in &snapshot.results {
            if response.policy.name != *name {
                return Err(AssessmentError::InconsistentSnapshot(format!(
                    "result '{name}' holds a response for policy '{}'",
                    response.policy.name
                )));
            }
            if !snapshot.policy_order.contains(name) {
                return Err(AssessmentError::InconsistentSnapshot(format!(
                    "result '{name}' is missing from policy_order"
                )));
            }
            if response.is_irrelevant() {
                return Err(AssessmentError::InconsistentSnapshot(format!(
                    "result '{name}' is irrelevant and cannot be aggregated"
                )));
            }
        }

        for (name, earlier) in &snapshot.superseded {
            if !snapshot.results.contains_key(name) {
                return Err(AssessmentError::InconsistentSnapshot(format!(
                    "superseded responses for '{name}' have no stored result"
                )));
            }
            let dispatched = snapshot.policy_order.iter().filter(|n| *n == name).count();
            if earlier.is_empty() || earlier.len() >= dispatched {
                return Err(AssessmentError::InconsistentSnapshot(format!(
                    "'{name}' has {} superseded response(s) for {dispatched} dispatch(es)",
                    earlier.len()
                )));
            }
            for response in earlier {
                if response.policy.name != *name {
                    return Err(AssessmentError::InconsistentSnapshot(format!(
                        "superseded response under '{name}' is for policy '{}'",
                        response.policy.name
                    )));
                }
                if response.is_irrelevant() {
                    return Err(AssessmentError::InconsistentSnapshot(format!(
                        "superseded response under '{name}' is irrelevant"
                    )));
                }
            }
        }

        let mut assessment = Assessment::with_id(snapshot.uri, snapshot.id);
        assessment.reporting_period = snapshot.reporting_period;
        assessment.policy_order = snapshot.policy_order;
        for response in snapshot.superseded.into_values().flatten() {
            assessment.record_result(response);
        }
        for response in snapshot.results.into_values() {
            assessment.record_result(response);
        }

        if snapshot.error_code.is_some() {
            assessment.successful = false;
        }
        assessment.error_code = snapshot.error_code;

        if assessment.successful != snapshot.successful {
            return Err(AssessmentError::InconsistentSnapshot(format!(
                "stored successful={} but results replay to successful={}",
                snapshot.successful, assessment.successful
            )));
        }

        assessment.sealed = true;
        debug!(
            id = %assessment.id,
            results = assessment.results.len(),
            "assessment imported from snapshot"
        );
        Ok(assessment)
    }
}
