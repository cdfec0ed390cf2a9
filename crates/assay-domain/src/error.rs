use assay_types::SCHEMA_ASSESSMENT_V1;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Errors raised by the assessment core.
///
/// Per-policy audit failures are not errors: they arrive as unsuccessful
/// responses. Dispatcher faults are recorded on the assessment instead of
/// being returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("audit target for policy '{policy}' is not the assessment target")]
    TargetMismatch { policy: String },

    #[error("policy '{policy}' references unknown check '{check}'")]
    UnresolvedCheck { policy: String, check: String },

    #[error("reporting period starts after it ends ({start} > {end})")]
    InvalidPeriod {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("assessment {0} has already been run")]
    AlreadyRun(Uuid),

    #[error(
        "policy '{name}' does not have an audit response. Found: {}",
        .available.join(", ")
    )]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("unknown snapshot schema: {0} (expected {expected})", expected = SCHEMA_ASSESSMENT_V1)]
    UnknownSchema(String),

    #[error("inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),
}
