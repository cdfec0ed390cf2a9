//! Stable DTOs and IDs used across the assay workspace.
//!
//! This crate is intentionally boring:
//! - the policy / audit response data exchanged with check runners
//! - the reporting period applied to a run
//! - the persisted assessment snapshot and its schema id
//! - stable string IDs for built-in checks

#![forbid(unsafe_code)]

pub mod ids;
pub mod period;
pub mod policy;
pub mod response;
pub mod snapshot;

pub use period::ReportingPeriod;
pub use policy::{Policy, Severity};
pub use response::{AuditResponse, OutcomeKind};
pub use snapshot::{AssessmentSnapshot, SCHEMA_ASSESSMENT_V1};
