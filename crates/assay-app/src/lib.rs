//! Use case orchestration for assay.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain,
//! dispatch, and render layers. It is intentionally thin and delegates heavy lifting to the
//! appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and logging setup.

#![forbid(unsafe_code)]

mod audits;
mod render;
mod run;
mod snapshot;
mod target;

pub use audits::{PropertyAbsent, PropertyEquals, PropertyPresent, builtin_registry};
pub use render::{render_markdown, render_summary, to_renderable};
pub use run::{RunAssessmentInput, RunAssessmentOutput, assessment_exit_code, run_assessment};
pub use snapshot::{load_snapshot, parse_snapshot_json, serialize_snapshot, write_snapshot};
pub use target::PropertyTarget;
