//! Assessment orchestration (no IO).
//!
//! Input: a target, an ordered policy list, a resolver that binds each policy to an audit,
//! and a dispatcher that runs the audits concurrently.
//! Output: an [`Assessment`] with an order-stable result set, verdict, severity and stats,
//! exportable as an [`assay_types::AssessmentSnapshot`].

#![forbid(unsafe_code)]

pub mod audit;
pub mod dispatch;
pub mod ids;
pub mod stats;

mod assessment;
mod error;
mod snapshot;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use assessment::{Assessment, RunInput};
pub use error::AssessmentError;
