//! The dispatcher seam: units of work go in, responses come back one at a time.
//!
//! Implementations run units concurrently however they like, but `drain` must
//! invoke its callback serially on the calling thread. The assessment relies on
//! that single-consumer guarantee to aggregate without locks.

use assay_types::AuditResponse;
use thiserror::Error;

/// One dispatched audit execution.
pub type Unit = Box<dyn FnOnce() -> AuditResponse + Send + 'static>;

/// Submission index of a unit within a dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitHandle(pub usize);

/// Run-level failure of the worker layer.
///
/// Responses delivered before the fault remain valid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("dispatcher fault (code {code}) after {accepted} deliveries: {message}")]
pub struct DispatchFault {
    pub code: i32,
    pub accepted: usize,
    pub message: String,
}

impl DispatchFault {
    pub fn new(code: i32, accepted: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            accepted,
            message: message.into(),
        }
    }
}

pub trait Dispatcher {
    /// Queue a unit. Nothing runs before `drain`.
    fn submit(&mut self, label: &str, unit: Unit) -> UnitHandle;

    /// Run every queued unit and deliver each response to `on_receive` in
    /// completion order, one at a time. Returns how many responses were delivered.
    fn drain(
        &mut self,
        on_receive: &mut dyn FnMut(AuditResponse),
    ) -> Result<usize, DispatchFault>;
}

/// How much of a run came back from the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchSummary {
    pub accepted: usize,
    pub total: usize,
}

impl DispatchSummary {
    pub fn is_complete(&self) -> bool {
        self.accepted == self.total
    }
}
