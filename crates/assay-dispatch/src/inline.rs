use crate::{FAULT_WORKER_PANIC, panic_message};
use assay_domain::dispatch::{DispatchFault, Dispatcher, Unit, UnitHandle};
use assay_types::AuditResponse;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Runs every unit on the calling thread, in submission order.
#[derive(Default)]
pub struct InlineDispatcher {
    queue: Vec<(String, Unit)>,
    submitted: usize,
}

impl InlineDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dispatcher for InlineDispatcher {
    fn submit(&mut self, label: &str, unit: Unit) -> UnitHandle {
        self.queue.push((label.to_string(), unit));
        self.submitted += 1;
        UnitHandle(self.submitted - 1)
    }

    fn drain(
        &mut self,
        on_receive: &mut dyn FnMut(AuditResponse),
    ) -> Result<usize, DispatchFault> {
        let mut accepted = 0;
        for (label, unit) in std::mem::take(&mut self.queue) {
            match panic::catch_unwind(AssertUnwindSafe(unit)) {
                Ok(response) => {
                    debug!(unit = %label, "unit completed inline");
                    on_receive(response);
                    accepted += 1;
                }
                Err(payload) => {
                    return Err(DispatchFault::new(
                        FAULT_WORKER_PANIC,
                        accepted,
                        format!("unit '{label}' panicked: {}", panic_message(&*payload)),
                    ));
                }
            }
        }
        Ok(accepted)
    }
}
