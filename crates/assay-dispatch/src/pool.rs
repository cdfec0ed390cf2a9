use crate::{FAULT_DISCONNECTED, FAULT_POOL_BUILD, FAULT_WORKER_PANIC, panic_message};
use assay_domain::dispatch::{DispatchFault, Dispatcher, Unit, UnitHandle};
use assay_types::AuditResponse;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Worker pool sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    /// Completed responses buffered before workers block on delivery.
    pub channel_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: None,
            channel_capacity: 64,
        }
    }
}

impl DispatchConfig {
    fn worker_count(&self, units: usize) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.workers.unwrap_or(available).clamp(1, units.max(1))
    }
}

enum Delivery {
    Done {
        label: String,
        response: AuditResponse,
        elapsed: Duration,
    },
    Panicked {
        label: String,
        message: String,
    },
}

/// Runs units on a rayon pool; completions flow back through a bounded channel
/// that `drain` consumes on the calling thread.
pub struct ThreadDispatcher {
    config: DispatchConfig,
    queue: Vec<(String, Unit)>,
    submitted: usize,
}

impl ThreadDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            queue: Vec::new(),
            submitted: 0,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl Dispatcher for ThreadDispatcher {
    fn submit(&mut self, label: &str, unit: Unit) -> UnitHandle {
        self.queue.push((label.to_string(), unit));
        self.submitted += 1;
        UnitHandle(self.submitted - 1)
    }

    fn drain(
        &mut self,
        on_receive: &mut dyn FnMut(AuditResponse),
    ) -> Result<usize, DispatchFault> {
        let queued = std::mem::take(&mut self.queue);
        let total = queued.len();
        if total == 0 {
            return Ok(0);
        }

        let workers = self.config.worker_count(total);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("assay-worker-{i}"))
            .build()
            .map_err(|e| {
                DispatchFault::new(FAULT_POOL_BUILD, 0, format!("build worker pool: {e}"))
            })?;
        debug!(workers, units = total, "dispatching units");

        let (tx, rx) = mpsc::sync_channel(self.config.channel_capacity.max(1));
        for (label, unit) in queued {
            let tx = tx.clone();
            pool.spawn(move || {
                let started = Instant::now();
                let delivery = match panic::catch_unwind(AssertUnwindSafe(unit)) {
                    Ok(response) => Delivery::Done {
                        label,
                        response,
                        elapsed: started.elapsed(),
                    },
                    Err(payload) => Delivery::Panicked {
                        label,
                        message: panic_message(&*payload),
                    },
                };
                // The consumer is gone after a fault; late results are dropped.
                let _ = tx.send(delivery);
            });
        }
        drop(tx);

        let mut accepted = 0;
        while accepted < total {
            match rx.recv() {
                Ok(Delivery::Done {
                    label,
                    response,
                    elapsed,
                }) => {
                    debug!(
                        unit = %label,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "unit completed"
                    );
                    on_receive(response);
                    accepted += 1;
                }
                Ok(Delivery::Panicked { label, message }) => {
                    warn!(unit = %label, "unit panicked: {message}");
                    return Err(DispatchFault::new(
                        FAULT_WORKER_PANIC,
                        accepted,
                        format!("unit '{label}' panicked: {message}"),
                    ));
                }
                Err(_) => {
                    return Err(DispatchFault::new(
                        FAULT_DISCONNECTED,
                        accepted,
                        format!("workers disconnected after {accepted}/{total} units"),
                    ));
                }
            }
        }

        Ok(accepted)
    }
}
