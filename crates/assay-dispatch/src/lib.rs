//! Dispatcher adapters.
//!
//! Both implementations honor the domain's single-consumer contract: units may
//! run anywhere, but the receive callback only ever runs on the thread that
//! called `drain`, one response at a time.

#![forbid(unsafe_code)]

mod inline;
mod pool;

pub use inline::InlineDispatcher;
pub use pool::{DispatchConfig, ThreadDispatcher};

/// A unit panicked while executing.
pub const FAULT_WORKER_PANIC: i32 = 70;
/// The worker pool could not be started.
pub const FAULT_POOL_BUILD: i32 = 71;
/// Workers went away before every unit delivered.
pub const FAULT_DISCONNECTED: i32 = 72;

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
