//! Fault isolation around externally triggered passes.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run one pass with faults contained at its boundary.
///
/// An `Err` or a panic is logged under the engine target and swallowed; the
/// caller gets `None` and the next trigger starts fresh. Nothing crosses
/// into the host page's own event handling, and no failure disables future
/// passes.
pub fn guard<T>(label: &str, task: impl FnOnce() -> anyhow::Result<T>) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(task)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(error)) => {
            log::error!(target: "lacquer_engine", "{label} pass failed: {error:#}");
            None
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|text| (*text).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            log::error!(target: "lacquer_engine", "{label} pass panicked: {message}");
            None
        }
    }
}
