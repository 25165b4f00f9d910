//! The overlay engine: stylesheet installation, dynamic reconciliation, and
//! lifecycle control.
//!
//! One [`ThemeEngine`] instance owns everything the theme does to a page:
//! the single installed `<style>` node, the mutation observation, and the
//! viewport watch. `start()` wires them up, `stop()` reverses every side
//! effect, and the reconciler keeps inline overrides converged while the
//! host mutates the tree underneath us.

#![forbid(unsafe_code)]

mod debounce;
mod engine;
mod fault;
mod installer;
mod reconcile;
mod stats;

pub use debounce::DebounceTimer;
pub use engine::{SharedDocument, ThemeEngine};
pub use installer::{STYLESHEET_ID, install, is_installed, uninstall};
pub use reconcile::{PassOutcome, run_pass};
pub use stats::{EngineStats, StatsSnapshot};

use core::time::Duration;
use lacquer_dom::MutationFilter;

/// Quiet window behind mutation batches before a pass runs.
pub const MUTATION_DEBOUNCE: Duration = Duration::from_millis(100);

/// Quiet window behind viewport resizes before a pass runs.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// The host attribute that names element roles; watched alongside `class`.
pub const ROLE_ATTR: &str = "data-element-id";

/// The observation filter the engine registers: child-list churn plus the
/// two attributes that change which rules match. Inline `style` rewrites —
/// including our own — are deliberately outside it.
pub fn observer_filter() -> MutationFilter {
    MutationFilter::child_list_and_attributes(["class", ROLE_ATTR])
}
