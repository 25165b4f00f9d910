//! Lifecycle control and the debounced event loop.

use crate::{
    DebounceTimer, EngineStats, MUTATION_DEBOUNCE, PassOutcome, RESIZE_DEBOUNCE, StatsSnapshot,
    fault, installer, observer_filter, reconcile,
};
use anyhow::Result;
use lacquer_dom::{Document, Mutation, MutationStream, ReadyState, Viewport};
use lacquer_theme::rules::{PatchRule, builtin_patch_rules};
use lacquer_theme::{SelectorTable, ThemeConfig, stylesheet};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// The document handle shared between the host and the engine.
pub type SharedDocument = Arc<Mutex<Document>>;

/// One theme engine per page. The caller holds the instance; there are no
/// implicit globals, so a second concurrent engine cannot arise by accident.
///
/// `start()` installs the stylesheet, runs one eager pass, and registers
/// the mutation observation plus the viewport watch. `stop()` reverses all
/// of it. `start(); stop(); start();` is equivalent to a single `start()`.
pub struct ThemeEngine {
    doc: SharedDocument,
    theme: ThemeConfig,
    table: SelectorTable,
    custom_rules: Option<Vec<PatchRule>>,
    stats: Arc<EngineStats>,
    running: Option<Running>,
}

struct Running {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ThemeEngine {
    /// An engine over `doc` with the built-in theme, selector table, and
    /// patch rules.
    pub fn new(doc: SharedDocument) -> Self {
        Self {
            doc,
            theme: ThemeConfig::default(),
            table: SelectorTable::builtin().clone(),
            custom_rules: None,
            stats: Arc::new(EngineStats::default()),
            running: None,
        }
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Replace the theme. Takes effect at the next `start()`.
    pub fn set_theme(&mut self, theme: ThemeConfig) {
        self.theme = theme;
    }

    pub fn selector_table(&self) -> &SelectorTable {
        &self.table
    }

    pub fn set_selector_table(&mut self, table: SelectorTable) {
        self.table = table;
    }

    /// Override the built-in patch rules. Takes effect at the next `start()`.
    pub fn set_patch_rules(&mut self, rules: Vec<PatchRule>) {
        self.custom_rules = Some(rules);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The stylesheet for the current configuration.
    pub fn stylesheet(&self) -> String {
        stylesheet::generate(&self.theme, &self.table)
    }

    fn patch_rules(&self) -> Vec<PatchRule> {
        self.custom_rules
            .clone()
            .unwrap_or_else(|| builtin_patch_rules(&self.theme))
    }

    /// Bring the theme up. If the document is still loading, initialization
    /// is deferred to its ready notification; otherwise it happens now.
    /// Calling `start()` on a running engine is a no-op.
    ///
    /// # Errors
    /// Configuration faults (unparseable color or selector) abort before
    /// any side effect, as does a page with no `<head>`.
    pub async fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            log::debug!(target: "lacquer_engine", "start() while running is a no-op");
            return Ok(());
        }
        self.theme.validate()?;
        self.table.validate()?;
        let css = self.stylesheet();
        let rules = self.patch_rules();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut doc = self.doc.lock().await;
        let observation = match doc.observe(observer_filter()) {
            Ok(stream) => Some(stream),
            Err(error) => {
                log::warn!(
                    target: "lacquer_engine",
                    "observation unavailable ({error}); falling back to a single eager pass"
                );
                None
            }
        };
        let ready = doc.ready_state() == ReadyState::Complete;
        let defer_init = !ready && observation.is_some();
        if !defer_init {
            // Either the page is ready, or this degraded page gets its one
            // eager pass now.
            installer::install(&mut doc, &css)?;
            guarded_pass(&mut doc, &css, &rules, &self.stats);
        }
        let task = observation.map(|mutations| {
            let context = LoopContext {
                doc: Arc::clone(&self.doc),
                css,
                rules,
                stats: Arc::clone(&self.stats),
                mutations: Some(mutations),
                viewport: Some(doc.watch_viewport()),
                shutdown: shutdown_rx,
                initialize: defer_init,
            };
            tokio::spawn(event_loop(context))
        });
        drop(doc);
        self.running = Some(Running {
            shutdown: shutdown_tx,
            task,
        });
        log::info!(target: "lacquer_engine", "theme engine started");
        Ok(())
    }

    /// Tear the theme down: end the event loop, drop both registrations,
    /// and remove the installed stylesheet. Idempotent.
    ///
    /// # Errors
    /// Fails only if the stylesheet node exists but cannot be removed.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        drop(running.shutdown.send(true));
        if let Some(task) = running.task
            && let Err(error) = task.await
        {
            log::warn!(target: "lacquer_engine", "event loop ended abnormally: {error}");
        }
        let mut doc = self.doc.lock().await;
        installer::uninstall(&mut doc)?;
        log::info!(target: "lacquer_engine", "theme engine stopped");
        Ok(())
    }

    /// Run one pass immediately, outside the debounce schedule. Exposed for
    /// console debugging and host composition.
    pub async fn reconcile(&self) -> PassOutcome {
        let css = self.stylesheet();
        let rules = self.patch_rules();
        let mut doc = self.doc.lock().await;
        guarded_pass(&mut doc, &css, &rules, &self.stats)
    }
}

/// Run a pass inside the fault guard and record it.
fn guarded_pass(
    doc: &mut Document,
    css: &str,
    rules: &[PatchRule],
    stats: &EngineStats,
) -> PassOutcome {
    match fault::guard("reconcile", || reconcile::run_pass(doc, css, rules)) {
        Some(outcome) => {
            stats.record_pass(outcome);
            outcome
        }
        None => {
            stats.record_fault();
            PassOutcome::default()
        }
    }
}

struct LoopContext {
    doc: SharedDocument,
    css: String,
    rules: Vec<PatchRule>,
    stats: Arc<EngineStats>,
    mutations: Option<MutationStream>,
    viewport: Option<watch::Receiver<Viewport>>,
    shutdown: watch::Receiver<bool>,
    /// True when the page was still loading at `start()`: installation and
    /// the eager pass then wait for the ready notification.
    initialize: bool,
}

/// The single event loop: every trigger funnels through two single-slot
/// debounce timers, so at most one pass is ever pending and passes never
/// overlap.
async fn event_loop(mut context: LoopContext) {
    if context.initialize {
        if !wait_for_ready(&mut context).await {
            return;
        }
        let mut doc = context.doc.lock().await;
        if let Err(error) = installer::install(&mut doc, &context.css) {
            log::error!(target: "lacquer_engine", "deferred install failed: {error:#}");
        }
        guarded_pass(&mut doc, &context.css, &context.rules, &context.stats);
    }

    let mut mutation_timer = DebounceTimer::new(MUTATION_DEBOUNCE);
    let mut resize_timer = DebounceTimer::new(RESIZE_DEBOUNCE);
    loop {
        let next_deadline = earliest(mutation_timer.deadline(), resize_timer.deadline());
        tokio::select! {
            changed = context.shutdown.changed() => {
                if changed.is_err() || *context.shutdown.borrow() {
                    break;
                }
            }
            batch = next_batch(&mut context.mutations) => {
                match batch {
                    Some(records) => {
                        log::trace!(
                            target: "lacquer_engine",
                            "{} qualifying mutation records; debounce re-armed",
                            records.len()
                        );
                        mutation_timer.arm(Instant::now());
                    }
                    None => context.mutations = None,
                }
            }
            resized = viewport_changed(&mut context.viewport) => {
                if resized {
                    resize_timer.arm(Instant::now());
                } else {
                    context.viewport = None;
                }
            }
            () = sleep_until_deadline(next_deadline) => {
                let now = Instant::now();
                let mutation_due = mutation_timer.fire_if_due(now);
                let resize_due = resize_timer.fire_if_due(now);
                if mutation_due || resize_due {
                    let mut doc = context.doc.lock().await;
                    guarded_pass(&mut doc, &context.css, &context.rules, &context.stats);
                }
            }
        }
    }
}

/// Block until the ready notification (true) or shutdown (false).
async fn wait_for_ready(context: &mut LoopContext) -> bool {
    loop {
        tokio::select! {
            changed = context.shutdown.changed() => {
                if changed.is_err() || *context.shutdown.borrow() {
                    return false;
                }
            }
            batch = next_batch(&mut context.mutations) => {
                match batch {
                    Some(records) => {
                        if records
                            .iter()
                            .any(|record| matches!(record, Mutation::DocumentReady))
                        {
                            return true;
                        }
                    }
                    None => return false,
                }
            }
        }
    }
}

async fn next_batch(stream: &mut Option<MutationStream>) -> Option<Vec<Mutation>> {
    match stream.as_mut() {
        Some(active) => active.recv().await,
        None => core::future::pending().await,
    }
}

async fn viewport_changed(watcher: &mut Option<watch::Receiver<Viewport>>) -> bool {
    match watcher.as_mut() {
        Some(active) => active.changed().await.is_ok(),
        None => core::future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => core::future::pending().await,
    }
}

fn earliest(first: Option<Instant>, second: Option<Instant>) -> Option<Instant> {
    match (first, second) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}
