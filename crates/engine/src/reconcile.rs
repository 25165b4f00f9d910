//! The reconciliation pass.

use crate::installer;
use anyhow::Result;
use lacquer_dom::{Document, DomError, NodeId};
use lacquer_theme::rules::PatchRule;

/// What one pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Rule matches found during the scan.
    pub matched: usize,
    /// Inline properties written.
    pub patched: usize,
    /// Matches skipped because the element vanished mid-pass.
    pub skipped: usize,
    /// Whether the reserved style node had to be recreated.
    pub reinstalled: bool,
}

/// One full scan-and-patch cycle.
///
/// Recreates the stylesheet if the host removed it, then overwrites the
/// prescribed inline property on every element a rule matches. Writes are
/// unconditional — the prior value is never read — so repeated passes
/// converge regardless of what the host wrote in between (last writer
/// wins; no merge). A vanished element is skipped and the pass continues.
///
/// # Errors
/// Only stylesheet reinstallation can fail; per-element write faults are
/// absorbed and counted in the outcome.
pub fn run_pass(doc: &mut Document, css: &str, rules: &[PatchRule]) -> Result<PassOutcome> {
    let mut outcome = PassOutcome::default();

    if !installer::is_installed(doc) {
        installer::install(doc, css)?;
        outcome.reinstalled = true;
        log::info!(target: "lacquer_engine", "stylesheet was missing, reinstalled");
    }

    let work = collect_matches(doc, rules);
    outcome.matched = work.len();
    let (patched, skipped) = apply_patches(doc, rules, &work);
    outcome.patched = patched;
    outcome.skipped = skipped;

    log::debug!(
        target: "lacquer_engine",
        "pass complete: {} matched, {} patched, {} skipped",
        outcome.matched,
        outcome.patched,
        outcome.skipped
    );
    Ok(outcome)
}

/// Write the matched patches. A match whose element vanished in the
/// meantime is skipped; every other match is still written.
fn apply_patches(
    doc: &mut Document,
    rules: &[PatchRule],
    work: &[(NodeId, usize)],
) -> (usize, usize) {
    let mut patched = 0usize;
    let mut skipped = 0usize;
    for &(node, rule_index) in work {
        let Some(rule) = rules.get(rule_index) else {
            continue;
        };
        match doc.set_inline_property(node, &rule.property, &rule.value) {
            Ok(()) => patched = patched.saturating_add(1),
            Err(DomError::Stale(_)) => {
                skipped = skipped.saturating_add(1);
                log::debug!(target: "lacquer_engine", "element vanished before patch ({})", rule.role);
            }
            Err(error) => {
                skipped = skipped.saturating_add(1);
                log::warn!(target: "lacquer_engine", "patch write failed for {}: {error}", rule.role);
            }
        }
    }
    (patched, skipped)
}

/// Snapshot the (element, rule) pairs to patch, in document order.
fn collect_matches(doc: &Document, rules: &[PatchRule]) -> Vec<(NodeId, usize)> {
    let mut work = Vec::new();
    for node in doc.elements() {
        let Some(element) = doc.element(node) else {
            continue;
        };
        let class_attr = element.attr("class");
        for (rule_index, rule) in rules.iter().enumerate() {
            if rule.predicate.matches(element.classes(), class_attr) {
                work.push((node, rule_index));
            }
        }
    }
    work
}

#[cfg(test)]
mod tests {
    use super::{apply_patches, collect_matches};
    use lacquer_dom::Document;
    use lacquer_theme::ThemeConfig;
    use lacquer_theme::rules::builtin_patch_rules;

    /// One matched element vanishing between match and write must not stop
    /// the remaining matches from being patched.
    #[test]
    fn vanished_match_is_skipped_others_still_patched() -> Result<(), lacquer_dom::DomError> {
        let mut doc = Document::parse_html(
            "<html><body>\
             <button class=\"bg-blue-600\">a</button>\
             <button class=\"bg-blue-600\">b</button>\
             <button class=\"bg-blue-600\">c</button>\
             </body></html>",
        )?;
        let rules = builtin_patch_rules(&ThemeConfig::default());

        let work = collect_matches(&doc, &rules);
        assert_eq!(work.len(), 3);

        let (victim, _) = work[1];
        doc.remove_node(victim)?;

        let (patched, skipped) = apply_patches(&mut doc, &rules, &work);
        assert_eq!(patched, 2);
        assert_eq!(skipped, 1);
        for &(node, _) in &[work[0], work[2]] {
            assert_eq!(doc.inline_property(node, "background-color"), Some("#d97449"));
        }
        Ok(())
    }
}

