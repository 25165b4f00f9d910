//! Patch rules for the dynamic reconciler.
//!
//! Declarative stylesheet rules lose to inline styles and to utility classes
//! the host applies after first paint; these rules are applied as inline
//! properties instead. Values are resolved from the token environment when
//! the table is built — a pass never computes a token.

use crate::ThemeConfig;
use lacquer_style::resolve_var_refs;
use serde::{Deserialize, Serialize};

/// Predicate over an element's current class list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchPredicate {
    /// The class list contains this exact token.
    HasClass(String),
    /// The raw `class` attribute contains this substring
    /// (the `[class*="…"]` form).
    ClassFragment(String),
}

impl PatchPredicate {
    /// Evaluate against an element's class tokens and raw class attribute.
    pub fn matches(&self, classes: &[String], class_attr: Option<&str>) -> bool {
        match self {
            Self::HasClass(token) => classes.iter().any(|class| class == token),
            Self::ClassFragment(fragment) => {
                !fragment.is_empty() && class_attr.is_some_and(|raw| raw.contains(fragment.as_str()))
            }
        }
    }
}

/// One inline-property assignment applied to every matching element during a
/// reconciliation pass. Reapplication is a no-op: same property, same value,
/// same serialized attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRule {
    /// Stable identifier, aligned with the selector-table roles.
    pub role: String,
    pub predicate: PatchPredicate,
    /// CSS property name to set inline.
    pub property: String,
    /// Literal value (already token-resolved).
    pub value: String,
}

/// `(role, predicate, property, token reference)` — resolved against the
/// theme when the table is built.
type RuleSpec = (&'static str, PatchPredicateSpec, &'static str, &'static str);

enum PatchPredicateSpec {
    HasClass(&'static str),
    ClassFragment(&'static str),
}

const RULE_SPECS: &[RuleSpec] = &[
    // The host repaints these surfaces with utility classes while messages
    // stream in; the stylesheet alone cannot keep up with inline styles it
    // sets alongside them.
    (
        "sidebar-surface",
        PatchPredicateSpec::HasClass("bg-gray-800"),
        "background-color",
        "var(--lacquer-sidebar-bg)",
    ),
    (
        "sidebar-text",
        PatchPredicateSpec::HasClass("text-white"),
        "color",
        "var(--lacquer-text-primary)",
    ),
    (
        "send-button",
        PatchPredicateSpec::HasClass("bg-blue-600"),
        "background-color",
        "var(--lacquer-primary)",
    ),
    (
        "gray-button",
        PatchPredicateSpec::ClassFragment("bg-gray-600"),
        "background-color",
        "var(--lacquer-text-secondary)",
    ),
];

/// Build the built-in rule table with every value resolved to a literal.
pub fn builtin_patch_rules(config: &ThemeConfig) -> Vec<PatchRule> {
    let env = config.custom_properties();
    RULE_SPECS
        .iter()
        .map(|(role, predicate, property, reference)| PatchRule {
            role: (*role).to_owned(),
            predicate: match predicate {
                PatchPredicateSpec::HasClass(token) => {
                    PatchPredicate::HasClass((*token).to_owned())
                }
                PatchPredicateSpec::ClassFragment(fragment) => {
                    PatchPredicate::ClassFragment((*fragment).to_owned())
                }
            },
            property: (*property).to_owned(),
            value: resolve_var_refs(reference, &env),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PatchPredicate, builtin_patch_rules};
    use crate::ThemeConfig;

    #[test]
    fn values_resolve_to_literals_at_build_time() {
        let rules = builtin_patch_rules(&ThemeConfig::default());
        let send = rules
            .iter()
            .find(|rule| rule.role == "send-button")
            .map(|rule| rule.value.as_str());
        assert_eq!(send, Some("#d97449"));
        assert!(rules.iter().all(|rule| !rule.value.contains("var(")));
    }

    #[test]
    fn predicates_match_class_lists_and_fragments() {
        let classes = vec!["bg-blue-600".to_owned(), "rounded-md".to_owned()];
        let raw = Some("bg-blue-600 rounded-md");
        assert!(PatchPredicate::HasClass("bg-blue-600".to_owned()).matches(&classes, raw));
        assert!(!PatchPredicate::HasClass("bg-blue".to_owned()).matches(&classes, raw));
        assert!(PatchPredicate::ClassFragment("blue-6".to_owned()).matches(&classes, raw));
        assert!(!PatchPredicate::ClassFragment(String::new()).matches(&classes, raw));
    }
}
