//! Custom-property environments and `var()` substitution.
//! Spec: <https://www.w3.org/TR/css-variables-1/>

use std::collections::BTreeMap;

/// A set of custom properties. Keys include the leading `--`; values are raw
/// token strings. Ordered so generated output stays deterministic.
pub type CustomProperties = BTreeMap<String, String>;

/// Substitute every `var(--name)` / `var(--name, fallback)` in `value`
/// against `env`.
///
/// Unknown names resolve to their fallback, or to the empty string without
/// one. A self- or mutually-referential chain is treated as unknown at the
/// point the cycle closes. A `var(` with no closing paren is kept verbatim.
pub fn resolve_var_refs(value: &str, env: &CustomProperties) -> String {
    let mut active: Vec<String> = Vec::new();
    substitute(value, env, &mut active)
}

fn substitute(value: &str, env: &CustomProperties, active: &mut Vec<String>) -> String {
    let Some((before, after_open)) = value.split_once("var(") else {
        return value.to_owned();
    };
    let Some((args, rest)) = split_at_closing_paren(after_open) else {
        return value.to_owned();
    };
    let replacement = resolve_one(args, env, active);
    let resolved_rest = substitute(rest, env, active);
    let mut out = String::with_capacity(
        before
            .len()
            .saturating_add(replacement.len())
            .saturating_add(resolved_rest.len()),
    );
    out.push_str(before);
    out.push_str(&replacement);
    out.push_str(&resolved_rest);
    out
}

/// Split `args ) rest`, honoring nested parens inside the argument (as in a
/// fallback like `var(--a, rgba(0, 0, 0, 0.1))`).
fn split_at_closing_paren(input: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (index, character) in input.char_indices() {
        match character {
            '(' => depth = depth.saturating_add(1),
            ')' => {
                if depth == 0 {
                    let rest_start = index.saturating_add(1);
                    return Some((input.get(..index)?, input.get(rest_start..)?));
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    None
}

fn resolve_one(args: &str, env: &CustomProperties, active: &mut Vec<String>) -> String {
    let (raw_name, fallback) = match args.split_once(',') {
        Some((name_part, fallback_part)) => (name_part.trim(), Some(fallback_part.trim())),
        None => (args.trim(), None),
    };
    if !raw_name.starts_with("--") {
        return fallback.map_or_else(String::new, |text| substitute(text, env, active));
    }
    let cycles = active.iter().any(|seen| seen == raw_name);
    let known = env.get(raw_name);
    match known {
        Some(resolved) if !cycles => {
            active.push(raw_name.to_owned());
            let expanded = substitute(resolved, env, active);
            active.pop();
            expanded
        }
        _ => fallback.map_or_else(String::new, |text| substitute(text, env, active)),
    }
}
