//! Stylesheet generation.
//!
//! Pure text transform from (tokens, selector table) to one CSS blob:
//! custom-property declarations, a dark-mode redefinition scope, and one
//! override block per table entry. Every declaration references tokens
//! through `var()` so value edits never touch the rules, and every
//! declaration carries `!important` to outrank the host page's own sheets.

use crate::config::token_name;
use crate::{SelectorTable, ThemeConfig};

/// Declarations for a role's main rule block. Values are custom-property
/// references exclusively.
fn declarations_for(role: &str) -> &'static [(&'static str, &'static str)] {
    match role {
        "body" => &[
            ("background-color", "var(--lacquer-main-bg)"),
            ("color", "var(--lacquer-text-primary)"),
            ("font-family", "var(--lacquer-font-family)"),
        ],
        "sidebar-background" => &[
            ("background-color", "var(--lacquer-sidebar-bg)"),
            ("border-right", "1px solid var(--lacquer-border)"),
        ],
        "sidebar-beginning" => &[
            ("background-color", "var(--lacquer-workspace-bg)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("margin", "var(--lacquer-space-sm)"),
        ],
        "workspace-bar" => &[("background-color", "var(--lacquer-workspace-bg)")],
        "new-chat-button" => &[
            ("background-color", "var(--lacquer-primary)"),
            ("color", "white"),
            ("border", "none"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("font-weight", "var(--lacquer-font-weight-medium)"),
            ("box-shadow", "var(--lacquer-shadow-sm)"),
        ],
        "user-profile-button" => &[("border-radius", "var(--lacquer-radius-lg)")],
        "user-profile-image" => &[
            ("border-radius", "var(--lacquer-radius-md)"),
            ("border", "2px solid var(--lacquer-border)"),
        ],
        "chat-container" => &[
            ("background-color", "var(--lacquer-main-bg)"),
            ("color", "var(--lacquer-text-primary)"),
        ],
        "user-message" => &[
            ("background-color", "var(--lacquer-sidebar-bg)"),
            ("color", "var(--lacquer-text-primary)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("padding", "var(--lacquer-space-md)"),
        ],
        "assistant-message" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("padding", "var(--lacquer-space-md)"),
            ("box-shadow", "var(--lacquer-shadow-sm)"),
        ],
        "input-container" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("box-shadow", "var(--lacquer-shadow-sm)"),
        ],
        "input-textarea" => &[
            ("background-color", "transparent"),
            ("border", "none"),
            ("color", "var(--lacquer-text-primary)"),
            ("font-family", "var(--lacquer-font-family-sidebar)"),
            ("border-radius", "var(--lacquer-radius-md)"),
        ],
        "send-button" | "more-options-button" => &[
            ("background-color", "var(--lacquer-primary)"),
            ("color", "white"),
            ("border", "none"),
            ("border-radius", "var(--lacquer-radius-md)"),
        ],
        "regenerate-button" => &[
            ("background-color", "var(--lacquer-primary)"),
            ("color", "white"),
            ("border", "1px solid var(--lacquer-primary)"),
            ("border-radius", "var(--lacquer-radius-md)"),
            ("font-weight", "var(--lacquer-font-weight-medium)"),
        ],
        "search-chats-bar" => &[
            ("background-color", "var(--lacquer-sidebar-bg)"),
            ("color", "var(--lacquer-text-primary)"),
        ],
        "tag-search-panel" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("box-shadow", "var(--lacquer-shadow-lg)"),
        ],
        "chat-item" => &[
            ("color", "var(--lacquer-text-primary)"),
            ("border-radius", "var(--lacquer-radius-md)"),
        ],
        "modal" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("color", "var(--lacquer-text-primary)"),
            ("border", "1px solid var(--lacquer-border)"),
        ],
        "modal-close-button" => &[
            ("background-color", "var(--lacquer-text-primary)"),
            ("color", "white"),
        ],
        "checkbox" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-sm)"),
            ("color", "var(--lacquer-primary)"),
        ],
        "code-inline" => &[
            ("background-color", "var(--lacquer-sidebar-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-sm)"),
            ("color", "var(--lacquer-text-primary)"),
        ],
        "code-block" => &[
            ("background-color", "var(--lacquer-sidebar-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-md)"),
            ("padding", "var(--lacquer-space-md)"),
            ("overflow-x", "auto"),
        ],
        "overlay-card" | "overlay-dropdown" | "overlay-tooltip" => &[
            ("background-color", "var(--lacquer-card-bg)"),
            ("border", "1px solid var(--lacquer-border)"),
            ("border-radius", "var(--lacquer-radius-lg)"),
            ("box-shadow", "var(--lacquer-shadow-lg)"),
            ("color", "var(--lacquer-text-primary)"),
        ],
        _ => &[],
    }
}

/// Hover-state declarations, where the original theme restyles hover.
fn hover_declarations_for(role: &str) -> &'static [(&'static str, &'static str)] {
    match role {
        "new-chat-button" | "send-button" | "more-options-button" => &[
            ("background-color", "var(--lacquer-primary-hover)"),
            ("box-shadow", "var(--lacquer-shadow-md)"),
        ],
        "regenerate-button" => &[
            ("background-color", "var(--lacquer-primary-hover)"),
            ("border-color", "var(--lacquer-primary-hover)"),
        ],
        "chat-item" => &[("background-color", "var(--lacquer-sidebar-bg)")],
        "user-profile-button" => &[("background-color", "var(--lacquer-primary-light)")],
        "tag-search-panel" => &[("border-color", "var(--lacquer-border-hover)")],
        _ => &[],
    }
}

/// Override blocks the selector table cannot express per-role: the host's
/// utility-class repaints, form elements, global text defaults, scrollbar,
/// and focus outlines. References tokens only, like everything else.
const GLOBAL_RULES: &str = "\
/* Utility-class repaints */
button.bg-blue-600:not([data-element-id=\"new-chat-button-in-side-bar\"]):not([data-element-id=\"regenerate-button\"]),
.bg-blue-600:not([data-element-id=\"user-message\"]) {
    background-color: var(--lacquer-primary) !important;
    color: white !important;
    border-color: var(--lacquer-primary) !important;
}
button.bg-gray-600,
.bg-gray-600 {
    background-color: var(--lacquer-text-secondary) !important;
    color: white !important;
    border-color: var(--lacquer-text-secondary) !important;
}
button.text-blue-500 {
    color: var(--lacquer-primary) !important;
}

/* Form elements */
input, textarea, select {
    background-color: var(--lacquer-card-bg) !important;
    border: 1px solid var(--lacquer-border) !important;
    border-radius: var(--lacquer-radius-md) !important;
    color: var(--lacquer-text-primary) !important;
    font-family: var(--lacquer-font-family) !important;
}
input:focus, textarea:focus, select:focus {
    outline: none !important;
    border-color: var(--lacquer-primary) !important;
    box-shadow: 0 0 0 2px var(--lacquer-primary-light) !important;
}
input[type=\"checkbox\"]:checked {
    background-color: var(--lacquer-primary) !important;
    border-color: var(--lacquer-primary) !important;
}

/* Text defaults */
h1, h2, h3, h4, h5, h6 {
    color: var(--lacquer-text-primary) !important;
    font-family: var(--lacquer-font-family) !important;
    font-weight: var(--lacquer-font-weight-semibold) !important;
}
p {
    color: var(--lacquer-text-primary) !important;
    font-family: var(--lacquer-font-family) !important;
}
a {
    color: var(--lacquer-primary) !important;
    text-decoration: none !important;
}
a:hover {
    color: var(--lacquer-primary-hover) !important;
    text-decoration: underline !important;
}

/* Scrollbar */
::-webkit-scrollbar {
    width: 8px !important;
    height: 8px !important;
}
::-webkit-scrollbar-track {
    background: var(--lacquer-sidebar-bg) !important;
    border-radius: var(--lacquer-radius-sm) !important;
}
::-webkit-scrollbar-thumb {
    background: var(--lacquer-border) !important;
    border-radius: var(--lacquer-radius-sm) !important;
}
::-webkit-scrollbar-thumb:hover {
    background: var(--lacquer-border-hover) !important;
}

/* Damp the host's color transitions to avoid repaint flashes */
* {
    transition: none !important;
}
button {
    transition: transform 0.2s ease, box-shadow 0.2s ease !important;
}

/* Focus visibility */
button:focus-visible, input:focus-visible, textarea:focus-visible, select:focus-visible {
    outline: 2px solid var(--lacquer-primary) !important;
    outline-offset: 2px !important;
}
";

/// Bridge the host page's own dark-mode variables onto our surfaces so its
/// variable-driven chrome follows the theme too.
const DARK_BRIDGE_RULES: &str = "\
body {
    --sidebar-color: var(--lacquer-sidebar-bg) !important;
    --workspace-color: var(--lacquer-workspace-bg) !important;
    --popup-color: var(--lacquer-card-bg) !important;
    --main-dark-color: var(--lacquer-main-bg) !important;
}
body.dark {
    --main-dark-color: var(--lacquer-main-bg) !important;
    --sidebar-color: var(--lacquer-sidebar-bg) !important;
    --workspace-color: var(--lacquer-workspace-bg) !important;
    --popup-color: var(--lacquer-card-bg) !important;
}
";

/// Produce the full stylesheet text. Deterministic: equal inputs yield
/// byte-identical output.
pub fn generate(config: &ThemeConfig, table: &SelectorTable) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("/* Lacquer theme overlay */\n");

    out.push_str(":root {\n");
    for (name, value) in config.custom_properties() {
        push_property(&mut out, &name, &value);
    }
    out.push_str("}\n\n");

    out.push_str(".dark {\n");
    for (name, value) in config.dark_overrides() {
        push_property(&mut out, &name, &value);
    }
    out.push_str("}\n\n");

    out.push_str(DARK_BRIDGE_RULES);
    out.push('\n');

    for entry in table.iter() {
        let declarations = declarations_for(&entry.role);
        if !declarations.is_empty() {
            push_rule(&mut out, &entry.selector, declarations);
        }
        let hover = hover_declarations_for(&entry.role);
        if !hover.is_empty() {
            let mut selector = entry.selector.clone();
            selector.push_str(":hover");
            push_rule(&mut out, &selector, hover);
        }
    }

    out.push_str(GLOBAL_RULES);
    out
}

fn push_rule(out: &mut String, selector: &str, declarations: &[(&str, &str)]) {
    out.push_str(selector);
    out.push_str(" {\n");
    for (property, value) in declarations {
        out.push_str("    ");
        out.push_str(property);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(" !important;\n");
    }
    out.push_str("}\n");
}

fn push_property(out: &mut String, name: &str, value: &str) {
    out.push_str("    ");
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str(";\n");
}

/// True if the generated sheet declares the named token (prefixed form).
pub fn declares_token(sheet: &str, short_name: &str) -> bool {
    sheet.contains(&token_name(short_name))
}
