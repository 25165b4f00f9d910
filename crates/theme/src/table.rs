//! The role → selector table.
//!
//! Roles are stable identifiers shared between the generated stylesheet and
//! the reconciler's patch rules, so both sides always target the same
//! elements. Entries keep declaration order; generation iterates them as
//! written.

use crate::ThemeError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One semantic role and the query expression that finds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub role: String,
    pub selector: String,
}

/// Ordered role → selector mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorTable {
    entries: Vec<SelectorEntry>,
}

impl SelectorTable {
    pub fn new(entries: Vec<SelectorEntry>) -> Self {
        Self { entries }
    }

    /// The table for the TypingMind-style chat page the default theme
    /// targets.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selector for a role, if the table has it.
    pub fn selector_for(&self, role: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.role == role)
            .map(|entry| entry.selector.as_str())
    }

    /// Parse every selector, rejecting the table on the first bad entry.
    ///
    /// # Errors
    /// [`ThemeError::InvalidSelector`] naming the offending role.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for entry in &self.entries {
            if let Err(source) = lacquer_selectors::parse_list(&entry.selector) {
                return Err(ThemeError::InvalidSelector {
                    role: entry.role.clone(),
                    source,
                });
            }
        }
        Ok(())
    }
}

fn entry(role: &str, selector: &str) -> SelectorEntry {
    SelectorEntry {
        role: role.to_owned(),
        selector: selector.to_owned(),
    }
}

static BUILTIN: Lazy<SelectorTable> = Lazy::new(|| {
    SelectorTable::new(vec![
        entry("body", "body"),
        entry("sidebar-background", "[data-element-id=\"side-bar-background\"]"),
        entry("sidebar-beginning", "[data-element-id=\"sidebar-beginning-part\"]"),
        entry("workspace-bar", "[data-element-id=\"workspace-bar\"]"),
        entry("new-chat-button", "[data-element-id=\"new-chat-button-in-side-bar\"]"),
        entry("user-profile-button", "[data-element-id=\"workspace-profile-button\"]"),
        entry("user-profile-image", "[data-element-id=\"user-profile-image\"]"),
        entry("chat-container", "[data-element-id=\"chat-container\"]"),
        entry("user-message", "[data-element-id=\"user-message\"]"),
        entry("assistant-message", "[data-element-id=\"message-assistant\"]"),
        entry("input-container", "[data-element-id=\"input-container\"]"),
        entry("input-textarea", "[data-element-id=\"input-textarea\"]"),
        entry("send-button", "[data-element-id=\"send-button\"]"),
        entry("more-options-button", "[data-element-id=\"more-options-button\"]"),
        entry("regenerate-button", "[data-element-id=\"regenerate-button\"]"),
        entry("search-chats-bar", "[data-element-id=\"search-chats-bar\"]"),
        entry("tag-search-panel", "[data-element-id=\"tag-search-panel\"]"),
        entry("chat-item", "[data-element-id=\"custom-chat-item\"]"),
        entry("modal", "[data-element-id=\"pop-up-modal\"]"),
        entry("modal-close-button", "[data-element-id=\"close-modal-button\"]"),
        entry("checkbox", "input[type=\"checkbox\"]"),
        entry("code-inline", "code"),
        entry("code-block", "pre"),
        entry("overlay-card", ".card"),
        entry("overlay-dropdown", ".dropdown"),
        entry("overlay-tooltip", ".tooltip"),
    ])
});
