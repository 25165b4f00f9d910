//! Theme configuration and stylesheet generation.
//!
//! A [`ThemeConfig`] is the full set of design tokens (colors, typography,
//! spacing, radii, shadows); a [`SelectorTable`] maps semantic element roles
//! to the one query expression that finds them on the host page. Both feed
//! [`stylesheet::generate`], and the same tokens feed the
//! [`rules::PatchRule`] table the reconciler applies at runtime — so the
//! static and dynamic halves can never disagree about a value.

#![forbid(unsafe_code)]

mod config;
pub mod rules;
pub mod stylesheet;
mod table;

pub use config::{ColorTokens, RadiusScale, ShadowScale, SpacingScale, ThemeConfig, Typography};
pub use table::{SelectorEntry, SelectorTable};

use thiserror::Error;

/// Name of the custom-property prefix every generated token uses.
pub const TOKEN_PREFIX: &str = "--lacquer";

/// Startup-time configuration faults. These abort `start()`; they are
/// programming errors in static configuration, not runtime conditions.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A color token does not parse as a CSS color.
    #[error("color token `{name}` has unparseable value `{value}`")]
    InvalidColor { name: String, value: String },
    /// A selector-table entry does not parse.
    #[error("selector for role `{role}` is invalid: {source}")]
    InvalidSelector {
        role: String,
        #[source]
        source: lacquer_selectors::ParseError,
    },
    /// A theme file could not be decoded.
    #[error("theme JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
