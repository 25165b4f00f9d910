//! Design tokens.
//!
//! The defaults are the warm Claude-inspired palette: muted signature orange
//! on off-white, beige surfaces, and a matching set of dark-mode surfaces.

use crate::{ThemeError, TOKEN_PREFIX};
use lacquer_style::CustomProperties;
use serde::{Deserialize, Serialize};

/// Color roles. Light-mode surfaces and text carry no prefix; the `dark_*`
/// fields are the subset redefined under the host's `.dark` scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorTokens {
    pub primary: String,
    pub primary_hover: String,
    pub primary_light: String,
    pub primary_medium: String,

    pub main_bg: String,
    pub sidebar_bg: String,
    pub workspace_bg: String,
    pub card_bg: String,

    pub text_primary: String,
    pub text_secondary: String,
    pub text_muted: String,

    pub dark_main_bg: String,
    pub dark_sidebar_bg: String,
    pub dark_workspace_bg: String,
    pub dark_card_bg: String,

    pub dark_text_primary: String,
    pub dark_text_secondary: String,
    pub dark_text_muted: String,

    pub border: String,
    pub border_hover: String,
    pub dark_border: String,
    pub dark_border_hover: String,

    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
}

impl Default for ColorTokens {
    fn default() -> Self {
        Self {
            primary: "#d97449".to_owned(),
            primary_hover: "#c4653f".to_owned(),
            primary_light: "#d9744920".to_owned(),
            primary_medium: "#d9744930".to_owned(),

            main_bg: "#fdfcfb".to_owned(),
            sidebar_bg: "#f7f5f3".to_owned(),
            workspace_bg: "#f0ede8".to_owned(),
            card_bg: "#ffffff".to_owned(),

            text_primary: "#1a1a1a".to_owned(),
            text_secondary: "#6b7280".to_owned(),
            text_muted: "#9ca3af".to_owned(),

            dark_main_bg: "#2f2f2f".to_owned(),
            dark_sidebar_bg: "#171717".to_owned(),
            dark_workspace_bg: "#1a1a1a".to_owned(),
            dark_card_bg: "#262626".to_owned(),

            dark_text_primary: "#e8e8e8".to_owned(),
            dark_text_secondary: "#a3a3a3".to_owned(),
            dark_text_muted: "#737373".to_owned(),

            border: "#e5e7eb".to_owned(),
            border_hover: "#d1d5db".to_owned(),
            dark_border: "#404040".to_owned(),
            dark_border_hover: "#525252".to_owned(),

            success: "#10b981".to_owned(),
            error: "#ef4444".to_owned(),
            warning: "#f59e0b".to_owned(),
            info: "#3b82f6".to_owned(),
        }
    }
}

impl ColorTokens {
    /// Every color field with its token name, in declaration order.
    fn named(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("primary", &self.primary),
            ("primary-hover", &self.primary_hover),
            ("primary-light", &self.primary_light),
            ("primary-medium", &self.primary_medium),
            ("main-bg", &self.main_bg),
            ("sidebar-bg", &self.sidebar_bg),
            ("workspace-bg", &self.workspace_bg),
            ("card-bg", &self.card_bg),
            ("text-primary", &self.text_primary),
            ("text-secondary", &self.text_secondary),
            ("text-muted", &self.text_muted),
            ("dark-main-bg", &self.dark_main_bg),
            ("dark-sidebar-bg", &self.dark_sidebar_bg),
            ("dark-workspace-bg", &self.dark_workspace_bg),
            ("dark-card-bg", &self.dark_card_bg),
            ("dark-text-primary", &self.dark_text_primary),
            ("dark-text-secondary", &self.dark_text_secondary),
            ("dark-text-muted", &self.dark_text_muted),
            ("border", &self.border),
            ("border-hover", &self.border_hover),
            ("dark-border", &self.dark_border),
            ("dark-border-hover", &self.dark_border_hover),
            ("success", &self.success),
            ("error", &self.error),
            ("warning", &self.warning),
            ("info", &self.info),
        ]
    }
}

/// Font stacks and scales.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Typography {
    pub font_family: String,
    pub font_family_sidebar: String,
    pub size_xs: String,
    pub size_sm: String,
    pub size_base: String,
    pub size_lg: String,
    pub size_xl: String,
    pub size_2xl: String,
    pub weight_normal: String,
    pub weight_medium: String,
    pub weight_semibold: String,
    pub weight_bold: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "\"Anthropic Serif Web\", -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif".to_owned(),
            font_family_sidebar: "\"Anthropic Sans Web\", -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif".to_owned(),
            size_xs: "0.75rem".to_owned(),
            size_sm: "0.875rem".to_owned(),
            size_base: "1rem".to_owned(),
            size_lg: "1.125rem".to_owned(),
            size_xl: "1.25rem".to_owned(),
            size_2xl: "1.5rem".to_owned(),
            weight_normal: "400".to_owned(),
            weight_medium: "500".to_owned(),
            weight_semibold: "600".to_owned(),
            weight_bold: "700".to_owned(),
        }
    }
}

/// Spacing steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SpacingScale {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
    pub xxl: String,
}

impl Default for SpacingScale {
    fn default() -> Self {
        Self {
            xs: "0.25rem".to_owned(),
            sm: "0.5rem".to_owned(),
            md: "1rem".to_owned(),
            lg: "1.5rem".to_owned(),
            xl: "2rem".to_owned(),
            xxl: "3rem".to_owned(),
        }
    }
}

/// Corner radii.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RadiusScale {
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
    pub xxl: String,
}

impl Default for RadiusScale {
    fn default() -> Self {
        Self {
            sm: "0.375rem".to_owned(),
            md: "0.5rem".to_owned(),
            lg: "0.75rem".to_owned(),
            xl: "1rem".to_owned(),
            xxl: "1.5rem".to_owned(),
        }
    }
}

/// Box-shadow presets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ShadowScale {
    pub sm: String,
    pub md: String,
    pub lg: String,
}

impl Default for ShadowScale {
    fn default() -> Self {
        Self {
            sm: "0 1px 2px 0 rgba(0, 0, 0, 0.05)".to_owned(),
            md: "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)".to_owned(),
            lg: "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)"
                .to_owned(),
        }
    }
}

/// The immutable record of every design token the stylesheet and the patch
/// rules may reference. No token is computed after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThemeConfig {
    pub colors: ColorTokens,
    pub typography: Typography,
    pub spacing: SpacingScale,
    pub radius: RadiusScale,
    pub shadows: ShadowScale,
}

impl ThemeConfig {
    /// Decode a theme shipped as JSON; missing fields fall back to the
    /// built-in palette.
    ///
    /// # Errors
    /// [`ThemeError::InvalidJson`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check that every color token parses as a CSS color.
    ///
    /// # Errors
    /// [`ThemeError::InvalidColor`] naming the first offending token.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (name, value) in self.colors.named() {
            if csscolorparser::parse(value).is_err() {
                return Err(ThemeError::InvalidColor {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// The `:root` custom-property environment: every token under the
    /// [`TOKEN_PREFIX`] namespace. Sorted by construction, so generation is
    /// deterministic.
    pub fn custom_properties(&self) -> CustomProperties {
        let mut env = CustomProperties::new();
        for (name, value) in self.colors.named() {
            env.insert(token_name(name), value.to_owned());
        }
        for (name, value) in [
            ("font-family", self.typography.font_family.as_str()),
            (
                "font-family-sidebar",
                self.typography.font_family_sidebar.as_str(),
            ),
            ("font-weight-medium", self.typography.weight_medium.as_str()),
            (
                "font-weight-semibold",
                self.typography.weight_semibold.as_str(),
            ),
            ("space-xs", self.spacing.xs.as_str()),
            ("space-sm", self.spacing.sm.as_str()),
            ("space-md", self.spacing.md.as_str()),
            ("space-lg", self.spacing.lg.as_str()),
            ("radius-sm", self.radius.sm.as_str()),
            ("radius-md", self.radius.md.as_str()),
            ("radius-lg", self.radius.lg.as_str()),
            ("radius-xl", self.radius.xl.as_str()),
            ("shadow-sm", self.shadows.sm.as_str()),
            ("shadow-md", self.shadows.md.as_str()),
            ("shadow-lg", self.shadows.lg.as_str()),
        ] {
            env.insert(token_name(name), value.to_owned());
        }
        env
    }

    /// The tokens redefined inside the `.dark` scope: each light-mode
    /// surface/text/border token remapped to its dark variant.
    pub fn dark_overrides(&self) -> CustomProperties {
        let colors = &self.colors;
        let mut env = CustomProperties::new();
        for (name, value) in [
            ("main-bg", colors.dark_main_bg.as_str()),
            ("sidebar-bg", colors.dark_sidebar_bg.as_str()),
            ("workspace-bg", colors.dark_workspace_bg.as_str()),
            ("card-bg", colors.dark_card_bg.as_str()),
            ("text-primary", colors.dark_text_primary.as_str()),
            ("text-secondary", colors.dark_text_secondary.as_str()),
            ("text-muted", colors.dark_text_muted.as_str()),
            ("border", colors.dark_border.as_str()),
            ("border-hover", colors.dark_border_hover.as_str()),
        ] {
            env.insert(token_name(name), value.to_owned());
        }
        env
    }
}

/// `name` → `--lacquer-name`.
pub(crate) fn token_name(name: &str) -> String {
    let mut out = String::with_capacity(TOKEN_PREFIX.len().saturating_add(name.len()).saturating_add(1));
    out.push_str(TOKEN_PREFIX);
    out.push('-');
    out.push_str(name);
    out
}
