#![cfg(test)]

use core::error::Error;
use lacquer_theme::{SelectorTable, ThemeConfig, ThemeError, stylesheet};

#[test]
fn builtin_table_and_default_config_validate() -> Result<(), Box<dyn Error>> {
    ThemeConfig::default().validate()?;
    SelectorTable::builtin().validate()?;
    Ok(())
}

#[test]
fn generation_is_deterministic() -> Result<(), Box<dyn Error>> {
    let config = ThemeConfig::default();
    let table = SelectorTable::builtin();
    let first = stylesheet::generate(&config, table);
    let second = stylesheet::generate(&config, table);
    if first != second {
        return Err("same inputs must produce byte-identical output".into());
    }
    Ok(())
}

#[test]
fn root_scope_covers_every_color_token() -> Result<(), Box<dyn Error>> {
    let config = ThemeConfig::default();
    let sheet = stylesheet::generate(&config, SelectorTable::builtin());
    for token in [
        "primary",
        "primary-hover",
        "main-bg",
        "sidebar-bg",
        "workspace-bg",
        "card-bg",
        "text-primary",
        "text-secondary",
        "text-muted",
        "border",
        "border-hover",
        "shadow-sm",
        "radius-lg",
        "font-family",
    ] {
        if !stylesheet::declares_token(&sheet, token) {
            return Err(format!("token {token} missing from generated sheet").into());
        }
    }
    if !sheet.contains("--lacquer-primary: #d97449;") {
        return Err("primary token must carry the configured literal".into());
    }
    Ok(())
}

#[test]
fn dark_scope_redefines_surfaces_and_rules_stay_symbolic() -> Result<(), Box<dyn Error>> {
    let sheet = stylesheet::generate(&ThemeConfig::default(), SelectorTable::builtin());
    let dark_start = sheet.find(".dark {").ok_or("missing .dark scope")?;
    let dark_section = sheet.get(dark_start..).ok_or("bad slice")?;
    let dark_end = dark_section.find('}').ok_or("unterminated .dark scope")?;
    let dark_block = dark_section.get(..dark_end).ok_or("bad slice")?;
    if !dark_block.contains("--lacquer-sidebar-bg: #171717;") {
        return Err("dark scope must remap the sidebar surface".into());
    }
    if dark_block.contains("--lacquer-primary:") {
        return Err("tokens without dark variants must not be redefined".into());
    }
    // Past the two token scopes, rules may only reference tokens via var().
    let after_dark = sheet.get(dark_start.saturating_add(dark_end)..).ok_or("bad slice")?;
    if after_dark.contains('#') {
        return Err("rule blocks must not contain literal color values".into());
    }
    Ok(())
}

#[test]
fn every_table_entry_yields_a_block_with_important() -> Result<(), Box<dyn Error>> {
    let sheet = stylesheet::generate(&ThemeConfig::default(), SelectorTable::builtin());
    let table = SelectorTable::builtin();
    let send_selector = table
        .selector_for("send-button")
        .ok_or("send-button role missing")?;
    if !sheet.contains(send_selector) {
        return Err("send-button rule block missing".into());
    }
    if !sheet.contains("background-color: var(--lacquer-primary) !important;") {
        return Err("primary background override missing or not !important".into());
    }
    Ok(())
}

#[test]
fn malformed_configuration_is_rejected() -> Result<(), Box<dyn Error>> {
    let mut config = ThemeConfig::default();
    config.colors.primary = "not-a-color-at-all".to_owned();
    match config.validate() {
        Err(ThemeError::InvalidColor { name, .. }) if name == "primary" => {}
        other => return Err(format!("expected InvalidColor for primary, got {other:?}").into()),
    }

    let table = SelectorTable::new(vec![lacquer_theme::SelectorEntry {
        role: "broken".to_owned(),
        selector: "[class*=\"x\"".to_owned(),
    }]);
    match table.validate() {
        Err(ThemeError::InvalidSelector { role, .. }) if role == "broken" => Ok(()),
        other => Err(format!("expected InvalidSelector for broken, got {other:?}").into()),
    }
}

#[test]
fn theme_json_round_trip_with_partial_overrides() -> Result<(), Box<dyn Error>> {
    let config = ThemeConfig::default();
    let text = serde_json::to_string(&config)?;
    let decoded = ThemeConfig::from_json(&text)?;
    if decoded != config {
        return Err("round trip must preserve the config".into());
    }

    let partial = ThemeConfig::from_json(r##"{"colors": {"primary": "#336699"}}"##)?;
    if partial.colors.primary != "#336699" {
        return Err("explicit fields must override".into());
    }
    if partial.colors.sidebar_bg != config.colors.sidebar_bg {
        return Err("omitted fields must keep their defaults".into());
    }
    if ThemeConfig::from_json("{ nope").is_ok() {
        return Err("malformed JSON must be rejected".into());
    }
    Ok(())
}
