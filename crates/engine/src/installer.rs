//! Stylesheet installation.

use anyhow::{Context as _, Result};
use lacquer_dom::{Document, NodeId};

/// Reserved id of the one `<style>` node the engine owns.
pub const STYLESHEET_ID: &str = "lacquer-theme";

/// True if the reserved style node is present.
pub fn is_installed(doc: &Document) -> bool {
    doc.element_by_id(STYLESHEET_ID).is_some()
}

/// Install `css` as the reserved style node, replacing any prior instance.
///
/// Postcondition: exactly one node with [`STYLESHEET_ID`] exists, in
/// `<head>`, containing `css` verbatim. Installing the same text again
/// changes nothing observable beyond node identity.
///
/// # Errors
/// Fails if the document has no `<head>`, or if a node write fails.
pub fn install(doc: &mut Document, css: &str) -> Result<NodeId> {
    while let Some(existing) = doc.element_by_id(STYLESHEET_ID) {
        doc.remove_node(existing)
            .context("removing prior theme stylesheet")?;
    }
    let head = doc
        .head()
        .context("document has no <head> to install into")?;
    let style = doc
        .create_element(head, "style")
        .context("creating theme style node")?;
    doc.set_attribute(style, "id", STYLESHEET_ID)
        .context("naming theme style node")?;
    doc.create_text(style, css)
        .context("writing theme stylesheet text")?;
    log::debug!(target: "lacquer_engine", "installed stylesheet ({} bytes)", css.len());
    Ok(style)
}

/// Remove the reserved style node if present. Idempotent.
///
/// # Errors
/// Fails only if the node exists but cannot be removed.
pub fn uninstall(doc: &mut Document) -> Result<()> {
    while let Some(existing) = doc.element_by_id(STYLESHEET_ID) {
        doc.remove_node(existing)
            .context("removing theme stylesheet")?;
    }
    Ok(())
}
