//! Demo: theme a chat page fixture, stream simulated messages into it, and
//! show the reconciler keeping the overrides converged.
//!
//! Run with `RUST_LOG=debug` for per-pass detail.

use anyhow::{Context as _, Result};
use core::time::Duration;
use lacquer_dom::Document;
use lacquer_engine::{SharedDocument, ThemeEngine};
use lacquer_selectors::parse_list;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;

const FIXTURE: &str = r#"<!DOCTYPE html>
<html>
<head><title>TypingMind</title></head>
<body>
  <div data-element-id="side-bar-background" class="sidebar bg-gray-800">
    <button data-element-id="new-chat-button-in-side-bar" class="bg-blue-600">New chat</button>
    <div data-element-id="custom-chat-item" class="chat-item text-white">Rust questions</div>
  </div>
  <main data-element-id="chat-container">
    <div data-element-id="user-message" class="rounded-lg">How do I debounce?</div>
    <div data-element-id="message-assistant" class="prose">Re-arm a single deadline.</div>
    <button data-element-id="send-button" class="bg-blue-600 rounded-md">Send</button>
  </main>
</body>
</html>"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let doc: SharedDocument = Arc::new(Mutex::new(
        Document::parse_html(FIXTURE).context("parsing the demo fixture")?,
    ));
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await.context("starting the theme engine")?;
    report(&doc, "after start").await?;

    // Stream a conversation: bursts of message insertions with class churn,
    // the pattern that defeats a static stylesheet.
    for round in 0..3u32 {
        {
            let mut page = doc.lock().await;
            let container = page
                .query_selector_all(&parse_list("[data-element-id=\"chat-container\"]")?)
                .first()
                .copied()
                .context("chat container missing")?;
            for index in 0..10u32 {
                let bubble = page.create_element(container, "div")?;
                page.set_attribute(bubble, "data-element-id", "message-assistant")?;
                page.set_attribute(bubble, "class", "bg-gray-800 text-white")?;
                page.create_text(bubble, &format!("streamed token {round}.{index}"))?;
            }
        }
        sleep(Duration::from_millis(150)).await;
    }
    report(&doc, "after streaming").await?;

    {
        let mut page = doc.lock().await;
        page.set_viewport(1280, 800);
    }
    sleep(Duration::from_millis(300)).await;

    let stats = engine.stats();
    log::info!(
        "done: {} passes, {} patches, {} reinstalls, {} faults",
        stats.passes,
        stats.patched,
        stats.reinstalls,
        stats.faults
    );
    engine.stop().await.context("stopping the theme engine")?;
    report(&doc, "after stop").await?;
    Ok(())
}

/// Log the observable theming state: stylesheet presence and a sample of
/// patched inline styles.
async fn report(doc: &SharedDocument, label: &str) -> Result<()> {
    let page = doc.lock().await;
    let installed = lacquer_engine::is_installed(&page);
    let mut patched = 0usize;
    for node in page.elements() {
        if page
            .element(node)
            .and_then(|element| element.attr("style"))
            .is_some()
        {
            patched = patched.saturating_add(1);
        }
    }
    log::info!("{label}: stylesheet installed = {installed}, elements with inline patches = {patched}");
    Ok(())
}
