#![cfg(test)]

use core::error::Error;
use core::time::Duration;
use lacquer_dom::{Document, NodeId};
use lacquer_engine::{STYLESHEET_ID, SharedDocument, ThemeEngine, install, is_installed};
use lacquer_selectors::parse_list;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;

const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Chat</title></head>
<body>
  <div data-element-id="side-bar-background" class="sidebar">
    <div data-element-id="custom-chat-item" class="chat-item">Earlier chat</div>
  </div>
  <main data-element-id="chat-container">
    <div data-element-id="message-assistant" class="prose">hello</div>
    <button data-element-id="send-button" class="bg-blue-600 rounded-md">Send</button>
  </main>
</body>
</html>"#;

fn shared(html: &str) -> Result<SharedDocument, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(Document::parse_html(html)?)))
}

fn find_one(doc: &Document, selector: &str) -> Result<NodeId, Box<dyn Error>> {
    let found = doc.query_selector_all(&parse_list(selector)?);
    match found.as_slice() {
        [only] => Ok(*only),
        other => Err(format!("expected one match for {selector}, got {}", other.len()).into()),
    }
}

fn style_nodes(doc: &Document) -> Result<Vec<NodeId>, Box<dyn Error>> {
    let selector = format!("#{STYLESHEET_ID}");
    Ok(doc.query_selector_all(&parse_list(&selector)?))
}

#[test]
fn install_is_idempotent() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    let css = "body { background: var(--lacquer-main-bg) !important; }";
    install(&mut doc, css)?;
    install(&mut doc, css)?;

    let nodes = style_nodes(&doc)?;
    if nodes.len() != 1 {
        return Err(format!("expected exactly one style node, got {}", nodes.len()).into());
    }
    let style = nodes.first().copied().ok_or("missing style node")?;
    if doc.text_content(style) != css {
        return Err("style node must contain the css verbatim".into());
    }
    if doc.parent_of(style) != doc.head() {
        return Err("style node must live in <head>".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn start_installs_and_patches_the_send_button() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;

    let page = doc.lock().await;
    if !is_installed(&page) {
        return Err("stylesheet must be installed after start".into());
    }
    let send = find_one(&page, "[data-element-id=\"send-button\"]")?;
    if page.inline_property(send, "background-color") != Some("#d97449") {
        return Err(format!(
            "send button inline background is {:?}",
            page.inline_property(send, "background-color")
        )
        .into());
    }
    drop(page);
    if engine.stats().passes != 1 {
        return Err("start performs exactly the one eager pass".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn a_burst_of_fifty_insertions_coalesces_into_one_pass() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;
    let before = engine.stats().passes;

    {
        let mut page = doc.lock().await;
        let container = find_one(&page, "[data-element-id=\"chat-container\"]")?;
        for _ in 0..50 {
            let bubble = page.create_element(container, "div")?;
            page.set_attribute(bubble, "class", "chat-message bg-gray-800")?;
        }
    }
    sleep(Duration::from_millis(150)).await;

    let after = engine.stats().passes;
    if after != before + 1 {
        return Err(format!("expected one coalesced pass, got {}", after - before).into());
    }
    let page = doc.lock().await;
    let bubbles = page.query_selector_all(&parse_list(".bg-gray-800")?);
    if bubbles.len() != 50 {
        return Err(format!("expected 50 bubbles, got {}", bubbles.len()).into());
    }
    for bubble in bubbles {
        if page.inline_property(bubble, "background-color") != Some("#f7f5f3") {
            return Err("every streamed bubble must carry the sidebar surface".into());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn mutations_inside_the_window_keep_deferring_the_pass() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;
    let before = engine.stats().passes;

    for _ in 0..3 {
        {
            let mut page = doc.lock().await;
            let container = find_one(&page, "[data-element-id=\"chat-container\"]")?;
            let bubble = page.create_element(container, "div")?;
            page.set_attribute(bubble, "class", "bg-gray-800")?;
        }
        // Gaps shorter than the 100 ms window: each one re-arms the timer.
        sleep(Duration::from_millis(50)).await;
    }
    if engine.stats().passes != before {
        return Err("no pass may run while mutations keep arriving".into());
    }
    sleep(Duration::from_millis(200)).await;
    if engine.stats().passes != before + 1 {
        return Err("exactly one pass after the quiet period".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn resize_events_are_debounced_independently() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;
    let before = engine.stats().passes;

    {
        let mut page = doc.lock().await;
        page.set_viewport(800, 600);
    }
    sleep(Duration::from_millis(100)).await;
    {
        let mut page = doc.lock().await;
        page.set_viewport(1280, 800);
    }
    if engine.stats().passes != before {
        return Err("resize window is 250 ms; nothing may fire yet".into());
    }
    sleep(Duration::from_millis(400)).await;
    if engine.stats().passes != before + 1 {
        return Err("two resizes inside the window coalesce into one pass".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn lifecycle_is_symmetric() -> Result<(), Box<dyn Error>> {
    // Reference: one start on a fresh page.
    let reference = shared(CHAT_PAGE)?;
    let mut reference_engine = ThemeEngine::new(Arc::clone(&reference));
    reference_engine.start().await?;

    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;
    engine.stop().await?;
    {
        let page = doc.lock().await;
        if !style_nodes(&page)?.is_empty() {
            return Err("stop must remove the stylesheet".into());
        }
        if page.observer_count() != 0 || page.viewport_watcher_count() != 0 {
            return Err("stop must leave zero live listeners".into());
        }
    }
    engine.start().await?;
    {
        let page = doc.lock().await;
        let reference_page = reference.lock().await;
        let restarted = style_nodes(&page)?;
        if restarted.len() != 1 {
            return Err("restart must reinstall exactly one stylesheet".into());
        }
        let style = restarted.first().copied().ok_or("missing style node")?;
        let reference_style = style_nodes(&reference_page)?
            .first()
            .copied()
            .ok_or("missing reference style node")?;
        if page.text_content(style) != reference_page.text_content(reference_style) {
            return Err("restart and single start must install identical css".into());
        }
        let send = find_one(&page, "[data-element-id=\"send-button\"]")?;
        let reference_send = find_one(&reference_page, "[data-element-id=\"send-button\"]")?;
        if page.attribute(send, "style") != reference_page.attribute(reference_send, "style") {
            return Err("restart and single start must patch identically".into());
        }
    }
    engine.stop().await?;
    reference_engine.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn start_twice_is_a_no_op() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;
    let passes = engine.stats().passes;
    engine.start().await?;
    if engine.stats().passes != passes {
        return Err("second start must not run another eager pass".into());
    }
    let page = doc.lock().await;
    if style_nodes(&page)?.len() != 1 {
        return Err("second start must not duplicate the stylesheet".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn external_stylesheet_removal_heals_on_the_next_pass() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;

    {
        let mut page = doc.lock().await;
        let style = page
            .element_by_id(STYLESHEET_ID)
            .ok_or("stylesheet missing after start")?;
        page.remove_node(style)?;
        // A body mutation alongside the removal, as on an SPA navigation.
        let container = find_one(&page, "[data-element-id=\"chat-container\"]")?;
        let bubble = page.create_element(container, "div")?;
        page.set_attribute(bubble, "class", "bg-gray-800")?;
    }
    sleep(Duration::from_millis(150)).await;

    let page = doc.lock().await;
    if !is_installed(&page) {
        return Err("the pass must recreate the removed stylesheet".into());
    }
    drop(page);
    if engine.stats().reinstalls < 1 {
        return Err("the reinstall must be counted".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn restricted_hosts_degrade_to_the_eager_pass() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    {
        let mut page = doc.lock().await;
        page.disable_observation();
    }
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;

    {
        let page = doc.lock().await;
        if !is_installed(&page) {
            return Err("degraded mode still installs the stylesheet".into());
        }
        let send = find_one(&page, "[data-element-id=\"send-button\"]")?;
        if page.inline_property(send, "background-color") != Some("#d97449") {
            return Err("degraded mode still gets the eager pass".into());
        }
    }
    if engine.stats().passes != 1 {
        return Err("degraded mode runs exactly one pass".into());
    }

    {
        let mut page = doc.lock().await;
        let container = find_one(&page, "[data-element-id=\"chat-container\"]")?;
        let bubble = page.create_element(container, "div")?;
        page.set_attribute(bubble, "class", "bg-gray-800")?;
    }
    sleep(Duration::from_millis(300)).await;
    if engine.stats().passes != 1 {
        return Err("degraded mode never rescans".into());
    }

    engine.stop().await?;
    let page = doc.lock().await;
    if !style_nodes(&page)?.is_empty() {
        return Err("stop must still uninstall in degraded mode".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn start_on_a_loading_page_defers_to_readiness() -> Result<(), Box<dyn Error>> {
    let doc: SharedDocument = Arc::new(Mutex::new(Document::new()));
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    engine.start().await?;

    {
        let mut page = doc.lock().await;
        if is_installed(&page) {
            return Err("nothing may be installed while the page loads".into());
        }
        let body = page.body().ok_or("no body")?;
        let send = page.create_element(body, "button")?;
        page.set_attribute(send, "class", "bg-blue-600")?;
        page.finish_load();
    }
    sleep(Duration::from_millis(10)).await;

    let page = doc.lock().await;
    if !is_installed(&page) {
        return Err("readiness must trigger installation".into());
    }
    let send = find_one(&page, ".bg-blue-600")?;
    if page.inline_property(send, "background-color") != Some("#d97449") {
        return Err("the deferred eager pass must patch the page".into());
    }
    drop(page);
    engine.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn invalid_configuration_aborts_start() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let mut engine = ThemeEngine::new(Arc::clone(&doc));
    let mut broken = lacquer_theme::ThemeConfig::default();
    broken.colors.primary_hover = "##nope".to_owned();
    engine.set_theme(broken);

    if engine.start().await.is_ok() {
        return Err("a malformed color token must abort start".into());
    }
    let page = doc.lock().await;
    if !style_nodes(&page)?.is_empty() {
        return Err("an aborted start must leave no stylesheet behind".into());
    }
    if page.observer_count() != 0 {
        return Err("an aborted start must leave no listeners".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn manual_reconcile_is_available_for_debugging() -> Result<(), Box<dyn Error>> {
    let doc = shared(CHAT_PAGE)?;
    let engine = ThemeEngine::new(Arc::clone(&doc));
    // Never started: a manual pass still installs and patches.
    let outcome = engine.reconcile().await;
    if !outcome.reinstalled {
        return Err("manual pass must install the missing stylesheet".into());
    }
    let page = doc.lock().await;
    let send = find_one(&page, "[data-element-id=\"send-button\"]")?;
    if page.inline_property(send, "background-color") != Some("#d97449") {
        return Err("manual pass must patch matches".into());
    }
    Ok(())
}
