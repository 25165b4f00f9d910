#![cfg(test)]

use core::error::Error;
use lacquer_dom::{Document, DomError, Mutation, MutationFilter, ReadyState};
use lacquer_selectors::parse_list;

const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Chat</title></head>
<body>
  <div data-element-id="side-bar-background" class="sidebar">
    <button data-element-id="new-chat-button-in-side-bar" class="bg-blue-600">New chat</button>
    <div data-element-id="custom-chat-item" class="chat-item">Greetings</div>
  </div>
  <main data-element-id="chat-container">
    <div data-element-id="user-message" class="bg-blue-600 rounded-lg">hi</div>
    <div data-element-id="message-assistant" class="prose">hello</div>
    <button data-element-id="send-button" class="bg-blue-600 rounded-md">Send</button>
  </main>
</body>
</html>"#;

fn observer_filter() -> MutationFilter {
    MutationFilter::child_list_and_attributes(["class", "data-element-id"])
}

fn find_one(doc: &Document, selector: &str) -> Result<lacquer_dom::NodeId, Box<dyn Error>> {
    let matches = doc.query_selector_all(&parse_list(selector)?);
    match matches.as_slice() {
        [only] => Ok(*only),
        other => Err(format!("expected one match for {selector}, got {}", other.len()).into()),
    }
}

#[test]
fn parse_builds_a_queryable_tree() -> Result<(), Box<dyn Error>> {
    let doc = Document::parse_html(CHAT_PAGE)?;
    if doc.ready_state() != ReadyState::Complete {
        return Err("parsed documents must be complete".into());
    }
    if doc.head().is_none() || doc.body().is_none() {
        return Err("head and body must exist".into());
    }
    let send = doc.query_selector_all(&parse_list("[data-element-id=\"send-button\"]")?);
    if send.len() != 1 {
        return Err(format!("expected one send button, found {}", send.len()).into());
    }
    let blue = doc.query_selector_all(&parse_list("[class*=\"bg-blue-600\"]")?);
    if blue.len() != 3 {
        return Err(format!("expected three bg-blue-600 elements, found {}", blue.len()).into());
    }
    let nested = doc.query_selector_all(&parse_list(".sidebar > .chat-item")?);
    if nested.len() != 1 {
        return Err("child combinator query failed".into());
    }
    Ok(())
}

#[test]
fn inline_property_overwrites_and_serializes() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    let send = find_one(&doc, "[data-element-id=\"send-button\"]")?;

    doc.set_inline_property(send, "background-color", "#2563eb")?;
    doc.set_inline_property(send, "background-color", "#d97449")?;
    doc.set_inline_property(send, "color", "white")?;

    if doc.inline_property(send, "background-color") != Some("#d97449") {
        return Err("second write must win".into());
    }
    if doc.attribute(send, "style") != Some("background-color: #d97449; color: white") {
        return Err(format!("unexpected style attr: {:?}", doc.attribute(send, "style")).into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn mutation_stream_honors_the_filter() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    let body = doc.body().ok_or("no body")?;
    let send = find_one(&doc, "[data-element-id=\"send-button\"]")?;

    let mut stream = doc.observe(observer_filter())?;

    // Filtered out: style rewrites and unrelated attributes.
    doc.set_inline_property(send, "color", "white")?;
    doc.set_attribute(send, "title", "send the message")?;
    // Delivered: a class flip, then an insertion.
    doc.set_attribute(send, "class", "bg-blue-600 loading")?;
    let bubble = doc.create_element(body, "div")?;
    doc.set_attribute(bubble, "class", "chat-item")?;

    let first = stream.recv().await.ok_or("stream closed early")?;
    match first.as_slice() {
        [Mutation::AttributeChanged { node, name }] if *node == send && name == "class" => {}
        other => return Err(format!("expected the class change first, got {other:?}").into()),
    }
    let second = stream.recv().await.ok_or("stream closed early")?;
    match second.as_slice() {
        [Mutation::ChildListChanged { parent }] if *parent == body => {}
        other => return Err(format!("expected the insertion next, got {other:?}").into()),
    }
    Ok(())
}

#[test]
fn removal_detaches_the_subtree_and_goes_stale() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    let item = find_one(&doc, "[data-element-id=\"custom-chat-item\"]")?;
    doc.remove_node(item)?;
    if doc.contains(item) {
        return Err("removed node still present".into());
    }
    match doc.set_inline_property(item, "color", "red") {
        Err(DomError::Stale(_)) => {}
        other => return Err(format!("expected a stale error, got {other:?}").into()),
    }
    if !doc
        .query_selector_all(&parse_list("[data-element-id=\"custom-chat-item\"]")?)
        .is_empty()
    {
        return Err("removed element still queryable".into());
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn readiness_is_observable() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::new();
    if doc.ready_state() != ReadyState::Loading {
        return Err("fresh documents start loading".into());
    }
    let mut stream = doc.observe(observer_filter())?;
    doc.finish_load();
    let batch = stream.recv().await.ok_or("stream closed early")?;
    if batch != vec![Mutation::DocumentReady] {
        return Err(format!("expected DocumentReady, got {batch:?}").into());
    }
    // A second finish_load is a no-op.
    doc.finish_load();
    if doc.ready_state() != ReadyState::Complete {
        return Err("document must stay complete".into());
    }
    Ok(())
}

#[test]
fn observation_lifecycle_and_restricted_hosts() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    if doc.observer_count() != 0 {
        return Err("no observers expected before subscribe".into());
    }
    let stream = doc.observe(observer_filter())?;
    if doc.observer_count() != 1 {
        return Err("one observer expected".into());
    }
    drop(stream);
    if doc.observer_count() != 0 {
        return Err("observer count must drop to zero".into());
    }
    doc.disable_observation();
    match doc.observe(observer_filter()) {
        Err(DomError::ObservationUnavailable) => Ok(()),
        other => Err(format!("expected ObservationUnavailable, got {other:?}").into()),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn viewport_changes_reach_watchers() -> Result<(), Box<dyn Error>> {
    let mut doc = Document::parse_html(CHAT_PAGE)?;
    let mut watcher = doc.watch_viewport();
    doc.set_viewport(1280, 800);
    watcher.changed().await?;
    let seen = *watcher.borrow_and_update();
    if (seen.width, seen.height) != (1280, 800) {
        return Err(format!("unexpected viewport {seen:?}").into());
    }
    Ok(())
}
