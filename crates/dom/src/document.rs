//! Document tree storage and access.

use crate::{DomError, Mutation, MutationFilter, MutationStream};
use lacquer_selectors::{ElementAdapter, SelectorList, matches_list};
use lacquer_style::InlineStyle;
use smallvec::SmallVec;
use std::collections::HashMap;
use tokio::sync::{broadcast, watch};

/// Per-document node handle. Never reused within one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Document load state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

/// Current window geometry, published over the viewport watch channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Payload stored per node.
#[derive(Clone, Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Data for an element node. Attribute names are ASCII-lowercased; the class
/// token list and parsed inline style are kept in step with their attributes.
#[derive(Clone, Debug)]
pub struct ElementData {
    tag: String,
    attributes: SmallVec<[(String, String); 8]>,
    classes: Vec<String>,
    inline: InlineStyle,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: SmallVec::new(),
            classes: Vec::new(),
            inline: InlineStyle::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.attributes
            .iter()
            .find(|(attr_name, _)| *attr_name == wanted)
            .map(|(_, value)| value.as_str())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.classes.iter().any(|class| class == token)
    }

    pub fn inline(&self) -> &InlineStyle {
        &self.inline
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        let normalized = name.to_ascii_lowercase();
        if normalized == "class" {
            self.classes = value.split_ascii_whitespace().map(str::to_owned).collect();
        } else if normalized == "style" {
            self.inline = InlineStyle::parse(value);
        }
        self.store_attr(normalized, value.to_owned());
    }

    /// Write the raw attribute entry without touching the caches.
    fn store_attr(&mut self, name: String, value: String) {
        if let Some(slot) = self
            .attributes
            .iter_mut()
            .find(|(attr_name, _)| *attr_name == name)
        {
            slot.1 = value;
            return;
        }
        self.attributes.push((name, value));
    }
}

/// The host page: a mutable tree plus the notification channels the engine
/// observes. All mutation goes through methods that publish records, so a
/// subscriber sees every change that matters to it.
#[derive(Debug)]
pub struct Document {
    nodes: HashMap<NodeId, NodeData>,
    parents: HashMap<NodeId, NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
    root: NodeId,
    next_id: u64,
    ready: ReadyState,
    observation_enabled: bool,
    mutations: broadcast::Sender<Vec<Mutation>>,
    viewport: watch::Sender<Viewport>,
}

impl Document {
    /// Mutation batches buffered per subscriber before lagging kicks in.
    const CHANNEL_CAPACITY: usize = 256;

    /// An empty page in the `Loading` state, with the usual
    /// html/head/body skeleton already in place.
    pub fn new() -> Self {
        let mut doc = Self::blank(ReadyState::Loading);
        let html = doc.quiet_element(doc.root, "html");
        doc.quiet_element(html, "head");
        doc.quiet_element(html, "body");
        doc
    }

    pub(crate) fn blank(ready: ReadyState) -> Self {
        let (mutations, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        let (viewport, _) = watch::channel(Viewport::default());
        let mut nodes = HashMap::new();
        let root = NodeId(0);
        nodes.insert(root, NodeData::Document);
        Self {
            nodes,
            parents: HashMap::new(),
            children: HashMap::new(),
            root,
            next_id: 1,
            ready,
            observation_enabled: true,
            mutations,
            viewport,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready
    }

    /// Flip a `Loading` document to `Complete` and notify observers.
    pub fn finish_load(&mut self) {
        if self.ready == ReadyState::Complete {
            return;
        }
        self.ready = ReadyState::Complete;
        self.emit(vec![Mutation::DocumentReady]);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn node_data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(&node)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(&node) {
            Some(NodeData::Element(data)) => Some(data),
            _ => None,
        }
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map_or(&[], Vec::as_slice)
    }

    /// The `<head>` element, if the skeleton has one.
    pub fn head(&self) -> Option<NodeId> {
        self.find_element_by_tag("head")
    }

    /// The `<body>` element, if the skeleton has one.
    pub fn body(&self) -> Option<NodeId> {
        self.find_element_by_tag("body")
    }

    fn find_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&node| self.element(node).is_some_and(|data| data.tag() == tag))
    }

    /// Append a new element under `parent`.
    ///
    /// # Errors
    /// [`DomError::Stale`] if `parent` is gone; [`DomError::NotAnElement`]
    /// if `parent` is a text or comment node.
    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        self.check_container(parent)?;
        let node = self.insert_node(NodeData::Element(ElementData::new(tag)), parent);
        if self.is_in_body(parent) {
            self.emit(vec![Mutation::ChildListChanged { parent }]);
        }
        Ok(node)
    }

    /// Append a new text node under `parent`.
    ///
    /// # Errors
    /// Same conditions as [`Self::create_element`].
    pub fn create_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.check_container(parent)?;
        let node = self.insert_node(NodeData::Text(text.to_owned()), parent);
        if self.is_in_body(parent) {
            self.emit(vec![Mutation::ChildListChanged { parent }]);
        }
        Ok(node)
    }

    /// Set an attribute on an element.
    ///
    /// # Errors
    /// [`DomError::Stale`] if the node is gone; [`DomError::NotAnElement`]
    /// for non-element nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let data = self.element_mut(node)?;
        data.set_attr(name, value);
        if self.is_in_body(node) {
            self.emit(vec![Mutation::AttributeChanged {
                node,
                name: name.to_ascii_lowercase(),
            }]);
        }
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|data| data.attr(name))
    }

    /// Detach `node` and its whole subtree.
    ///
    /// # Errors
    /// [`DomError::Stale`] if the node is already gone. The root cannot be
    /// removed and reports [`DomError::NotAnElement`].
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::NotAnElement(node));
        }
        if !self.nodes.contains_key(&node) {
            return Err(DomError::Stale(node));
        }
        // Scope has to be judged before the subtree is gone.
        let scoped = self.is_in_body(node);
        let parent = self.parents.remove(&node);
        if let Some(parent_id) = parent
            && let Some(siblings) = self.children.get_mut(&parent_id)
        {
            siblings.retain(|&child| child != node);
        }
        self.drop_subtree(node);
        if scoped {
            let mut records = vec![Mutation::NodeRemoved { node }];
            if let Some(parent_id) = parent {
                records.push(Mutation::ChildListChanged { parent: parent_id });
            }
            self.emit(records);
        }
        Ok(())
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.remove(&current) {
                for child in &kids {
                    self.parents.remove(child);
                }
                stack.extend(kids);
            }
            self.nodes.remove(&current);
        }
    }

    /// Overwrite one inline style property, never reading the prior value.
    /// The serialized declaration list is written back to the `style`
    /// attribute.
    ///
    /// # Errors
    /// [`DomError::Stale`] / [`DomError::NotAnElement`] as for
    /// [`Self::set_attribute`].
    pub fn set_inline_property(
        &mut self,
        node: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let data = self.element_mut(node)?;
        data.inline.set(property, value);
        let serialized = data.inline.serialize();
        data.store_attr("style".to_owned(), serialized);
        if self.is_in_body(node) {
            self.emit(vec![Mutation::AttributeChanged {
                node,
                name: "style".to_owned(),
            }]);
        }
        Ok(())
    }

    pub fn inline_property(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|data| data.inline.get(property))
    }

    /// Every element in document order (preorder).
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if matches!(self.nodes.get(&current), Some(NodeData::Element(_))) {
                out.push(current);
            }
            for &child in self.children_of(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// All elements matching the selector list, in document order.
    pub fn query_selector_all(&self, list: &SelectorList) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&node| matches_list(self, node, list))
            .collect()
    }

    /// First element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    /// Concatenated text of the node's subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(NodeData::Text(text)) = self.nodes.get(&current) {
                out.push_str(text);
            }
            for &child in self.children_of(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Subscribe to filtered mutation batches.
    ///
    /// # Errors
    /// [`DomError::ObservationUnavailable`] when the host environment has
    /// observation disabled.
    pub fn observe(&self, filter: MutationFilter) -> Result<MutationStream, DomError> {
        if !self.observation_enabled {
            return Err(DomError::ObservationUnavailable);
        }
        Ok(MutationStream::new(self.mutations.subscribe(), filter))
    }

    /// Live mutation subscribers. Zero after a clean engine teardown.
    pub fn observer_count(&self) -> usize {
        self.mutations.receiver_count()
    }

    /// Model a restricted host: `observe` fails from now on.
    pub fn disable_observation(&mut self) {
        self.observation_enabled = false;
    }

    /// Live viewport watchers. Zero after a clean engine teardown.
    pub fn viewport_watcher_count(&self) -> usize {
        self.viewport.receiver_count()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    /// Publish a new viewport size to watchers.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let next = Viewport { width, height };
        drop(self.viewport.send(next));
    }

    /// Subscribe to viewport changes.
    pub fn watch_viewport(&self) -> watch::Receiver<Viewport> {
        self.viewport.subscribe()
    }

    pub(crate) fn insert_node(&mut self, data: NodeData, parent: NodeId) -> NodeId {
        let node = NodeId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.nodes.insert(node, data);
        self.parents.insert(node, parent);
        self.children.entry(parent).or_default().push(node);
        node
    }

    pub(crate) fn quiet_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.insert_node(NodeData::Element(ElementData::new(tag)), parent)
    }

    pub(crate) fn quiet_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.insert_node(NodeData::Text(text.to_owned()), parent)
    }

    pub(crate) fn quiet_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.insert_node(NodeData::Comment(text.to_owned()), parent)
    }

    pub(crate) fn set_attr_quiet(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeData::Element(data)) = self.nodes.get_mut(&node) {
            data.set_attr(name, value);
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        match self.nodes.get_mut(&node) {
            None => Err(DomError::Stale(node)),
            Some(NodeData::Element(data)) => Ok(data),
            Some(_) => Err(DomError::NotAnElement(node)),
        }
    }

    fn check_container(&self, parent: NodeId) -> Result<(), DomError> {
        match self.nodes.get(&parent) {
            None => Err(DomError::Stale(parent)),
            Some(NodeData::Element(_) | NodeData::Document) => Ok(()),
            Some(_) => Err(DomError::NotAnElement(parent)),
        }
    }

    /// True if `node` is the body or inside it. Observation is scoped to
    /// the body subtree; head housekeeping (the theme stylesheet above all)
    /// never reaches observers.
    fn is_in_body(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.element(id).is_some_and(|data| data.tag() == "body") {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    fn emit(&self, records: Vec<Mutation>) {
        if !self.observation_enabled {
            return;
        }
        // No subscribers is the common case before start(); drop the error.
        drop(self.mutations.send(records));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementAdapter for Document {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(element)?;
        self.element(parent).map(|_| parent)
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(element)?;
        let siblings = self.children_of(parent);
        let position = siblings.iter().position(|&child| child == element)?;
        siblings
            .get(..position)?
            .iter()
            .rev()
            .copied()
            .find(|&node| self.element(node).is_some())
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.element(element).map_or("", ElementData::tag)
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.attribute(element, "id")
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.element(element).is_some_and(|data| data.has_class(class))
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.attribute(element, name)
    }
}
