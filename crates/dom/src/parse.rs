//! HTML parsing via html5ever's reference DOM.

use crate::{Document, DomError, NodeId, ReadyState};
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

impl Document {
    /// Parse a complete page. The returned document is already `Complete`
    /// (html5ever normalizes the html/head/body skeleton for us).
    ///
    /// # Errors
    /// [`DomError::Parse`] if the markup cannot be read.
    pub fn parse_html(html: &str) -> Result<Self, DomError> {
        let rc_dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        let mut doc = Self::blank(ReadyState::Complete);
        let root = doc.root();
        convert_children(&mut doc, &rc_dom.document, root);
        Ok(doc)
    }
}

/// Copy `handle`'s children into `doc` under `parent`, depth first.
fn convert_children(doc: &mut Document, handle: &Handle, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            RcNodeData::Document => convert_children(doc, child, parent),
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                // Whitespace-only runs are layout noise the engine never reads.
                if !text.trim().is_empty() {
                    doc.quiet_text(parent, &text);
                }
            }
            RcNodeData::Comment { contents } => {
                doc.quiet_comment(parent, contents);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let node = doc.quiet_element(parent, &name.local);
                for attr in attrs.borrow().iter() {
                    doc.set_attr_quiet(node, &attr.name.local, &attr.value);
                }
                convert_children(doc, child, node);
            }
        }
    }
}
