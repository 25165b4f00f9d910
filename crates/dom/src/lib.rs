//! Host-page document model.
//!
//! The engine treats the page it restyles as an opaque tree it can observe
//! and patch. This crate is that tree: HashMap-backed node storage, HTML
//! parsing via html5ever, attribute/class/inline-style access, selector
//! queries, and the two notification streams the engine subscribes to
//! (mutation batches and viewport changes).
//!
//! Writes performed through this API are confined to node insertion/removal,
//! attributes, and inline `style` properties; the engine itself only ever
//! touches one reserved style node and the `style` attributes of patched
//! elements.

#![forbid(unsafe_code)]

mod document;
mod mutation;
mod parse;

pub use document::{Document, ElementData, NodeData, NodeId, ReadyState, Viewport};
pub use mutation::{Mutation, MutationFilter, MutationStream};

use thiserror::Error;

/// Faults raised by document access.
#[derive(Debug, Error)]
pub enum DomError {
    /// The node was removed from the document between lookup and use.
    #[error("node {0:?} is no longer in the document")]
    Stale(NodeId),
    /// The operation requires an element node.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// The host environment does not allow mutation observation.
    #[error("mutation observation is unavailable in this document")]
    ObservationUnavailable,
    /// The markup could not be read.
    #[error("failed to parse markup: {0}")]
    Parse(#[from] std::io::Error),
}
