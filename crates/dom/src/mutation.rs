//! Mutation notification stream.
//!
//! Mutating document operations publish small record batches over a
//! broadcast channel. Subscribers attach a filter so high-churn attributes
//! they do not care about (inline `style` rewrites above all) never wake
//! them.

use crate::NodeId;
use tokio::sync::broadcast;

/// One observed change to the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// A child was inserted under (or removed from) `parent`.
    ChildListChanged { parent: NodeId },
    /// An attribute of `node` changed.
    AttributeChanged { node: NodeId, name: String },
    /// `node` (and its subtree) left the document.
    NodeRemoved { node: NodeId },
    /// The document finished loading.
    DocumentReady,
}

/// Which records a subscriber wants delivered.
#[derive(Clone, Debug)]
pub struct MutationFilter {
    /// Deliver child-list and removal records.
    pub child_list: bool,
    /// Attribute names to deliver; empty means no attribute records.
    pub attributes: Vec<String>,
}

impl MutationFilter {
    /// Child-list records plus the given attribute names.
    pub fn child_list_and_attributes<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            child_list: true,
            attributes: names.into_iter().map(Into::into).collect(),
        }
    }

    fn admits(&self, record: &Mutation) -> bool {
        match record {
            Mutation::ChildListChanged { .. } | Mutation::NodeRemoved { .. } => self.child_list,
            Mutation::AttributeChanged { name, .. } => {
                self.attributes.iter().any(|wanted| wanted == name)
            }
            Mutation::DocumentReady => true,
        }
    }
}

/// A filtered subscription to the document's mutation batches.
#[derive(Debug)]
pub struct MutationStream {
    receiver: broadcast::Receiver<Vec<Mutation>>,
    filter: MutationFilter,
}

impl MutationStream {
    pub(crate) fn new(receiver: broadcast::Receiver<Vec<Mutation>>, filter: MutationFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next non-empty filtered batch, or `None` once the document is gone.
    ///
    /// A lagged subscriber skips the overwritten batches and keeps going;
    /// the reconciler rescans the whole tree anyway, so lost records only
    /// cost it an earlier wakeup, never correctness.
    pub async fn recv(&mut self) -> Option<Vec<Mutation>> {
        loop {
            match self.receiver.recv().await {
                Ok(batch) => {
                    let kept: Vec<Mutation> = batch
                        .into_iter()
                        .filter(|record| self.filter.admits(record))
                        .collect();
                    if !kept.is_empty() {
                        return Some(kept);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::debug!(target: "lacquer_dom", "mutation stream lagged, skipped {skipped} batches");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
