//! Errors raised by graph mutation.

use crate::graph::{GraphId, NodeId};

/// Errors from [`Graph`](crate::graph::Graph) mutations.
///
/// Every failing operation leaves both graphs involved untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {id} already exists in graph {graph}")]
    DuplicateNode { graph: GraphId, id: NodeId },
    #[error("node {id} not found in graph {graph}")]
    NodeNotFound { graph: GraphId, id: NodeId },
    #[error("node {id} in graph {graph} is held by a container in another graph")]
    AlreadyContained { graph: GraphId, id: NodeId },
}
