//! Presentation for topograph layers: adjacency listings, container colors,
//! and DOT / Mermaid / ECharts HTML export.

pub mod colors;
pub mod echarts;
pub mod export;
pub mod listing;

use topo_core::graph::{Graph, NodeId, NodeRef};

/// Chart label for a node: `"<id> <name>"`.
pub fn node_label(id: NodeId, name: &str) -> String {
    format!("{} {}", id, name)
}

/// Label for a handle resolved in `graph`, or `None` if it belongs elsewhere.
pub(crate) fn ref_label(graph: &Graph, node: NodeRef) -> Option<String> {
    graph.resolve(node).map(|n| node_label(n.id(), n.name()))
}
