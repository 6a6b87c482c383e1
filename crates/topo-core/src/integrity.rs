//! Integrity checks over a loaded topology.
//!
//! The graph API keeps edges mirrored and containment reciprocated, so any
//! issue reported here points at a handle that escaped its topology (e.g. a
//! container graph that was left out) or at a bug in the model itself.

use crate::graph::NodeId;
use crate::topology::{LayerGraph, Topology};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// An edge handle does not resolve in its own graph.
    DanglingEdge,
    /// `out_edges` and `in_edges` disagree on an edge's multiplicity.
    MissingMirror,
    /// A container or contained handle resolves in no layer of the topology.
    DanglingContainment,
    /// A containment link is not recorded on the other side.
    UnreciprocatedContainment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub graph: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.graph, self.message)
    }
}

/// Check every layer of `topology`. An empty result means the topology is sound.
pub fn check(topology: &Topology) -> Vec<Issue> {
    let mut issues = Vec::new();
    for layer in topology.layers() {
        check_edges(layer, &mut issues);
        check_containment(topology, layer, &mut issues);
    }
    issues
}

fn check_edges(layer: &LayerGraph, issues: &mut Vec<Issue>) {
    let graph = layer.graph();
    // (from, to) -> out-edge count minus in-edge count
    let mut balance: BTreeMap<(NodeId, NodeId), i64> = BTreeMap::new();

    for (id, node) in graph.iter() {
        for &target in node.out_edges() {
            match graph.find_node_id(target) {
                Some(to) => *balance.entry((id, to)).or_default() += 1,
                None => issues.push(issue(
                    layer,
                    IssueKind::DanglingEdge,
                    format!("node {} has an out-edge to an unknown node", id),
                )),
            }
        }
        for &source in node.in_edges() {
            match graph.find_node_id(source) {
                Some(from) => *balance.entry((from, id)).or_default() -= 1,
                None => issues.push(issue(
                    layer,
                    IssueKind::DanglingEdge,
                    format!("node {} has an in-edge from an unknown node", id),
                )),
            }
        }
    }

    for ((from, to), diff) in balance {
        if diff != 0 {
            issues.push(issue(
                layer,
                IssueKind::MissingMirror,
                format!("edge {} -> {} is unbalanced by {}", from, to, diff),
            ));
        }
    }
}

fn check_containment(topology: &Topology, layer: &LayerGraph, issues: &mut Vec<Issue>) {
    let graph = layer.graph();
    for (id, node) in graph.iter() {
        let Some(own_ref) = graph.node_ref(id) else {
            continue;
        };

        if let Some(container) = node.container() {
            match topology.resolve(container) {
                Some((_, c)) if c.contained().contains(&own_ref) => {}
                Some((container_layer, c)) => issues.push(issue(
                    layer,
                    IssueKind::UnreciprocatedContainment,
                    format!(
                        "node {} names {}:{} as container but is not listed in it",
                        id,
                        container_layer.name(),
                        c.id()
                    ),
                )),
                None => issues.push(issue(
                    layer,
                    IssueKind::DanglingContainment,
                    format!("node {} has a container outside the topology", id),
                )),
            }
        }

        for &member in node.contained() {
            match topology.resolve(member) {
                Some((_, m)) if m.container() == Some(own_ref) => {}
                Some((member_layer, m)) => issues.push(issue(
                    layer,
                    IssueKind::UnreciprocatedContainment,
                    format!(
                        "node {} lists {}:{} as contained but it names another container",
                        id,
                        member_layer.name(),
                        m.id()
                    ),
                )),
                None => issues.push(issue(
                    layer,
                    IssueKind::DanglingContainment,
                    format!("node {} contains a node outside the topology", id),
                )),
            }
        }
    }
}

fn issue(layer: &LayerGraph, kind: IssueKind, message: String) -> Issue {
    Issue {
        kind,
        graph: layer.name().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn layered() -> (Graph, Graph) {
        let mut outer = Graph::new();
        outer.add_node(1, "Platform").unwrap();
        let mut inner = Graph::new();
        inner.add_node(1, "Dynamics").unwrap();
        inner.add_node(2, "ADF").unwrap();
        inner.add_edge(1, 2).unwrap();
        inner.add_edge(1, 2).unwrap();
        inner.add_containment_edge_in(1, &mut outer, 1).unwrap();
        (outer, inner)
    }

    #[test]
    fn test_sound_topology_has_no_issues() {
        let (outer, inner) = layered();
        let topology = Topology::from_layers(vec![
            LayerGraph::new("outer", None, outer),
            LayerGraph::new("inner", None, inner),
        ]);
        assert!(check(&topology).is_empty());
    }

    #[test]
    fn test_missing_container_layer_is_reported() {
        let (_outer, inner) = layered();
        let topology = Topology::from_layers(vec![LayerGraph::new("inner", None, inner)]);
        let issues = check(&topology);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DanglingContainment);
        assert_eq!(issues[0].graph, "inner");
        assert!(issues[0].to_string().starts_with("[inner] node 1"));
    }

    #[test]
    fn test_missing_contained_layer_is_reported() {
        let (outer, _inner) = layered();
        let topology = Topology::from_layers(vec![LayerGraph::new("outer", None, outer)]);
        let issues = check(&topology);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DanglingContainment);
    }
}
