//! Graph data model: nodes keyed by caller-assigned ids, flow edges, and
//! containment links that may cross graph boundaries.

use crate::error::GraphError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Caller-assigned node identifier, unique within one graph.
pub type NodeId = i64;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Graph`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ownership-free handle to a node stored in some graph.
///
/// Two handles are equal iff they denote the same stored node. A handle
/// issued by one graph never resolves in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    graph: GraphId,
    slot: usize,
}

impl NodeRef {
    /// The graph that issued this handle.
    pub fn graph(&self) -> GraphId {
        self.graph
    }
}

/// A named vertex with its edge and containment links.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    out_edges: Vec<NodeRef>,
    in_edges: Vec<NodeRef>,
    container: Option<NodeRef>,
    contained: Vec<NodeRef>,
}

impl Node {
    fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            container: None,
            contained: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Edge targets, in the order the edges were added.
    pub fn out_edges(&self) -> &[NodeRef] {
        &self.out_edges
    }

    /// Edge sources, mirroring the sources' `out_edges`.
    pub fn in_edges(&self) -> &[NodeRef] {
        &self.in_edges
    }

    /// The node containing this one, possibly in another graph.
    pub fn container(&self) -> Option<NodeRef> {
        self.container
    }

    /// Nodes naming this node as their container.
    pub fn contained(&self) -> &[NodeRef] {
        &self.contained
    }

    /// Drop one occurrence of `member` from the contained list.
    fn release(&mut self, member: NodeRef) {
        if let Some(pos) = self.contained.iter().position(|&m| m == member) {
            self.contained.remove(pos);
        }
    }
}

/// An owning collection of nodes keyed by [`NodeId`].
///
/// Nodes live in an arena addressed by creation slot; `index` maps ids to
/// slots and keeps iteration in ascending id order. Not `Clone`: a copy would
/// share the [`GraphId`] and let foreign handles resolve.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    nodes: Vec<Node>,
    index: BTreeMap<NodeId, usize>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            nodes: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node under `id`. An existing id is never overwritten.
    pub fn add_node(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeRef, GraphError> {
        if self.index.contains_key(&id) {
            tracing::warn!(graph = %self.id, node = id, "node already exists");
            return Err(GraphError::DuplicateNode { graph: self.id, id });
        }
        let slot = self.nodes.len();
        self.nodes.push(Node::new(id, name.into()));
        self.index.insert(id, slot);
        tracing::debug!(graph = %self.id, node = id, "node added");
        Ok(self.handle(slot))
    }

    /// Add the flow edge `from -> to`. Both ids are checked before either
    /// node is touched; self-loops and repeated edges are kept.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        let from_slot = self.slot(from)?;
        let to_slot = self.slot(to)?;
        let from_ref = self.handle(from_slot);
        let to_ref = self.handle(to_slot);
        self.nodes[from_slot].out_edges.push(to_ref);
        self.nodes[to_slot].in_edges.push(from_ref);
        Ok(())
    }

    /// Place `contained` inside `container`, both in this graph.
    ///
    /// Repeating an existing link is a no-op. A node already held by another
    /// container of this graph is moved; one held by a container in a
    /// different graph fails with [`GraphError::AlreadyContained`]. A node may
    /// be its own container.
    pub fn add_containment_edge(
        &mut self,
        contained: NodeId,
        container: NodeId,
    ) -> Result<(), GraphError> {
        let contained_slot = self.slot(contained)?;
        let container_slot = self.slot(container)?;
        let contained_ref = self.handle(contained_slot);
        let container_ref = self.handle(container_slot);
        let current = self.nodes[contained_slot].container;
        match current {
            Some(existing) if existing == container_ref => return Ok(()),
            Some(existing) if existing.graph == self.id => {
                self.nodes[existing.slot].release(contained_ref);
                tracing::debug!(graph = %self.id, node = contained, "container replaced");
            }
            Some(_) => {
                return Err(GraphError::AlreadyContained {
                    graph: self.id,
                    id: contained,
                });
            }
            None => {}
        }
        self.nodes[contained_slot].container = Some(container_ref);
        self.nodes[container_slot].contained.push(contained_ref);
        Ok(())
    }

    /// Place `contained` (in this graph) inside `container` of `container_graph`.
    ///
    /// A previous container in either graph is replaced. A previous container
    /// in any third graph fails with [`GraphError::AlreadyContained`]. Neither
    /// graph takes ownership of the other's nodes.
    pub fn add_containment_edge_in(
        &mut self,
        contained: NodeId,
        container_graph: &mut Graph,
        container: NodeId,
    ) -> Result<(), GraphError> {
        let contained_slot = self.slot(contained)?;
        let container_slot = container_graph.slot(container)?;
        let contained_ref = self.handle(contained_slot);
        let container_ref = container_graph.handle(container_slot);
        let current = self.nodes[contained_slot].container;
        match current {
            Some(existing) if existing == container_ref => return Ok(()),
            Some(existing) if existing.graph == self.id => {
                self.nodes[existing.slot].release(contained_ref);
            }
            Some(existing) if existing.graph == container_graph.id => {
                container_graph.nodes[existing.slot].release(contained_ref);
                tracing::debug!(graph = %self.id, node = contained, "container replaced");
            }
            Some(_) => {
                return Err(GraphError::AlreadyContained {
                    graph: self.id,
                    id: contained,
                });
            }
            None => {}
        }
        self.nodes[contained_slot].container = Some(container_ref);
        container_graph.nodes[container_slot]
            .contained
            .push(contained_ref);
        Ok(())
    }

    /// Recover the id a handle was inserted under.
    ///
    /// Returns `None` for handles issued by any other graph.
    pub fn find_node_id(&self, node: NodeRef) -> Option<NodeId> {
        self.resolve(node).map(Node::id)
    }

    /// Resolve a handle issued by this graph.
    pub fn resolve(&self, node: NodeRef) -> Option<&Node> {
        if node.graph != self.id {
            return None;
        }
        self.nodes.get(node.slot)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef> {
        self.index.get(&id).map(|&slot| self.handle(slot))
    }

    /// All `(id, node)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.index
            .iter()
            .map(|(&id, &slot)| (id, &self.nodes[slot]))
    }

    /// Number of flow edges, counting repeats.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.out_edges.len()).sum()
    }

    /// Number of nodes placed inside some container.
    pub fn containment_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.container.is_some()).count()
    }

    fn slot(&self, id: NodeId) -> Result<usize, GraphError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound { graph: self.id, id })
    }

    fn handle(&self, slot: usize) -> NodeRef {
        NodeRef {
            graph: self.id,
            slot,
        }
    }
}

/// Look up the id of a possibly-absent handle in `graph`.
pub fn find_node_id(graph: &Graph, node: Option<NodeRef>) -> Option<NodeId> {
    node.and_then(|n| graph.find_node_id(n))
}
