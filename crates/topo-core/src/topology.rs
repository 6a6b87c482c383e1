//! Layered topologies: several named graphs linked by containment, loaded
//! from TOML through the [`Graph`] API.
//!
//! ```toml
//! [[graph]]
//! name = "workspaces"
//! nodes = [{ id = 1, name = "CMS" }, { id = 5, name = "Data platform" }]
//! edges = [[1, 5]]
//!
//! [[graph]]
//! name = "services"
//! contained_in = "workspaces"
//! nodes = [{ id = 1, name = "Dynamics" }]
//! containment = [[1, 1]]
//! ```

use crate::graph::{Graph, Node, NodeId, NodeRef};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Deserialized topology file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopologySpec {
    #[serde(default, rename = "graph")]
    pub graphs: Vec<LayerSpec>,
}

/// One `[[graph]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Graph holding the containers named in `containment`. Must appear
    /// earlier in the file. When absent, containers are looked up in this graph.
    #[serde(default)]
    pub contained_in: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// `[from, to]` pairs.
    #[serde(default)]
    pub edges: Vec<(NodeId, NodeId)>,
    /// `[contained, container]` pairs.
    #[serde(default)]
    pub containment: Vec<(NodeId, NodeId)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub id: NodeId,
    pub name: String,
}

/// A graph together with its display name and title.
#[derive(Debug)]
pub struct LayerGraph {
    name: String,
    title: Option<String>,
    graph: Graph,
}

impl LayerGraph {
    pub fn new(name: impl Into<String>, title: Option<String>, graph: Graph) -> Self {
        Self {
            name: name.into(),
            title,
            graph,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chart title, falling back to the layer name.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Recoverable problems met while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// `(graph name, node id)` of every skipped duplicate definition.
    pub duplicate_nodes: Vec<(String, NodeId)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_nodes.is_empty()
    }
}

/// An ordered set of layers.
#[derive(Debug, Default)]
pub struct Topology {
    layers: Vec<LayerGraph>,
}

impl Topology {
    /// Wrap already-built layers. Layer names are expected to be unique.
    pub fn from_layers(layers: Vec<LayerGraph>) -> Self {
        Self { layers }
    }

    /// Read and build a topology file.
    pub fn load(path: &Path) -> Result<(Self, LoadReport)> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read topology from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid topology in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<(Self, LoadReport)> {
        let spec: TopologySpec = toml::from_str(content).context("failed to parse topology TOML")?;
        Self::from_spec(spec)
    }

    /// Build every layer in file order.
    ///
    /// Duplicate node ids are skipped and reported; any other failure aborts
    /// the load with the offending graph and entry in the error context.
    pub fn from_spec(spec: TopologySpec) -> Result<(Self, LoadReport)> {
        let mut layers: Vec<LayerGraph> = Vec::with_capacity(spec.graphs.len());
        let mut report = LoadReport::default();

        for layer in spec.graphs {
            if layers.iter().any(|l| l.name == layer.name) {
                anyhow::bail!("duplicate graph name '{}'", layer.name);
            }

            let mut graph = Graph::new();
            for node in &layer.nodes {
                if let Err(err) = graph.add_node(node.id, node.name.as_str()) {
                    tracing::warn!(graph = %layer.name, "{}; keeping the first definition", err);
                    report.duplicate_nodes.push((layer.name.clone(), node.id));
                }
            }

            for &(from, to) in &layer.edges {
                graph
                    .add_edge(from, to)
                    .with_context(|| format!("graph '{}': edge {} -> {}", layer.name, from, to))?;
            }

            match &layer.contained_in {
                Some(parent) => {
                    let container_layer = layers
                        .iter_mut()
                        .find(|l| &l.name == parent)
                        .with_context(|| {
                            format!(
                                "graph '{}': contained_in '{}' must name an earlier graph",
                                layer.name, parent
                            )
                        })?;
                    for &(contained, container) in &layer.containment {
                        graph
                            .add_containment_edge_in(
                                contained,
                                &mut container_layer.graph,
                                container,
                            )
                            .with_context(|| {
                                format!(
                                    "graph '{}': containment {} in {}:{}",
                                    layer.name, contained, parent, container
                                )
                            })?;
                    }
                }
                None => {
                    for &(contained, container) in &layer.containment {
                        graph
                            .add_containment_edge(contained, container)
                            .with_context(|| {
                                format!(
                                    "graph '{}': containment {} in {}",
                                    layer.name, contained, container
                                )
                            })?;
                    }
                }
            }

            tracing::info!(
                graph = %layer.name,
                nodes = graph.len(),
                edges = graph.edge_count(),
                contained = graph.containment_count(),
                "graph loaded"
            );
            layers.push(LayerGraph::new(layer.name, layer.title, graph));
        }

        Ok((Self { layers }, report))
    }

    pub fn layers(&self) -> &[LayerGraph] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&LayerGraph> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Resolve a handle against whichever layer issued it.
    pub fn resolve(&self, node: NodeRef) -> Option<(&LayerGraph, &Node)> {
        self.layers
            .iter()
            .find(|l| l.graph.id() == node.graph())
            .and_then(|l| l.graph.resolve(node).map(|n| (l, n)))
    }
}
