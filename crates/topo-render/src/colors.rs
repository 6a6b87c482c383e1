//! Container color assignment.
//!
//! Nodes are colored by the *name* of their container, so two containers
//! sharing a name share a color.

use topo_core::graph::Node;
use topo_core::topology::{LayerGraph, Topology};

/// Container names and their colors, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerColors {
    assigned: Vec<(String, String)>,
}

impl ContainerColors {
    pub fn color_of(&self, container_name: &str) -> Option<&str> {
        self.assigned
            .iter()
            .find(|(name, _)| name == container_name)
            .map(|(_, color)| color.as_str())
    }

    /// Position of a container name, used as a chart category index.
    pub fn index_of(&self, container_name: &str) -> Option<usize> {
        self.assigned.iter().position(|(name, _)| name == container_name)
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.assigned
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Name of the node's container, resolved anywhere in the topology.
pub fn container_name<'t>(topology: &'t Topology, node: &Node) -> Option<&'t str> {
    node.container()
        .and_then(|c| topology.resolve(c))
        .map(|(_, container)| container.name())
}

/// Give every distinct container name of `layer` a palette color.
///
/// Names are visited in ascending node-id order; the palette wraps around
/// when exhausted. Uncontained nodes get no color.
pub fn assign_colors(
    topology: &Topology,
    layer: &LayerGraph,
    palette: &[String],
) -> ContainerColors {
    let mut colors = ContainerColors::default();
    if palette.is_empty() {
        return colors;
    }
    for (_, node) in layer.graph().iter() {
        let Some(name) = container_name(topology, node) else {
            continue;
        };
        if colors.index_of(name).is_some() {
            continue;
        }
        let n = colors.assigned.len();
        if n == palette.len() {
            tracing::debug!(graph = layer.name(), "palette exhausted, reusing colors");
        }
        let color = palette[n % palette.len()].clone();
        colors.assigned.push((name.to_string(), color));
    }
    colors
}
