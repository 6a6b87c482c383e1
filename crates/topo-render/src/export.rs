//! Export a topology layer as DOT (Graphviz), Mermaid flowchart, or an HTML
//! chart page.

use crate::colors::{ContainerColors, assign_colors, container_name};
use crate::{echarts, node_label};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use topo_core::config::RenderConfig;
use topo_core::graph::{NodeId, NodeRef};
use topo_core::topology::{LayerGraph, Topology};

/// Export format for graph visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Dot,
    Mermaid,
    Html,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "mermaid" | "md" => Ok(Self::Mermaid),
            "html" | "echarts" => Ok(Self::Html),
            _ => anyhow::bail!(
                "Unknown export format: {}. Use 'dot', 'mermaid' or 'html'.",
                s
            ),
        }
    }
}

/// Export one layer in the requested format.
pub fn export(
    topology: &Topology,
    layer: &LayerGraph,
    format: ExportFormat,
    config: &RenderConfig,
) -> Result<String> {
    match format {
        ExportFormat::Dot => Ok(export_dot(topology, layer, &config.palette)),
        ExportFormat::Mermaid => Ok(export_mermaid(topology, layer, &config.palette)),
        ExportFormat::Html => echarts::render_page(topology, &[layer], config),
    }
}

/// Export the layer as a DOT (Graphviz) string.
pub fn export_dot(topology: &Topology, layer: &LayerGraph, palette: &[String]) -> String {
    Dot {
        topology,
        layer,
        colors: assign_colors(topology, layer, palette),
    }
    .to_string()
}

struct Dot<'a> {
    topology: &'a Topology,
    layer: &'a LayerGraph,
    colors: ContainerColors,
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.layer.graph();
        writeln!(f, "digraph topology {{")?;
        writeln!(f, "  label=\"{}\";", dot_escape(self.layer.title()))?;
        writeln!(f, "  rankdir=LR;")?;
        writeln!(f, "  node [shape=box, style=\"rounded,filled\", fontsize=10];")?;
        writeln!(f)?;

        for (id, node) in graph.iter() {
            let fill = container_name(self.topology, node)
                .and_then(|c| self.colors.color_of(c))
                .unwrap_or("#ffffff");
            writeln!(
                f,
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];",
                id,
                dot_escape(&node_label(id, node.name())),
                fill
            )?;
        }

        writeln!(f)?;

        for (id, node) in graph.iter() {
            for &target in node.out_edges() {
                match graph.find_node_id(target) {
                    Some(to) => writeln!(f, "  \"{}\" -> \"{}\";", id, to)?,
                    None => tracing::warn!(
                        graph = self.layer.name(),
                        node = id,
                        "skipping edge to unknown node"
                    ),
                }
            }
        }

        writeln!(f, "}}")
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Export the layer as a Mermaid flowchart, one subgraph per container.
pub fn export_mermaid(topology: &Topology, layer: &LayerGraph, palette: &[String]) -> String {
    Mermaid {
        topology,
        layer,
        colors: assign_colors(topology, layer, palette),
    }
    .to_string()
}

struct Mermaid<'a> {
    topology: &'a Topology,
    layer: &'a LayerGraph,
    colors: ContainerColors,
}

impl Mermaid<'_> {
    /// Group node ids by container handle, in first-seen order.
    /// Nodes whose container does not resolve stay ungrouped.
    fn groups(&self) -> (Vec<(NodeRef, Vec<NodeId>)>, Vec<NodeId>) {
        let mut groups: Vec<(NodeRef, Vec<NodeId>)> = Vec::new();
        let mut loose = Vec::new();
        for (id, node) in self.layer.graph().iter() {
            match node.container() {
                Some(c) if self.topology.resolve(c).is_some() => {
                    match groups.iter_mut().find(|(r, _)| *r == c) {
                        Some((_, members)) => members.push(id),
                        None => groups.push((c, vec![id])),
                    }
                }
                _ => loose.push(id),
            }
        }
        (groups, loose)
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: &str) -> fmt::Result {
        match self.layer.graph().node(id) {
            Some(node) => writeln!(
                f,
                "{}{}[\"{}\"]",
                indent,
                mermaid_id("n", id),
                mermaid_escape(&node_label(id, node.name()))
            ),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Mermaid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.layer.graph();
        writeln!(f, "flowchart LR")?;
        writeln!(f)?;

        let (groups, loose) = self.groups();
        for (i, (container, members)) in groups.iter().enumerate() {
            let Some((container_layer, c)) = self.topology.resolve(*container) else {
                continue;
            };
            let title = format!("{}: {}", container_layer.name(), node_label(c.id(), c.name()));
            writeln!(f, "  subgraph c{}[\"{}\"]", i, mermaid_escape(&title))?;
            for &id in members {
                self.write_node(f, id, "    ")?;
            }
            writeln!(f, "  end")?;
            if let Some(color) = self.colors.color_of(c.name()) {
                writeln!(f, "  style c{} fill:{}", i, color)?;
            }
        }
        for &id in &loose {
            self.write_node(f, id, "  ")?;
        }

        writeln!(f)?;

        for (id, node) in graph.iter() {
            for &target in node.out_edges() {
                if let Some(to) = graph.find_node_id(target) {
                    writeln!(f, "  {} --> {}", mermaid_id("n", id), mermaid_id("n", to))?;
                }
            }
        }
        Ok(())
    }
}

/// Mermaid ids cannot contain '-', so negative ids become `n_5`.
fn mermaid_id(prefix: &str, id: NodeId) -> String {
    format!("{}{}", prefix, id).replace('-', "_")
}

fn mermaid_escape(s: &str) -> String {
    s.replace('"', "#quot;")
}
