//! Force-layout ECharts graphs embedded in a standalone HTML page.

use crate::colors::{assign_colors, container_name};
use crate::{node_label, ref_label};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use topo_core::config::RenderConfig;
use topo_core::topology::{LayerGraph, Topology};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// Top-level ECharts option object for one chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub title: Title,
    pub tooltip: Tooltip,
    pub legend: Legend,
    pub series: Vec<GraphSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tooltip {
    pub show: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub show: bool,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSeries {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub layout: &'static str,
    pub roam: bool,
    pub draggable: bool,
    pub force: Force,
    pub edge_symbol: [&'static str; 2],
    pub edge_symbol_size: u32,
    pub label: Label,
    pub line_style: LineStyle,
    pub categories: Vec<Category>,
    pub data: Vec<ChartNode>,
    pub links: Vec<ChartLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Force {
    pub repulsion: f64,
    pub gravity: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub show: bool,
    pub color: &'static str,
    pub position: &'static str,
    pub font_weight: &'static str,
    pub align: &'static str,
    pub vertical_align: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub opacity: f64,
    pub curveness: f64,
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub item_style: ItemStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemStyle {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartNode {
    pub name: String,
    pub symbol: &'static str,
    pub symbol_size: [u32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLink {
    pub source: String,
    pub target: String,
}

/// Build the chart for one layer. Nodes are colored (and categorized for the
/// legend) by container name; links use the `"<id> <name>"` labels.
pub fn chart_option(topology: &Topology, layer: &LayerGraph, config: &RenderConfig) -> ChartOption {
    let graph = layer.graph();
    let colors = assign_colors(topology, layer, &config.palette);

    let data = graph
        .iter()
        .map(|(id, node)| {
            let container = container_name(topology, node);
            ChartNode {
                name: node_label(id, node.name()),
                symbol: "circle",
                symbol_size: [config.symbol_size, config.symbol_size],
                category: container.and_then(|c| colors.index_of(c)),
                item_style: container
                    .and_then(|c| colors.color_of(c))
                    .map(|color| ItemStyle {
                        color: color.to_string(),
                    }),
            }
        })
        .collect();

    let links = graph
        .iter()
        .flat_map(|(id, node)| {
            let source = node_label(id, node.name());
            node.out_edges().iter().filter_map(move |&target| {
                ref_label(graph, target).map(|target| ChartLink {
                    source: source.clone(),
                    target,
                })
            })
        })
        .collect();

    let categories: Vec<Category> = colors
        .entries()
        .iter()
        .map(|(name, color)| Category {
            name: name.clone(),
            item_style: ItemStyle {
                color: color.clone(),
            },
        })
        .collect();

    ChartOption {
        title: Title {
            text: layer.title().to_string(),
        },
        tooltip: Tooltip { show: true },
        legend: Legend {
            show: true,
            data: categories.iter().map(|c| c.name.clone()).collect(),
        },
        series: vec![GraphSeries {
            kind: "graph",
            name: layer.name().to_string(),
            layout: "force",
            roam: true,
            draggable: true,
            force: Force {
                repulsion: config.repulsion,
                gravity: config.gravity,
            },
            edge_symbol: ["none", "arrow"],
            edge_symbol_size: 10,
            label: Label {
                show: true,
                color: "black",
                position: "below",
                font_weight: "normal",
                align: "right",
                vertical_align: "bottom",
            },
            line_style: LineStyle {
                opacity: 1.0,
                curveness: 0.0,
                width: 1.0,
                color: "gray",
            },
            categories,
            data,
            links,
        }],
    }
}

/// Render one HTML page holding a chart per layer, in the given order.
pub fn render_page(
    topology: &Topology,
    layers: &[&LayerGraph],
    config: &RenderConfig,
) -> Result<String> {
    let charts = layers
        .iter()
        .map(|layer| {
            serde_json::to_string(&chart_option(topology, layer, config))
                .with_context(|| format!("failed to serialize chart for graph '{}'", layer.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page {
        title: &config.page_title,
        width: config.width,
        height: config.height,
        charts: &charts,
    }
    .to_string())
}

struct Page<'a> {
    title: &'a str,
    width: u32,
    height: u32,
    charts: &'a [String],
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head>")?;
        writeln!(f, "  <meta charset=\"utf-8\">")?;
        writeln!(f, "  <title>{}</title>", html_escape(self.title))?;
        writeln!(f, "  <script src=\"{}\"></script>", ECHARTS_CDN)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        for (i, chart) in self.charts.iter().enumerate() {
            writeln!(
                f,
                "  <div id=\"chart-{}\" style=\"width:{}px;height:{}px;\"></div>",
                i, self.width, self.height
            )?;
            writeln!(f, "  <script>")?;
            writeln!(
                f,
                "    echarts.init(document.getElementById(\"chart-{}\")).setOption({});",
                i,
                script_safe(chart)
            )?;
            writeln!(f, "  </script>")?;
        }
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
