//! CLI binary for topograph: list, check, and export layered network topologies.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use topo_core::config::TopoConfig;
use topo_core::integrity;
use topo_core::topology::{LayerGraph, Topology};
use topo_render::echarts::render_page;
use topo_render::export::{ExportFormat, export};
use topo_render::listing::Listing;

const SAMPLE_TOPOLOGY: &str = include_str!("../assets/cloud-architecture.toml");

#[derive(Parser)]
#[command(name = "topograph", about = "Layered network topology viewer")]
struct Cli {
    /// Topology file (defaults to the bundled cloud-architecture sample)
    #[arg(short, long, global = true)]
    topology: Option<PathBuf>,

    /// Project root holding .topograph/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the adjacency listing of each graph
    Show {
        /// Only this graph
        #[arg(short, long)]
        graph: Option<String>,
    },

    /// Show node, edge and containment counts per graph
    Info,

    /// Export as DOT (Graphviz), Mermaid flowchart, or an HTML chart page
    Export {
        /// Output format: dot, mermaid, html
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Graph to export (html: all graphs; dot/mermaid: the first graph)
        #[arg(short, long)]
        graph: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate graph integrity (dangling handles, unmirrored edges, containment)
    Validate,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = TopoConfig::load(&project_root)?;
    let topology = load_topology(cli.topology.as_deref())?;

    match cli.command {
        Commands::Show { graph } => cmd_show(&topology, graph.as_deref()),
        Commands::Info => cmd_info(&topology),
        Commands::Export {
            format,
            graph,
            output,
        } => cmd_export(
            &topology,
            &config,
            &format,
            graph.as_deref(),
            output.as_deref(),
        ),
        Commands::Validate => cmd_validate(&topology),
    }
}

/// Duplicate node definitions are already logged while loading.
fn load_topology(path: Option<&Path>) -> Result<Topology> {
    let (topology, _report) = match path {
        Some(p) => Topology::load(p)?,
        None => Topology::from_toml_str(SAMPLE_TOPOLOGY)
            .context("bundled sample topology is invalid")?,
    };
    Ok(topology)
}

/// The named graph, or every graph when no name is given.
fn select_layers<'t>(topology: &'t Topology, graph: Option<&str>) -> Result<Vec<&'t LayerGraph>> {
    match graph {
        Some(name) => {
            let layer = topology.layer(name).with_context(|| {
                let available: Vec<&str> = topology.layers().iter().map(|l| l.name()).collect();
                format!(
                    "no graph named '{}' (available: {})",
                    name,
                    available.join(", ")
                )
            })?;
            Ok(vec![layer])
        }
        None => Ok(topology.layers().iter().collect()),
    }
}

fn cmd_show(topology: &Topology, graph: Option<&str>) -> Result<()> {
    for layer in select_layers(topology, graph)? {
        println!("{}", layer.title());
        print!("{}", Listing(layer.graph()));
        println!();
    }
    Ok(())
}

fn cmd_info(topology: &Topology) -> Result<()> {
    println!("Graphs: {}", topology.layers().len());
    for layer in topology.layers() {
        let graph = layer.graph();
        let containers = graph
            .iter()
            .filter(|(_, n)| !n.contained().is_empty())
            .count();
        println!();
        println!("{} ({})", layer.name(), layer.title());
        println!("  Nodes: {}", graph.len());
        println!("  Edges: {}", graph.edge_count());
        println!("  Contained nodes: {}", graph.containment_count());
        println!("  Containers: {}", containers);
    }
    Ok(())
}

fn render_export(
    topology: &Topology,
    config: &TopoConfig,
    format: ExportFormat,
    graph: Option<&str>,
) -> Result<String> {
    if format == ExportFormat::Html && graph.is_none() {
        let layers = select_layers(topology, None)?;
        return render_page(topology, &layers, &config.render);
    }
    let layer = match graph {
        Some(_) => select_layers(topology, graph)?
            .into_iter()
            .next()
            .context("no graph selected")?,
        None => topology
            .layers()
            .first()
            .context("topology has no graphs")?,
    };
    export(topology, layer, format, &config.render)
}

fn cmd_export(
    topology: &Topology,
    config: &TopoConfig,
    format: &str,
    graph: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let rendered = render_export(topology, config, format, graph)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn cmd_validate(topology: &Topology) -> Result<()> {
    let issues = integrity::check(topology);
    for issue in &issues {
        println!("WARN: {}", issue);
    }
    if !issues.is_empty() {
        anyhow::bail!("{} integrity issue(s) found", issues.len());
    }
    println!("OK: {} graph(s), no issues", topology.layers().len());
    Ok(())
}
