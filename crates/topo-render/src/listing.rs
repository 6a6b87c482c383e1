//! Plain-text adjacency listing of a single graph.
//!
//! Each node gets two lines, out-edges then in-edges:
//!
//! ```text
//! (2) B -> (3) C;
//! (2) B <- (1) A;
//! ```

use std::fmt;
use topo_core::graph::{Graph, NodeRef};

/// Display adapter rendering the listing of a graph in ascending id order.
pub struct Listing<'a>(pub &'a Graph);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        for (id, node) in graph.iter() {
            write!(f, "({}) {} ->", id, node.name())?;
            write_refs(f, graph, node.out_edges())?;
            writeln!(f)?;
            write!(f, "({}) {} <-", id, node.name())?;
            write_refs(f, graph, node.in_edges())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_refs(f: &mut fmt::Formatter<'_>, graph: &Graph, refs: &[NodeRef]) -> fmt::Result {
    for &r in refs {
        match graph.resolve(r) {
            Some(n) => write!(f, " ({}) {};", n.id(), n.name())?,
            None => write!(f, " (?);")?,
        }
    }
    Ok(())
}

pub fn render_listing(graph: &Graph) -> String {
    Listing(graph).to_string()
}
