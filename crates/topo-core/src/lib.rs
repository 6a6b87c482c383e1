//! Core types for topograph: layered directed graphs with containment.
//!
//! Provides the graph data model ([`graph::Graph`]) with flow edges and
//! cross-graph containment, TOML topology loading, integrity checks, and
//! render configuration.

pub mod config;
pub mod error;
pub mod graph;
pub mod integrity;
pub mod topology;
