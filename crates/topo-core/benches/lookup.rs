use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use topo_core::graph::*;

fn build_graph(node_count: i64) -> Graph {
    let mut graph = Graph::new();
    for id in 0..node_count {
        graph.add_node(id, format!("service_{}", id)).unwrap();
    }
    for id in 1..node_count {
        graph.add_edge(id - 1, id).unwrap();
        graph.add_edge(id, id / 2).unwrap();
    }
    graph
}

fn bench_find_node_id_10k(c: &mut Criterion) {
    let graph = build_graph(10_000);
    let targets: Vec<NodeRef> = graph
        .iter()
        .flat_map(|(_, n)| n.out_edges().iter().copied())
        .collect();

    c.bench_function("find_node_id_all_edges_10k", |b| {
        b.iter(|| {
            targets
                .iter()
                .filter_map(|&r| graph.find_node_id(black_box(r)))
                .count()
        })
    });
}

fn bench_add_edge_10k(c: &mut Criterion) {
    c.bench_function("build_graph_10k", |b| b.iter(|| build_graph(black_box(10_000))));
}

criterion_group!(benches, bench_find_node_id_10k, bench_add_edge_10k);
criterion_main!(benches);
