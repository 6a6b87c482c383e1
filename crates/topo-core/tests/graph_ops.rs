use topo_core::error::GraphError;
use topo_core::graph::*;

fn chain() -> Graph {
    let mut g = Graph::new();
    g.add_node(1, "A").unwrap();
    g.add_node(2, "B").unwrap();
    g.add_node(3, "C").unwrap();
    g.add_edge(1, 2).unwrap();
    g.add_edge(2, 3).unwrap();
    g
}

fn name_of(g: &Graph, r: NodeRef) -> &str {
    g.resolve(r).unwrap().name()
}

#[test]
fn test_create_empty() {
    let g = Graph::new();
    assert!(g.is_empty());
    assert_eq!(g.len(), 0);
    assert_eq!(g.iter().count(), 0);
}

#[test]
fn test_chain_scenario() {
    let g = chain();
    let b = g.node(2).unwrap();

    let ins: Vec<&str> = b.in_edges().iter().map(|&r| name_of(&g, r)).collect();
    let outs: Vec<&str> = b.out_edges().iter().map(|&r| name_of(&g, r)).collect();
    assert_eq!(ins, vec!["A"]);
    assert_eq!(outs, vec!["C"]);

    let a_ref = g.node_ref(1).unwrap();
    assert_eq!(g.find_node_id(a_ref), Some(1));

    // "Z" lives in another graph, so it is unknown here
    let mut other = Graph::new();
    let z_ref = other.add_node(1, "Z").unwrap();
    assert_eq!(g.find_node_id(z_ref), None);
    assert_eq!(find_node_id(&g, None), None);
}

#[test]
fn test_lookup_matches_identity_not_value() {
    // Same id and name in two graphs: the handles must not be interchangeable
    let mut g1 = Graph::new();
    let mut g2 = Graph::new();
    let r1 = g1.add_node(4, "Twin").unwrap();
    let r2 = g2.add_node(4, "Twin").unwrap();
    assert_ne!(r1, r2);
    assert_eq!(g1.find_node_id(r1), Some(4));
    assert_eq!(g1.find_node_id(r2), None);
    assert_eq!(g2.find_node_id(r1), None);
}

#[test]
fn test_repeated_edges_are_not_deduplicated() {
    let mut g = chain();
    g.add_edge(1, 2).unwrap();
    let a = g.node(1).unwrap();
    let b = g.node(2).unwrap();
    assert_eq!(a.out_edges().len(), 2);
    assert_eq!(b.in_edges().len(), 2);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn test_add_edge_missing_source() {
    let mut g = chain();
    assert!(matches!(
        g.add_edge(42, 1),
        Err(GraphError::NodeNotFound { id: 42, .. })
    ));
    assert!(g.node(1).unwrap().in_edges().is_empty());
}

#[test]
fn test_cross_graph_containment_scenario() {
    let mut gw = Graph::new();
    gw.add_node(5, "Platform").unwrap();
    let mut gs = Graph::new();
    gs.add_node(1, "Dynamics").unwrap();

    gs.add_containment_edge_in(1, &mut gw, 5).unwrap();

    let dynamics = gs.node(1).unwrap();
    let platform = gw.node(5).unwrap();
    assert_eq!(dynamics.container(), gw.node_ref(5));
    assert_eq!(platform.contained(), &[gs.node_ref(1).unwrap()]);

    // The container handle belongs to gw, not gs
    let container = dynamics.container().unwrap();
    assert_eq!(gs.find_node_id(container), None);
    assert_eq!(gw.find_node_id(container), Some(5));

    // Both graphs keep their own nodes
    assert_eq!(gw.len(), 1);
    assert_eq!(gs.len(), 1);
}

#[test]
fn test_cross_graph_containment_missing_container() {
    let mut gw = Graph::new();
    let mut gs = Graph::new();
    gs.add_node(1, "Dynamics").unwrap();

    let err = gs.add_containment_edge_in(1, &mut gw, 5).unwrap_err();
    assert_eq!(
        err,
        GraphError::NodeNotFound {
            graph: gw.id(),
            id: 5
        }
    );
    assert!(gs.node(1).unwrap().container().is_none());
}

#[test]
fn test_cross_graph_containment_missing_contained() {
    let mut gw = Graph::new();
    gw.add_node(5, "Platform").unwrap();
    let mut gs = Graph::new();

    let err = gs.add_containment_edge_in(1, &mut gw, 5).unwrap_err();
    assert_eq!(
        err,
        GraphError::NodeNotFound {
            graph: gs.id(),
            id: 1
        }
    );
    assert!(gw.node(5).unwrap().contained().is_empty());
}

#[test]
fn test_recontainment_moves_node_to_new_container() {
    let mut gw = Graph::new();
    gw.add_node(5, "Platform").unwrap();
    gw.add_node(6, "Secured").unwrap();
    let mut gs = Graph::new();
    gs.add_node(1, "Dynamics").unwrap();
    let dynamics = gs.node_ref(1).unwrap();

    gs.add_containment_edge_in(1, &mut gw, 5).unwrap();
    gs.add_containment_edge_in(1, &mut gw, 5).unwrap();
    assert_eq!(gw.node(5).unwrap().contained(), &[dynamics]);

    gs.add_containment_edge_in(1, &mut gw, 6).unwrap();
    assert_eq!(gs.node(1).unwrap().container(), gw.node_ref(6));
    assert_eq!(gw.node(6).unwrap().contained(), &[dynamics]);
    assert!(gw.node(5).unwrap().contained().is_empty());
    assert_eq!(gs.containment_count(), 1);
}

#[test]
fn test_recontainment_from_own_graph_into_other_graph() {
    let mut gw = Graph::new();
    gw.add_node(5, "Platform").unwrap();
    let mut gs = Graph::new();
    gs.add_node(1, "Dynamics").unwrap();
    gs.add_node(2, "Cluster").unwrap();

    gs.add_containment_edge(1, 2).unwrap();
    gs.add_containment_edge_in(1, &mut gw, 5).unwrap();

    assert_eq!(gs.node(1).unwrap().container(), gw.node_ref(5));
    assert!(gs.node(2).unwrap().contained().is_empty());
    assert_eq!(gw.node(5).unwrap().contained(), &[gs.node_ref(1).unwrap()]);
}

#[test]
fn test_container_in_third_graph_is_kept() {
    let mut ga = Graph::new();
    ga.add_node(1, "Region").unwrap();
    let mut gb = Graph::new();
    gb.add_node(1, "Zone").unwrap();
    let mut gs = Graph::new();
    gs.add_node(1, "Dynamics").unwrap();

    gs.add_containment_edge_in(1, &mut ga, 1).unwrap();
    assert!(matches!(
        gs.add_containment_edge_in(1, &mut gb, 1),
        Err(GraphError::AlreadyContained { id: 1, .. })
    ));

    assert_eq!(gs.node(1).unwrap().container(), ga.node_ref(1));
    assert_eq!(ga.node(1).unwrap().contained().len(), 1);
    assert!(gb.node(1).unwrap().contained().is_empty());
}

#[test]
fn test_self_containment_is_allowed() {
    let mut g = chain();
    g.add_containment_edge(2, 2).unwrap();
    let b = g.node(2).unwrap();
    assert_eq!(b.container(), g.node_ref(2));
    assert_eq!(b.contained(), &[g.node_ref(2).unwrap()]);
}

#[test]
fn test_error_messages() {
    let mut g = chain();
    let err = g.add_node(1, "again").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("node 1 already exists in graph {}", g.id())
    );
    let err = g.add_edge(1, 9).unwrap_err();
    assert!(err.to_string().starts_with("node 9 not found"));
}
