//! Proptest strategies and configuration for the property suites.

use copra_core::AdjacencyGraph;
use copra_test_support::property::case_count;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

/// Proptest configuration honouring the shared case-count override.
pub fn proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: case_count(default_cases),
        ..ProptestConfig::default()
    }
}

/// Random undirected graphs of up to 12 vertices with positive weights.
pub fn weighted_graph() -> impl Strategy<Value = AdjacencyGraph> {
    (1_usize..12).prop_flat_map(|order| {
        prop::collection::vec((0..order, 0..order, 0.1_f64..5.0), 0..(order * 3)).prop_map(
            move |edges| {
                let mut graph = AdjacencyGraph::with_span(order);
                for vertex in 0..order {
                    graph.add_vertex(vertex);
                }
                for (source, target, weight) in edges {
                    if source != target {
                        graph.add_edge(source, target, weight);
                        graph.add_edge(target, source, weight);
                    }
                }
                graph
            },
        )
    })
}
