//! Per-vertex total outgoing edge weight.

use rayon::prelude::*;

use crate::Graph;

/// Sums the outgoing edge weights of every vertex.
///
/// The returned vector is indexed by vertex id over `[0, span)`; non-live ids
/// and vertices without out-edges hold zero. The totals only serve as
/// normalization denominators, so summation order affects rounding alone.
///
/// # Examples
/// ```
/// use copra_core::{AdjacencyGraph, vertex_weights};
///
/// let graph = AdjacencyGraph::undirected([(0, 1, 2.0), (0, 2, 0.5)]);
/// assert_eq!(vertex_weights(&graph), vec![2.5, 2.0, 0.5]);
/// ```
#[must_use]
pub fn vertex_weights<G: Graph>(graph: &G) -> Vec<f64> {
    (0..graph.span())
        .into_par_iter()
        .map(|vertex| {
            let mut total = 0.0;
            if graph.has_vertex(vertex) {
                graph.for_each_out_edge(vertex, |_, weight| total += weight);
            }
            total
        })
        .collect()
}
