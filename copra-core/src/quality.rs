//! Partition quality scoring.

use std::collections::HashMap;

use crate::{Graph, Membership, VertexId};

/// Computes the Newman modularity of `membership` over `graph`.
///
/// Every out-edge counts once, so an undirected graph stored with both
/// directions contributes its full weight `2m`. With `W` the total
/// out-edge weight, `in(c)` the weight of edges inside community `c` and
/// `tot(c)` the out-weight of its vertices, the score is
/// `sum_c in(c) / W - resolution * (tot(c) / W)^2`. Vertices without a
/// community are ignored. Graphs without positive weight score zero.
///
/// # Examples
/// ```
/// use copra_core::{AdjacencyGraph, LabelSet, Membership, modularity};
///
/// let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (2, 3, 1.0)]);
/// let labels: Vec<_> = [0, 0, 2, 2].into_iter().map(LabelSet::singleton).collect();
/// let split = Membership::from_label_sets(&labels);
/// assert!((modularity(&graph, &split, 1.0) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn modularity<G: Graph>(graph: &G, membership: &Membership, resolution: f64) -> f64 {
    let mut total = 0.0;
    let mut inside: HashMap<VertexId, f64> = HashMap::new();
    let mut degree: HashMap<VertexId, f64> = HashMap::new();

    for (vertex, community) in membership.iter() {
        graph.for_each_out_edge(vertex, |neighbour, weight| {
            total += weight;
            *degree.entry(community).or_default() += weight;
            if membership.get(neighbour) == Some(community) {
                *inside.entry(community).or_default() += weight;
            }
        });
    }
    if total <= 0.0 {
        return 0.0;
    }

    degree
        .iter()
        .map(|(community, &tot)| {
            let within = inside.get(community).copied().unwrap_or(0.0);
            within / total - resolution * (tot / total).powi(2)
        })
        .sum()
}
