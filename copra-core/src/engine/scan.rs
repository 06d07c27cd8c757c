//! Community scanning and label selection for a single vertex.

use crate::{Graph, Label, LabelSet, VertexId, label_set::label_order};

use super::scratch::Scratch;

/// Parameters shared by every chooser call within a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ChooserParams {
    /// Maximum number of labels a vertex may keep.
    pub(crate) max_labels: usize,
    /// Belonging threshold `B = 1 / max_labels` before scaling.
    pub(crate) belonging: f64,
}

impl ChooserParams {
    pub(crate) fn new(max_labels: usize) -> Self {
        let cap = max_labels.max(1);
        Self {
            max_labels: cap,
            belonging: 1.0 / cap as f64,
        }
    }
}

/// Accumulates the weighted votes `vertex` receives from its neighbours.
///
/// Every out-edge `(vertex, v, w)` contributes `w * coefficient` to each
/// community in `labels[v]`.
pub(crate) fn scan_communities<G: Graph>(
    scratch: &mut Scratch,
    graph: &G,
    vertex: VertexId,
    labels: &[LabelSet],
) {
    scratch.clear();
    graph.for_each_out_edge(vertex, |neighbour, weight| {
        let Some(neighbour_labels) = labels.get(neighbour) else {
            return;
        };
        for label in neighbour_labels {
            scratch.add(label.community(), weight * label.coefficient());
        }
    });
}

/// Converts the scanned votes into the vertex's next label set.
///
/// Communities are ranked by vote (lowest id on ties); those below
/// `threshold` are dropped, though the top community always survives. At
/// most `max_labels` remain and their votes are rescaled to sum to one. A
/// vertex that received no votes keeps `previous`.
pub(crate) fn choose_community(
    previous: &LabelSet,
    scratch: &Scratch,
    threshold: f64,
    params: ChooserParams,
) -> LabelSet {
    if scratch.touched().is_empty() {
        return previous.clone();
    }

    let mut ranked: Vec<Label> = scratch
        .touched()
        .iter()
        .map(|&community| Label::new(community, scratch.vote(community)))
        .collect();
    ranked.sort_by(label_order);

    let survivors = ranked
        .iter()
        .take_while(|label| label.coefficient() >= threshold)
        .count()
        .clamp(1, params.max_labels);
    ranked.truncate(survivors);

    let total: f64 = ranked.iter().map(Label::coefficient).sum();
    let normalized = ranked
        .into_iter()
        .map(|label| Label::new(label.community(), label.coefficient() / total))
        .collect();
    LabelSet::from_labels(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdjacencyGraph, engine::scratch::ScratchPool};
    use rstest::rstest;

    fn singletons(span: usize) -> Vec<LabelSet> {
        (0..span).map(LabelSet::singleton).collect()
    }

    fn relabel(
        graph: &AdjacencyGraph,
        labels: &[LabelSet],
        vertex: VertexId,
        cap: usize,
    ) -> LabelSet {
        let pool = ScratchPool::new(1, graph.span());
        let mut scratch = pool.acquire().expect("slot must lock");
        scan_communities(&mut scratch, graph, vertex, labels);
        let params = ChooserParams::new(cap);
        let total: f64 = graph.out_edges(vertex).iter().map(|&(_, w)| w).sum();
        choose_community(&labels[vertex], &scratch, params.belonging * total, params)
    }

    #[test]
    fn scan_weights_votes_by_neighbour_coefficients() {
        let graph = AdjacencyGraph::undirected([(0, 1, 2.0), (0, 2, 1.0)]);
        let mut labels = singletons(3);
        labels[1] = LabelSet::from_labels(vec![Label::new(1, 0.5), Label::new(2, 0.5)]);
        let pool = ScratchPool::new(1, 3);
        let mut scratch = pool.acquire().expect("slot must lock");
        scan_communities(&mut scratch, &graph, 0, &labels);
        assert_eq!(scratch.vote(1), 1.0);
        assert_eq!(scratch.vote(2), 2.0);
        assert_eq!(scratch.vote(0), 0.0);
    }

    #[test]
    fn isolated_vertex_keeps_previous_labels() {
        let mut graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        graph.add_vertex(2);
        let labels = singletons(3);
        assert_eq!(relabel(&graph, &labels, 2, 2), LabelSet::singleton(2));
    }

    #[rstest]
    #[case::single_label(1, vec![(1, 1.0)])]
    #[case::two_labels(2, vec![(1, 1.0)])]
    #[case::four_labels(4, vec![(1, 0.6), (2, 0.4)])]
    fn chooser_prunes_below_threshold(
        #[case] cap: usize,
        #[case] expected: Vec<(VertexId, f64)>,
    ) {
        // Votes for vertex 0: community 1 -> 3.0, community 2 -> 2.0, community 3 -> 0.5.
        let graph = AdjacencyGraph::undirected([(0, 1, 3.0), (0, 2, 2.0), (0, 3, 0.5)]);
        let labels = singletons(4);
        let chosen = relabel(&graph, &labels, 0, cap);
        let actual: Vec<(VertexId, f64)> = chosen
            .iter()
            .map(|label| (label.community(), label.coefficient()))
            .collect();
        assert_eq!(actual.len(), expected.len());
        for ((community, coefficient), (want_community, want_coefficient)) in
            actual.into_iter().zip(expected)
        {
            assert_eq!(community, want_community);
            assert!((coefficient - want_coefficient).abs() < 1e-12);
        }
        assert!(chosen.validate(0, cap).is_ok());
    }

    #[test]
    fn chooser_retains_top_community_when_all_fall_below_threshold() {
        // Five equal votes of 1.0 against a threshold of 5.0 * 0.5.
        let graph = AdjacencyGraph::undirected([
            (0, 1, 1.0),
            (0, 2, 1.0),
            (0, 3, 1.0),
            (0, 4, 1.0),
            (0, 5, 1.0),
        ]);
        let labels = singletons(6);
        let chosen = relabel(&graph, &labels, 0, 2);
        assert_eq!(chosen, LabelSet::singleton(1));
    }

    #[test]
    fn chooser_keeps_votes_exactly_at_threshold() {
        let graph = AdjacencyGraph::undirected([(0, 3, 1.0), (0, 1, 1.0)]);
        let labels = singletons(4);
        let chosen = relabel(&graph, &labels, 0, 2);
        let communities: Vec<_> = chosen.iter().map(Label::community).collect();
        assert_eq!(communities, vec![1, 3]);
        assert_eq!(chosen.coefficient_of(3), Some(0.5));
    }

    #[test]
    fn chooser_truncates_ties_to_cap_by_id() {
        let graph = AdjacencyGraph::undirected([(0, 3, 1.0), (0, 1, 1.0), (0, 2, 1.0)]);
        let labels = singletons(4);
        let pool = ScratchPool::new(1, 4);
        let mut scratch = pool.acquire().expect("slot must lock");
        scan_communities(&mut scratch, &graph, 0, &labels);
        let chosen = choose_community(&labels[0], &scratch, 0.0, ChooserParams::new(2));
        let communities: Vec<_> = chosen.iter().map(Label::community).collect();
        assert_eq!(communities, vec![1, 2]);
        assert!((chosen.coefficient_sum() - 1.0).abs() < 1e-12);
    }
}
