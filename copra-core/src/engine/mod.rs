//! Relabelling machinery: per-worker scratch, the scanner/chooser pair and
//! the synchronous move round.

mod round;
mod scan;
mod scratch;

pub(crate) use self::{
    round::{RoundInputs, move_round},
    scan::ChooserParams,
    scratch::ScratchPool,
};

use crate::{CopraError, Graph, LabelSet, Result};

/// Gives every live vertex its own community with coefficient 1.
pub(crate) fn initialize<G: Graph>(graph: &G) -> Vec<LabelSet> {
    (0..graph.span())
        .map(|vertex| {
            if graph.has_vertex(vertex) {
                LabelSet::singleton(vertex)
            } else {
                LabelSet::empty()
            }
        })
        .collect()
}

/// Fits prior label sets to the current graph.
///
/// Missing trailing entries are appended, live vertices without labels get
/// their singleton, and ids that are no longer live are cleared. Every other
/// live set must already satisfy the label-set invariants under
/// `max_labels` and name only communities below `graph.span()`.
///
/// # Errors
/// Returns [`CopraError::PriorSpanMismatch`] when `prior` covers more ids
/// than `graph.span()`, and [`CopraError::InconsistentLabelSet`] for the
/// first live set that breaks its invariants or names a community outside
/// the graph.
pub(crate) fn seed_from_prior<G: Graph>(
    graph: &G,
    mut prior: Vec<LabelSet>,
    max_labels: usize,
) -> Result<Vec<LabelSet>> {
    let span = graph.span();
    if prior.len() > span {
        return Err(CopraError::PriorSpanMismatch {
            prior: prior.len(),
            span,
        });
    }
    prior.resize(span, LabelSet::empty());
    for (vertex, labels) in prior.iter_mut().enumerate() {
        if !graph.has_vertex(vertex) {
            *labels = LabelSet::empty();
        } else if labels.is_empty() {
            *labels = LabelSet::singleton(vertex);
        } else {
            labels.validate(vertex, max_labels)?;
            if labels.iter().any(|label| label.community() >= span) {
                return Err(CopraError::InconsistentLabelSet {
                    vertex,
                    reason: "community outside the graph",
                });
            }
        }
    }
    Ok(prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdjacencyGraph, Label};

    #[test]
    fn initialize_skips_gaps() {
        let mut graph = AdjacencyGraph::with_span(3);
        graph.add_edge(1, 2, 1.0);
        let labels = initialize(&graph);
        assert!(labels[0].is_empty());
        assert_eq!(labels[2], LabelSet::singleton(2));
    }

    #[test]
    fn prior_is_extended_for_new_vertices() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0)]);
        let seeded = seed_from_prior(&graph, vec![LabelSet::singleton(1); 2], 1)
            .expect("shorter prior must be accepted");
        assert_eq!(seeded.len(), 3);
        assert_eq!(seeded[0], LabelSet::singleton(1));
        assert_eq!(seeded[2], LabelSet::singleton(2));
    }

    #[test]
    fn longer_prior_is_rejected() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let err = seed_from_prior(&graph, vec![LabelSet::singleton(0); 3], 1)
            .expect_err("longer prior must fail");
        assert_eq!(err, CopraError::PriorSpanMismatch { prior: 3, span: 2 });
    }

    #[test]
    fn prior_sets_are_checked_against_the_cap() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let halves = LabelSet::from_labels(vec![Label::new(0, 0.5), Label::new(1, 0.5)]);
        let err = seed_from_prior(&graph, vec![halves.clone(), LabelSet::singleton(1)], 1)
            .expect_err("two labels exceed a cap of one");
        assert_eq!(
            err,
            CopraError::InconsistentLabelSet {
                vertex: 0,
                reason: "more labels than the configured cap",
            }
        );
        assert!(seed_from_prior(&graph, vec![halves, LabelSet::singleton(1)], 2).is_ok());
    }

    #[test]
    fn prior_communities_must_lie_inside_the_graph() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let err = seed_from_prior(&graph, vec![LabelSet::singleton(0), LabelSet::singleton(2)], 1)
            .expect_err("community 2 is outside span 2");
        assert_eq!(
            err,
            CopraError::InconsistentLabelSet {
                vertex: 1,
                reason: "community outside the graph",
            }
        );
    }
}
