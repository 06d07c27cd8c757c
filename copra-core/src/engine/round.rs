//! One synchronous relabelling pass over every vertex.

use rayon::prelude::*;

use crate::{Graph, LabelSet, Result, VertexId};

use super::{
    scan::{ChooserParams, choose_community, scan_communities},
    scratch::ScratchPool,
};

/// Read-only inputs shared by every vertex of a round.
#[derive(Debug)]
pub(crate) struct RoundInputs<'a, G> {
    pub(crate) graph: &'a G,
    pub(crate) weights: &'a [f64],
    pub(crate) scratch: &'a ScratchPool,
    pub(crate) params: ChooserParams,
}

/// Vertices processed and changed during one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RoundTally {
    pub(crate) active: usize,
    pub(crate) changed: usize,
}

impl RoundTally {
    const fn merge(self, other: Self) -> Self {
        Self {
            active: self.active + other.active,
            changed: self.changed + other.changed,
        }
    }
}

/// Relabels every active vertex from `previous` into `next`.
///
/// Each vertex reads only `previous` and writes only its own slot of `next`,
/// so the outcome does not depend on how vertices are spread over workers.
/// Non-live and inactive vertices carry their previous set forward; an
/// inactive vertex is skipped on its own and never ends the pass early.
/// `on_changed` runs for every vertex whose dominant community moved.
///
/// # Errors
/// Returns [`crate::CopraError::LockPoisoned`] if a scratch slot is poisoned
/// and, in debug builds, [`crate::CopraError::InconsistentLabelSet`] if a new
/// set breaks its invariants.
pub(crate) fn move_round<G, A, P>(
    inputs: RoundInputs<'_, G>,
    previous: &[LabelSet],
    next: &mut [LabelSet],
    is_active: A,
    on_changed: P,
) -> Result<RoundTally>
where
    G: Graph,
    A: Fn(VertexId) -> bool + Sync,
    P: Fn(VertexId) + Sync,
{
    next.par_iter_mut()
        .zip(previous.par_iter())
        .enumerate()
        .map(|(vertex, (slot, prior))| -> Result<RoundTally> {
            if !inputs.graph.has_vertex(vertex) || !is_active(vertex) {
                slot.clone_from(prior);
                return Ok(RoundTally::default());
            }

            let threshold =
                inputs.params.belonging * inputs.weights.get(vertex).copied().unwrap_or(0.0);
            let labels = {
                let mut scratch = inputs.scratch.acquire()?;
                scan_communities(&mut scratch, inputs.graph, vertex, previous);
                choose_community(prior, &scratch, threshold, inputs.params)
            };
            if cfg!(debug_assertions) {
                labels.validate(vertex, inputs.params.max_labels)?;
            }

            let changed = labels.dominant() != prior.dominant();
            *slot = labels;
            if changed {
                on_changed(vertex);
            }
            Ok(RoundTally {
                active: 1,
                changed: usize::from(changed),
            })
        })
        .try_reduce(RoundTally::default, |left, right| Ok(left.merge(right)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{AdjacencyGraph, vertex_weights};

    fn run_round(
        graph: &AdjacencyGraph,
        previous: &[LabelSet],
        is_active: impl Fn(VertexId) -> bool + Sync,
    ) -> (Vec<LabelSet>, RoundTally) {
        let weights = vertex_weights(graph);
        let scratch = ScratchPool::new(2, graph.span());
        let inputs = RoundInputs {
            graph,
            weights: &weights,
            scratch: &scratch,
            params: ChooserParams::new(1),
        };
        let mut next = vec![LabelSet::empty(); previous.len()];
        let tally = move_round(inputs, previous, &mut next, is_active, |_| {})
            .expect("round must succeed");
        (next, tally)
    }

    fn singletons(graph: &AdjacencyGraph) -> Vec<LabelSet> {
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

    #[test]
    fn inactive_vertex_is_skipped_without_ending_the_round() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let previous = singletons(&graph);
        let (next, tally) = run_round(&graph, &previous, |vertex| vertex != 0);
        assert_eq!(tally.active, 3);
        assert_eq!(next[0], previous[0]);
        assert_eq!(next[3].dominant(), Some(2));
    }

    #[test]
    fn round_reads_only_previous_state() {
        // In a path 0-1-2 every vertex adopts a neighbour's previous label.
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0)]);
        let previous = singletons(&graph);
        let (next, tally) = run_round(&graph, &previous, |_| true);
        let dominant: Vec<_> = next.iter().map(LabelSet::dominant).collect();
        assert_eq!(dominant, vec![Some(1), Some(0), Some(1)]);
        assert_eq!(tally.changed, 3);
    }

    #[test]
    fn gaps_keep_empty_sets() {
        let mut graph = AdjacencyGraph::with_span(3);
        graph.add_edge(1, 2, 1.0);
        graph.add_edge(2, 1, 1.0);
        let previous = singletons(&graph);
        let (next, tally) = run_round(&graph, &previous, |_| true);
        assert!(next[0].is_empty());
        assert_eq!(tally.active, 2);
    }

    #[test]
    fn on_changed_sees_every_change() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let previous = singletons(&graph);
        let weights = vertex_weights(&graph);
        let scratch = ScratchPool::new(3, graph.span());
        let inputs = RoundInputs {
            graph: &graph,
            weights: &weights,
            scratch: &scratch,
            params: ChooserParams::new(1),
        };
        let observed = AtomicUsize::new(0);
        let mut next = vec![LabelSet::empty(); 3];
        let tally = move_round(inputs, &previous, &mut next, |_| true, |_| {
            observed.fetch_add(1, Ordering::Relaxed);
        })
        .expect("round must succeed");
        assert_eq!(observed.load(Ordering::Relaxed), tally.changed);
        assert_eq!(tally.changed, 3);
    }
}
