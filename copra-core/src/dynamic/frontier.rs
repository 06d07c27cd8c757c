//! Dynamic frontier: a wavefront of relabelling spreading from edited edges.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::{EdgeBatch, Graph, Result, VertexId};

use super::{ActivitySchedule, flagged, mark_endpoints};

/// Affected set that grows along the edges of changing vertices.
///
/// The first round relabels the endpoints of every edited edge. Whenever a
/// vertex changes its dominant community, all of its neighbours become active
/// for the *following* round; a vertex that is not re-activated that way
/// rests. The frontier therefore dies out once changes stop propagating.
///
/// # Examples
/// ```
/// use copra_core::{ActivitySchedule, AdjacencyGraph, EdgeBatch, Frontier};
///
/// let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
/// let batch = EdgeBatch::new(vec![(2, 3)], vec![]);
/// let mut frontier = Frontier::detect(&graph, &batch)?;
/// assert_eq!(frontier.active(), vec![2, 3]);
///
/// frontier.on_changed(1);
/// assert!(!frontier.is_active(0), "activation waits for the next round");
/// frontier.advance();
/// assert_eq!(frontier.active(), vec![0, 2]);
/// # Ok::<(), copra_core::CopraError>(())
/// ```
#[derive(Debug)]
pub struct Frontier<'g, G> {
    graph: &'g G,
    current: Vec<bool>,
    next: Vec<AtomicBool>,
}

impl<'g, G: Graph> Frontier<'g, G> {
    /// Seeds the frontier with both endpoints of every edge in `batch`.
    ///
    /// # Errors
    /// Returns [`crate::CopraError::InvalidEdgeReference`] when an edge
    /// endpoint lies outside `graph.span()`.
    pub fn detect(graph: &'g G, batch: &EdgeBatch) -> Result<Self> {
        let current = mark_endpoints(graph.span(), batch)?;
        let next = current.iter().map(|_| AtomicBool::new(false)).collect();
        let frontier = Self {
            graph,
            current,
            next,
        };
        debug!(
            active = frontier.active_count(),
            deletions = batch.deletions().len(),
            insertions = batch.insertions().len(),
            "frontier seeded from edited edges"
        );
        Ok(frontier)
    }

    /// Returns the ids active in the current round, ascending.
    #[must_use]
    pub fn active(&self) -> Vec<VertexId> {
        flagged(&self.current)
    }

    /// Returns how many ids are active in the current round.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.current.iter().filter(|&&flag| flag).count()
    }
}

impl<G: Graph> ActivitySchedule for Frontier<'_, G> {
    fn is_active(&self, vertex: VertexId) -> bool {
        self.current.get(vertex).copied().unwrap_or(false)
    }

    fn on_changed(&self, vertex: VertexId) {
        self.graph.for_each_out_edge(vertex, |neighbour, _| {
            if let Some(flag) = self.next.get(neighbour) {
                flag.store(true, Ordering::Relaxed);
            }
        });
    }

    fn advance(&mut self) {
        for (current, next) in self.current.iter_mut().zip(&self.next) {
            *current = next.swap(false, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdjacencyGraph;

    fn path(length: usize) -> AdjacencyGraph {
        AdjacencyGraph::undirected((1..length).map(|vertex| (vertex - 1, vertex, 1.0)))
    }

    #[test]
    fn advance_without_changes_empties_the_frontier() {
        let graph = path(4);
        let batch = EdgeBatch::new(vec![], vec![(0, 3, 1.0)]);
        let mut frontier = Frontier::detect(&graph, &batch).expect("batch is valid");
        assert_eq!(frontier.active_count(), 2);
        frontier.advance();
        assert_eq!(frontier.active_count(), 0);
    }

    #[test]
    fn changes_activate_neighbours_once() {
        let graph = path(5);
        let batch = EdgeBatch::new(vec![(0, 1)], vec![]);
        let mut frontier = Frontier::detect(&graph, &batch).expect("batch is valid");
        frontier.on_changed(2);
        frontier.on_changed(2);
        frontier.advance();
        assert_eq!(frontier.active(), vec![1, 3]);
        frontier.advance();
        assert!(frontier.active().is_empty());
    }
}
