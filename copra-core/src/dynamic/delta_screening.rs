//! Delta-screening: relabel only the endpoints of edited edges.

use tracing::debug;

use crate::{EdgeBatch, Graph, Result, VertexId};

use super::{ActivitySchedule, flagged, mark_endpoints};

/// Fixed affected set made of the endpoints of every edited edge.
///
/// Nothing else is activated, before or during the run; vertices further
/// away are assumed settled from the prior result.
///
/// # Examples
/// ```
/// use copra_core::{ActivitySchedule, AdjacencyGraph, DeltaScreening, EdgeBatch};
///
/// let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
/// let batch = EdgeBatch::new(vec![], vec![(0, 3, 1.0)]);
/// let screening = DeltaScreening::detect(&graph, &batch)?;
/// assert_eq!(screening.affected(), vec![0, 3]);
/// assert!(!screening.is_active(1));
/// # Ok::<(), copra_core::CopraError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaScreening {
    affected: Vec<bool>,
}

impl DeltaScreening {
    /// Marks both endpoints of every deletion and insertion in `batch`.
    ///
    /// # Errors
    /// Returns [`crate::CopraError::InvalidEdgeReference`] when an edge
    /// endpoint lies outside `graph.span()`.
    pub fn detect<G: Graph>(graph: &G, batch: &EdgeBatch) -> Result<Self> {
        let affected = mark_endpoints(graph.span(), batch)?;
        let screening = Self { affected };
        debug!(
            affected = screening.affected_count(),
            deletions = batch.deletions().len(),
            insertions = batch.insertions().len(),
            "delta screening marked affected vertices"
        );
        Ok(screening)
    }

    /// Returns the affected vertex ids in ascending order.
    #[must_use]
    pub fn affected(&self) -> Vec<VertexId> {
        flagged(&self.affected)
    }

    /// Returns how many ids are affected.
    #[must_use]
    pub fn affected_count(&self) -> usize {
        self.affected.iter().filter(|&&flag| flag).count()
    }
}

impl ActivitySchedule for DeltaScreening {
    fn is_active(&self, vertex: VertexId) -> bool {
        self.affected.get(vertex).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdjacencyGraph, CopraError};

    #[test]
    fn single_edge_marks_exactly_its_endpoints() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let batch = EdgeBatch::new(vec![(1, 2)], vec![]);
        let screening = DeltaScreening::detect(&graph, &batch).expect("batch is valid");
        assert_eq!(screening.affected(), vec![1, 2]);
        assert_eq!(screening.affected_count(), 2);
    }

    #[test]
    fn activity_does_not_change_between_rounds() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0)]);
        let batch = EdgeBatch::new(vec![], vec![(0, 2, 1.0)]);
        let mut screening = DeltaScreening::detect(&graph, &batch).expect("batch is valid");
        screening.on_changed(0);
        screening.advance();
        assert_eq!(screening.affected(), vec![0, 2]);
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let batch = EdgeBatch::new(vec![], vec![(1, 4, 1.0)]);
        let err = DeltaScreening::detect(&graph, &batch).expect_err("edge must be rejected");
        assert!(matches!(
            err,
            CopraError::InvalidEdgeReference { target_vertex: 4, span: 2, .. }
        ));
    }
}
