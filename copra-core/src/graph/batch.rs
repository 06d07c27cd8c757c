//! Batches of edge edits for incremental runs.

use crate::{CopraError, Result};

use super::VertexId;

/// One batch of undirected edge deletions and weighted insertions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeBatch {
    deletions: Vec<(VertexId, VertexId)>,
    insertions: Vec<(VertexId, VertexId, f64)>,
}

impl EdgeBatch {
    /// Creates a batch from deleted pairs and inserted weighted triples.
    #[must_use]
    pub fn new(
        deletions: Vec<(VertexId, VertexId)>,
        insertions: Vec<(VertexId, VertexId, f64)>,
    ) -> Self {
        Self {
            deletions,
            insertions,
        }
    }

    /// Returns the deleted edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn deletions(&self) -> &[(VertexId, VertexId)] { &self.deletions }

    /// Returns the inserted edges with their weights.
    #[must_use]
    #[rustfmt::skip]
    pub fn insertions(&self) -> &[(VertexId, VertexId, f64)] { &self.insertions }

    /// Returns whether the batch edits nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty()
    }

    /// Iterates over the endpoints of every edited edge, deletions first.
    pub fn endpoints(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.deletions.iter().copied().chain(
            self.insertions
                .iter()
                .map(|&(source, target, _)| (source, target)),
        )
    }

    /// Checks every endpoint against the graph's id range.
    ///
    /// # Errors
    /// Returns [`CopraError::InvalidEdgeReference`] for the first edge with an
    /// endpoint at or beyond `span`.
    ///
    /// # Examples
    /// ```
    /// use copra_core::{CopraError, EdgeBatch};
    ///
    /// let batch = EdgeBatch::new(vec![(0, 1)], vec![(1, 5, 1.0)]);
    /// assert!(batch.validate(6).is_ok());
    /// assert!(matches!(
    ///     batch.validate(5),
    ///     Err(CopraError::InvalidEdgeReference { source_vertex: 1, target_vertex: 5, span: 5 })
    /// ));
    /// ```
    pub fn validate(&self, span: usize) -> Result<()> {
        match self
            .endpoints()
            .find(|&(source, target)| source >= span || target >= span)
        {
            Some((source_vertex, target_vertex)) => Err(CopraError::InvalidEdgeReference {
                source_vertex,
                target_vertex,
                span,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_cover_deletions_then_insertions() {
        let batch = EdgeBatch::new(vec![(0, 1)], vec![(2, 3, 1.0), (4, 5, 2.0)]);
        let endpoints: Vec<_> = batch.endpoints().collect();
        assert_eq!(endpoints, vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn validate_reports_first_offending_edge() {
        let batch = EdgeBatch::new(vec![(8, 0)], vec![(0, 9, 1.0)]);
        let err = batch.validate(4).expect_err("out-of-range edge must fail");
        assert_eq!(
            err,
            CopraError::InvalidEdgeReference {
                source_vertex: 8,
                target_vertex: 0,
                span: 4,
            }
        );
    }

    #[test]
    fn empty_batch_is_valid_for_empty_graph() {
        let batch = EdgeBatch::default();
        assert!(batch.is_empty());
        assert!(batch.validate(0).is_ok());
    }
}
