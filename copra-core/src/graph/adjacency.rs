//! Owned adjacency-list graph.

use std::collections::TryReserveError;

use super::{EdgeBatch, Graph, VertexId};

/// Directed weighted graph stored as one optional adjacency list per id.
///
/// A `None` slot marks a non-live id, so the graph can carry gaps in its id
/// range. Edges are kept in insertion order; adding an edge that already
/// exists replaces its weight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph {
    slots: Vec<Option<Vec<(VertexId, f64)>>>,
    order: usize,
    edges: usize,
}

impl AdjacencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with `span` non-live ids reserved.
    #[must_use]
    pub fn with_span(span: usize) -> Self {
        Self {
            slots: vec![None; span],
            order: 0,
            edges: 0,
        }
    }

    /// Like [`AdjacencyGraph::with_span`], but reports an allocation failure
    /// instead of aborting.
    ///
    /// # Errors
    /// Returns [`TryReserveError`] when `span` slots cannot be allocated.
    pub fn try_with_span(span: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(span)?;
        slots.resize(span, None);
        Ok(Self {
            slots,
            order: 0,
            edges: 0,
        })
    }

    /// Builds a graph from weighted directed edges, making every endpoint live.
    ///
    /// # Examples
    /// ```
    /// use copra_core::{AdjacencyGraph, Graph};
    ///
    /// let graph = AdjacencyGraph::from_edges([(0, 1, 1.0), (1, 2, 2.0)]);
    /// assert_eq!(graph.order(), 3);
    /// assert_eq!(graph.edge_count(), 2);
    /// ```
    #[must_use]
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64)>,
    {
        let mut graph = Self::new();
        for (source, target, weight) in edges {
            graph.add_edge(source, target, weight);
        }
        graph
    }

    /// Builds an undirected graph: every edge is stored in both directions.
    ///
    /// # Examples
    /// ```
    /// use copra_core::{AdjacencyGraph, Graph};
    ///
    /// let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
    /// assert_eq!(graph.degree(0), 1);
    /// assert_eq!(graph.degree(1), 1);
    /// ```
    #[must_use]
    pub fn undirected<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64)>,
    {
        let mut graph = Self::from_edges(edges);
        graph.symmetrize();
        graph
    }

    /// Marks `vertex` live, growing the id range if needed.
    pub fn add_vertex(&mut self, vertex: VertexId) {
        if vertex >= self.slots.len() {
            self.slots.resize(vertex + 1, None);
        }
        if let Some(slot) = self.slots.get_mut(vertex) {
            if slot.is_none() {
                *slot = Some(Vec::new());
                self.order += 1;
            }
        }
    }

    /// Adds the directed edge `source -> target`, or replaces its weight.
    ///
    /// Both endpoints become live.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, weight: f64) {
        self.add_vertex(source);
        self.add_vertex(target);
        let Some(Some(edges)) = self.slots.get_mut(source) else {
            return;
        };
        if let Some(existing) = edges.iter_mut().find(|(to, _)| *to == target) {
            existing.1 = weight;
        } else {
            edges.push((target, weight));
            self.edges += 1;
        }
    }

    /// Removes the directed edge `source -> target`; returns whether it existed.
    pub fn remove_edge(&mut self, source: VertexId, target: VertexId) -> bool {
        let Some(Some(edges)) = self.slots.get_mut(source) else {
            return false;
        };
        let Some(position) = edges.iter().position(|(to, _)| *to == target) else {
            return false;
        };
        edges.remove(position);
        self.edges -= 1;
        true
    }

    /// Returns the weight of `source -> target`, if present.
    #[must_use]
    pub fn edge_weight(&self, source: VertexId, target: VertexId) -> Option<f64> {
        self.out_edges(source)
            .iter()
            .find(|(to, _)| *to == target)
            .map(|&(_, weight)| weight)
    }

    /// Returns the out-edges of `vertex` as `(target, weight)` pairs.
    #[must_use]
    pub fn out_edges(&self, vertex: VertexId) -> &[(VertexId, f64)] {
        self.slots
            .get(vertex)
            .and_then(Option::as_deref)
            .unwrap_or(&[])
    }

    /// Adds every missing reverse edge with the weight of its forward edge.
    pub fn symmetrize(&mut self) {
        let missing: Vec<(VertexId, VertexId, f64)> = self
            .slots
            .iter()
            .enumerate()
            .flat_map(|(source, slot)| {
                slot.iter()
                    .flatten()
                    .map(move |&(target, weight)| (target, source, weight))
            })
            .filter(|&(source, target, _)| self.edge_weight(source, target).is_none())
            .collect();
        for (source, target, weight) in missing {
            self.add_edge(source, target, weight);
        }
    }

    /// Applies `batch` as undirected edits: deletions first, then insertions.
    ///
    /// # Examples
    /// ```
    /// use copra_core::{AdjacencyGraph, EdgeBatch};
    ///
    /// let mut graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0)]);
    /// let batch = EdgeBatch::new(vec![(0, 1)], vec![(0, 2, 3.0)]);
    /// graph.apply_batch(&batch);
    /// assert_eq!(graph.edge_weight(0, 1), None);
    /// assert_eq!(graph.edge_weight(2, 0), Some(3.0));
    /// ```
    pub fn apply_batch(&mut self, batch: &EdgeBatch) {
        for &(source, target) in batch.deletions() {
            self.remove_edge(source, target);
            self.remove_edge(target, source);
        }
        for &(source, target, weight) in batch.insertions() {
            self.add_edge(source, target, weight);
            self.add_edge(target, source, weight);
        }
    }

    /// Returns the number of stored directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Returns the sum of all directed edge weights.
    #[must_use]
    pub fn total_edge_weight(&self) -> f64 {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .map(|&(_, weight)| weight)
            .sum()
    }
}

impl Graph for AdjacencyGraph {
    fn order(&self) -> usize {
        self.order
    }

    fn span(&self) -> usize {
        self.slots.len()
    }

    fn has_vertex(&self, vertex: VertexId) -> bool {
        matches!(self.slots.get(vertex), Some(Some(_)))
    }

    fn for_each_out_edge<F>(&self, vertex: VertexId, mut visit: F)
    where
        F: FnMut(VertexId, f64),
    {
        for &(target, weight) in self.out_edges(vertex) {
            visit(target, weight);
        }
    }

    fn degree(&self, vertex: VertexId) -> usize {
        self.out_edges(vertex).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn gaps_are_not_live() {
        let mut graph = AdjacencyGraph::with_span(4);
        graph.add_vertex(1);
        graph.add_vertex(3);
        assert_eq!(graph.order(), 2);
        assert_eq!(graph.span(), 4);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn try_with_span_rejects_impossible_sizes() {
        assert!(AdjacencyGraph::try_with_span(usize::MAX).is_err());
        let graph = AdjacencyGraph::try_with_span(4).expect("small span must allocate");
        assert_eq!(graph.span(), 4);
        assert_eq!(graph.order(), 0);
    }

    #[test]
    fn add_vertex_is_idempotent() {
        let mut graph = AdjacencyGraph::new();
        graph.add_vertex(2);
        graph.add_vertex(2);
        assert_eq!(graph.order(), 1);
        assert_eq!(graph.span(), 3);
    }

    #[test]
    fn add_edge_replaces_existing_weight() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(0, 1, 4.0);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(0, 1), Some(4.0));
    }

    #[rstest]
    #[case::present(0, 1, true)]
    #[case::reverse_absent(1, 0, false)]
    #[case::unknown_vertex(7, 0, false)]
    fn remove_edge_reports_presence(
        #[case] source: VertexId,
        #[case] target: VertexId,
        #[case] expected: bool,
    ) {
        let mut graph = AdjacencyGraph::from_edges([(0, 1, 1.0)]);
        assert_eq!(graph.remove_edge(source, target), expected);
    }

    #[test]
    fn symmetrize_copies_weights_without_duplicating() {
        let mut graph = AdjacencyGraph::from_edges([(0, 1, 2.0), (1, 0, 5.0), (1, 2, 3.0)]);
        graph.symmetrize();
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edge_weight(0, 1), Some(2.0));
        assert_eq!(graph.edge_weight(1, 0), Some(5.0));
        assert_eq!(graph.edge_weight(2, 1), Some(3.0));
        assert_eq!(graph.total_edge_weight(), 13.0);
    }

    #[test]
    fn out_of_range_vertices_have_no_edges() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let mut visited = 0;
        graph.for_each_out_edge(9, |_, _| visited += 1);
        assert_eq!(visited, 0);
        assert_eq!(graph.degree(9), 0);
    }
}
