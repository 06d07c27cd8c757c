//! Graph abstractions consumed by the label-propagation engine.
//!
//! The engine only reads graphs. [`Graph`] is the read-only surface it needs;
//! [`AdjacencyGraph`] is a simple owned implementation used by the CLI,
//! benchmarks and tests, and [`EdgeBatch`] describes one batch of edits for
//! the incremental entry points.

mod adjacency;
mod batch;

pub use self::{adjacency::AdjacencyGraph, batch::EdgeBatch};

/// Identifier of a vertex, and of the community named after it.
pub type VertexId = usize;

/// Read-only weighted graph over the id range `[0, span)`.
///
/// Ids inside the range need not all be live; [`Graph::has_vertex`] reports
/// which ones are.
///
/// # Examples
/// ```
/// use copra_core::{AdjacencyGraph, Graph};
///
/// let mut graph = AdjacencyGraph::with_span(3);
/// graph.add_vertex(0);
/// graph.add_vertex(2);
/// graph.add_edge(0, 2, 1.5);
///
/// assert_eq!(graph.order(), 2);
/// assert_eq!(graph.span(), 3);
/// assert!(!graph.has_vertex(1));
///
/// let mut total = 0.0;
/// graph.for_each_out_edge(0, |_, weight| total += weight);
/// assert_eq!(total, 1.5);
/// ```
pub trait Graph: Sync {
    /// Returns the number of live vertices.
    fn order(&self) -> usize;

    /// Returns the exclusive upper bound on vertex ids.
    fn span(&self) -> usize;

    /// Returns whether `vertex` is live.
    fn has_vertex(&self, vertex: VertexId) -> bool;

    /// Invokes `visit` with the target and weight of every out-edge of `vertex`.
    ///
    /// Non-live or out-of-range vertices have no out-edges.
    fn for_each_out_edge<F>(&self, vertex: VertexId, visit: F)
    where
        F: FnMut(VertexId, f64);

    /// Returns the number of out-edges of `vertex`.
    fn degree(&self, vertex: VertexId) -> usize {
        let mut degree = 0;
        self.for_each_out_edge(vertex, |_, _| degree += 1);
        degree
    }

    /// Iterates over the live vertex ids in ascending order.
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_
    where
        Self: Sized,
    {
        (0..self.span()).filter(move |&vertex| self.has_vertex(vertex))
    }
}
