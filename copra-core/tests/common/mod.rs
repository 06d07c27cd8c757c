//! Graph fixtures and helpers shared by the integration suites.

use copra_core::{AdjacencyGraph, Copra, CopraBuilder, CopraResult, ExecutionContext, VertexId};

/// Tolerance low enough that a run only stops on a round without changes.
pub const SETTLE: f64 = 1e-9;

/// Three vertices joined by unit edges.
pub fn triangle() -> AdjacencyGraph {
    AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)])
}

/// Two disconnected unit triangles `{0, 1, 2}` and `{3, 4, 5}`.
pub fn two_triangles() -> AdjacencyGraph {
    AdjacencyGraph::undirected([
        (0, 1, 1.0),
        (1, 2, 1.0),
        (0, 2, 1.0),
        (3, 4, 1.0),
        (4, 5, 1.0),
        (3, 5, 1.0),
    ])
}

/// Builds an engine, panicking on invalid parameters.
pub fn engine(max_labels: usize, tolerance: f64) -> Copra {
    CopraBuilder::new()
        .with_max_labels(max_labels)
        .with_tolerance(tolerance)
        .build()
        .expect("test configuration must be valid")
}

/// Builds a pool with `workers` threads.
pub fn context(workers: usize) -> ExecutionContext {
    ExecutionContext::new(workers).expect("worker pool must build")
}

/// Dominant community of every id, `None` for gaps.
pub fn dominants(result: &CopraResult) -> Vec<Option<VertexId>> {
    result
        .label_sets()
        .iter()
        .map(|labels| labels.dominant())
        .collect()
}

/// Active-vertex counts per round.
pub fn active_counts(result: &CopraResult) -> Vec<usize> {
    result.rounds().iter().map(|round| round.active()).collect()
}

/// Changed-vertex counts per round.
pub fn changed_counts(result: &CopraResult) -> Vec<usize> {
    result.rounds().iter().map(|round| round.changed()).collect()
}
