//! Benchmark parameter types.

use std::fmt;

/// Parameters for a static run benchmark.
#[derive(Clone, Debug)]
pub struct RunBenchParams {
    /// Number of vertices in the graph.
    pub vertex_count: usize,
    /// Label cap per vertex.
    pub max_labels: usize,
    /// Worker threads.
    pub workers: usize,
}

impl fmt::Display for RunBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},L={},w={}",
            self.vertex_count, self.max_labels, self.workers
        )
    }
}

/// Parameters for an incremental update benchmark.
#[derive(Clone, Debug)]
pub struct UpdateBenchParams {
    /// Number of vertices in the graph.
    pub vertex_count: usize,
    /// Edges edited by the batch.
    pub batch_size: usize,
}

impl fmt::Display for UpdateBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},batch={}", self.vertex_count, self.batch_size)
    }
}
