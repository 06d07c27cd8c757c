//! Seeded planted-partition graphs for benchmarking.
//!
//! [`PlantedPartition`] places `communities * community_size` vertices into
//! equally sized blocks and connects each pair inside a block with
//! probability `intra_probability` and each pair across blocks with
//! probability `inter_probability`. Every edge has unit weight and is
//! stored in both directions.

use copra_core::{AdjacencyGraph, EdgeBatch, Graph, VertexId};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested community count was zero.
    #[error("community count must be greater than zero")]
    ZeroCommunities,
    /// The requested community size was zero.
    #[error("community size must be greater than zero")]
    ZeroCommunitySize,
    /// A probability fell outside `[0, 1]`.
    #[error("{name} must lie in [0, 1] (got {value})")]
    InvalidProbability {
        /// Parameter that was out of range.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Configuration for planted-partition generation.
#[derive(Clone, Debug)]
pub struct PlantedPartitionConfig {
    /// Number of planted communities.
    pub communities: usize,
    /// Vertices per community.
    pub community_size: usize,
    /// Edge probability between two vertices of the same community.
    pub intra_probability: f64,
    /// Edge probability between vertices of different communities.
    pub inter_probability: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A generated graph together with its planted communities.
///
/// # Examples
///
/// ```
/// use copra_benches::source::{PlantedPartition, PlantedPartitionConfig};
///
/// let config = PlantedPartitionConfig {
///     communities: 3,
///     community_size: 4,
///     intra_probability: 1.0,
///     inter_probability: 0.0,
///     seed: 7,
/// };
/// let planted = PlantedPartition::generate(&config).expect("valid config");
/// assert_eq!(planted.vertex_count(), 12);
/// assert_eq!(planted.community_of(5), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct PlantedPartition {
    graph: AdjacencyGraph,
    community_size: usize,
    vertex_count: usize,
}

impl PlantedPartition {
    /// Generates a graph from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError`] when either size is zero or a probability
    /// is not a finite value in `[0, 1]`.
    pub fn generate(config: &PlantedPartitionConfig) -> Result<Self, SyntheticError> {
        if config.communities == 0 {
            return Err(SyntheticError::ZeroCommunities);
        }
        if config.community_size == 0 {
            return Err(SyntheticError::ZeroCommunitySize);
        }
        check_probability("intra_probability", config.intra_probability)?;
        check_probability("inter_probability", config.inter_probability)?;

        let vertex_count = config.communities.saturating_mul(config.community_size);
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut graph = AdjacencyGraph::with_span(vertex_count);
        for vertex in 0..vertex_count {
            graph.add_vertex(vertex);
        }
        for source in 0..vertex_count {
            for target in (source + 1)..vertex_count {
                let probability =
                    if source / config.community_size == target / config.community_size {
                        config.intra_probability
                    } else {
                        config.inter_probability
                    };
                if rng.gen_bool(probability) {
                    graph.add_edge(source, target, 1.0);
                    graph.add_edge(target, source, 1.0);
                }
            }
        }

        Ok(Self {
            graph,
            community_size: config.community_size,
            vertex_count,
        })
    }

    /// Returns the generated graph.
    #[must_use]
    pub const fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// Consumes the partition and returns the graph.
    #[must_use]
    pub fn into_graph(self) -> AdjacencyGraph {
        self.graph
    }

    /// Returns the number of generated vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the planted community of `vertex`.
    #[must_use]
    pub const fn community_of(&self, vertex: VertexId) -> Option<usize> {
        if vertex < self.vertex_count {
            Some(vertex / self.community_size)
        } else {
            None
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), SyntheticError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SyntheticError::InvalidProbability { name, value })
    }
}

/// Draws a batch of `size` edits against `graph` and applies it.
///
/// Roughly half the edits delete an existing edge; the rest insert a unit
/// edge between two distinct random vertices. Deletions are skipped for
/// vertices without edges, so the batch may hold fewer than `size` edits.
pub fn apply_random_batch(graph: &mut AdjacencyGraph, size: usize, seed: u64) -> EdgeBatch {
    let span = graph.span();
    if span < 2 {
        return EdgeBatch::default();
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut deletions = Vec::new();
    let mut insertions = Vec::new();
    for edit in 0..size {
        if edit % 2 == 0 {
            let source = rng.gen_range(0..span);
            let edges = graph.out_edges(source);
            if !edges.is_empty() {
                let index = rng.gen_range(0..edges.len());
                if let Some(&(target, _)) = edges.get(index) {
                    deletions.push((source, target));
                }
            }
        } else {
            let source = rng.gen_range(0..span);
            let offset = rng.gen_range(1..span);
            insertions.push((source, (source + offset) % span, 1.0));
        }
    }

    let batch = EdgeBatch::new(deletions, insertions);
    graph.apply_batch(&batch);
    batch
}
