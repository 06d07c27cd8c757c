//! COPRA overlapping community detection.
//!
//! Vertices carry up to `max_labels` weighted community labels and adopt
//! the labels their neighbours vote for, round after round, until few
//! dominant labels still change. Full runs start from singleton
//! communities; the incremental entry points resume from a prior result
//! after a batch of edge edits.

mod builder;
mod context;
mod copra;
mod dynamic;
mod engine;
mod error;
mod graph;
mod label_set;
mod quality;
mod result;
mod weights;

pub use crate::{
    builder::CopraBuilder,
    context::ExecutionContext,
    copra::Copra,
    dynamic::{ActivitySchedule, AllActive, DeltaScreening, Frontier},
    error::{CopraError, CopraErrorCode, Result},
    graph::{AdjacencyGraph, EdgeBatch, Graph, VertexId},
    label_set::{COEFFICIENT_SUM_TOLERANCE, Label, LabelSet},
    quality::modularity,
    result::{CopraResult, Membership, RoundStats},
    weights::vertex_weights,
};
