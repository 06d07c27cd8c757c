//! Run orchestration for COPRA community detection.
//!
//! Provides the [`Copra`] entry points and the convergence loop shared by
//! full and incremental runs.

use std::{
    mem,
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument, warn};

use crate::{
    ActivitySchedule, AllActive, DeltaScreening, EdgeBatch, ExecutionContext, Frontier, Graph,
    LabelSet, Result,
    engine::{ChooserParams, RoundInputs, ScratchPool, initialize, move_round, seed_from_prior},
    result::{CopraResult, Membership, RoundStats},
    weights::vertex_weights,
};

/// Overlapping community detection engine.
///
/// A run starts from the given label sets, relabels the scheduled vertices in
/// synchronous rounds, and stops once the fraction of vertices whose
/// dominant community changed is at most the tolerance, or when the
/// iteration cap is reached.
///
/// # Examples
/// ```
/// use copra_core::{AdjacencyGraph, CopraBuilder, ExecutionContext};
///
/// let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
/// let copra = CopraBuilder::new().with_max_labels(1).build()?;
/// let result = copra.run(&graph, &ExecutionContext::new(2)?)?;
/// assert!(result.converged());
/// assert_eq!(result.membership().community_count(), 1);
/// # Ok::<(), copra_core::CopraError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Copra {
    max_labels: NonZeroUsize,
    tolerance: f64,
    max_iterations: NonZeroUsize,
    repeat: NonZeroUsize,
}

impl Copra {
    pub(crate) fn new(
        max_labels: NonZeroUsize,
        tolerance: f64,
        max_iterations: NonZeroUsize,
        repeat: NonZeroUsize,
    ) -> Self {
        Self {
            max_labels,
            tolerance,
            max_iterations,
            repeat,
        }
    }

    /// Returns the maximum number of labels per vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_labels(&self) -> NonZeroUsize { self.max_labels }

    /// Returns the changed-fraction tolerance.
    #[must_use]
    #[rustfmt::skip]
    pub fn tolerance(&self) -> f64 { self.tolerance }

    /// Returns the iteration cap.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_iterations(&self) -> NonZeroUsize { self.max_iterations }

    /// Returns how many timed repetitions each entry point performs.
    #[must_use]
    #[rustfmt::skip]
    pub fn repeat(&self) -> NonZeroUsize { self.repeat }

    /// Detects communities from scratch, starting with one community per
    /// live vertex.
    ///
    /// An empty graph yields an empty membership after zero rounds.
    ///
    /// # Errors
    /// Returns [`crate::CopraError::LockPoisoned`] when a worker panicked
    /// while holding scratch space, and in debug builds
    /// [`crate::CopraError::InconsistentLabelSet`] when a relabelled set
    /// breaks its invariants.
    #[instrument(
        name = "copra.run",
        err,
        skip(self, graph, context),
        fields(
            order = graph.order(),
            span = graph.span(),
            max_labels = self.max_labels.get(),
            tolerance = self.tolerance,
            workers = context.workers(),
        ),
    )]
    pub fn run<G: Graph>(&self, graph: &G, context: &ExecutionContext) -> Result<CopraResult> {
        self.repeated(|| self.converge(graph, initialize(graph), AllActive, context))
    }

    /// Updates a prior result after `batch`, relabelling only the endpoints
    /// of its edges.
    ///
    /// `graph` must already include the batch. `prior` holds the label sets
    /// of the previous result; it may be shorter than the current span, in
    /// which case newly live vertices start in their own community.
    ///
    /// # Errors
    /// Returns [`crate::CopraError::InvalidEdgeReference`] when a batch edge
    /// lies outside the graph, [`crate::CopraError::PriorSpanMismatch`] when
    /// `prior` covers more ids than the graph,
    /// [`crate::CopraError::InconsistentLabelSet`] when a live prior set
    /// exceeds the label cap, breaks its invariants, or names a community
    /// outside the graph, plus the errors of [`Copra::run`].
    #[instrument(
        name = "copra.delta_screening",
        err,
        skip(self, graph, batch, prior, context),
        fields(
            order = graph.order(),
            span = graph.span(),
            deletions = batch.deletions().len(),
            insertions = batch.insertions().len(),
            max_labels = self.max_labels.get(),
            tolerance = self.tolerance,
            workers = context.workers(),
        ),
    )]
    pub fn run_delta_screening<G: Graph>(
        &self,
        graph: &G,
        batch: &EdgeBatch,
        prior: &[LabelSet],
        context: &ExecutionContext,
    ) -> Result<CopraResult> {
        self.repeated(|| {
            let screening = DeltaScreening::detect(graph, batch)?;
            let labels = seed_from_prior(graph, prior.to_vec(), self.max_labels.get())?;
            self.converge(graph, labels, screening, context)
        })
    }

    /// Updates a prior result after `batch`, letting relabelling spread from
    /// the batch endpoints to neighbours of every vertex that changes.
    ///
    /// Takes the same inputs as [`Copra::run_delta_screening`].
    ///
    /// # Errors
    /// Same as [`Copra::run_delta_screening`].
    #[instrument(
        name = "copra.frontier",
        err,
        skip(self, graph, batch, prior, context),
        fields(
            order = graph.order(),
            span = graph.span(),
            deletions = batch.deletions().len(),
            insertions = batch.insertions().len(),
            max_labels = self.max_labels.get(),
            tolerance = self.tolerance,
            workers = context.workers(),
        ),
    )]
    pub fn run_frontier<G: Graph>(
        &self,
        graph: &G,
        batch: &EdgeBatch,
        prior: &[LabelSet],
        context: &ExecutionContext,
    ) -> Result<CopraResult> {
        self.repeated(|| {
            let frontier = Frontier::detect(graph, batch)?;
            let labels = seed_from_prior(graph, prior.to_vec(), self.max_labels.get())?;
            self.converge(graph, labels, frontier, context)
        })
    }

    /// Runs `once` `repeat` times, keeping the last result and the mean
    /// wall time.
    fn repeated<F>(&self, mut once: F) -> Result<CopraResult>
    where
        F: FnMut() -> Result<CopraResult>,
    {
        let started = Instant::now();
        let mut result = once()?;
        let mut total = started.elapsed();
        for _ in 1..self.repeat.get() {
            let started = Instant::now();
            result = once()?;
            total += started.elapsed();
        }
        result.elapsed = total.div_f64(self.repeat.get() as f64);
        Ok(result)
    }

    fn converge<G, S>(
        &self,
        graph: &G,
        labels: Vec<LabelSet>,
        mut schedule: S,
        context: &ExecutionContext,
    ) -> Result<CopraResult>
    where
        G: Graph,
        S: ActivitySchedule,
    {
        let order = graph.order();
        if order == 0 {
            info!("graph has no vertices, nothing to label");
            return Ok(Self::finish(labels, Vec::new(), true));
        }

        // Only the rounds run on the pool; events are emitted from the caller.
        let weights = context.install(|| vertex_weights(graph));
        let scratch = ScratchPool::new(context.workers(), graph.span());
        let params = ChooserParams::new(self.max_labels.get());
        let mut current = labels;
        let mut next = current.clone();
        let mut rounds = Vec::with_capacity(self.max_iterations.get());
        let mut converged = false;

        for round in 1..=self.max_iterations.get() {
            let inputs = RoundInputs {
                graph,
                weights: &weights,
                scratch: &scratch,
                params,
            };
            let tally = context.install(|| {
                move_round(
                    inputs,
                    &current,
                    &mut next,
                    |vertex| schedule.is_active(vertex),
                    |vertex| schedule.on_changed(vertex),
                )
            })?;
            mem::swap(&mut current, &mut next);
            schedule.advance();

            let fraction = tally.changed as f64 / order as f64;
            debug!(
                round,
                active = tally.active,
                changed = tally.changed,
                fraction,
                "round completed"
            );
            rounds.push(RoundStats::new(round, tally.active, tally.changed));
            if fraction <= self.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            info!(iterations = rounds.len(), converged, "labels settled");
        } else {
            warn!(
                iterations = rounds.len(),
                converged,
                tolerance = self.tolerance,
                "iteration cap reached before labels settled"
            );
        }
        Ok(Self::finish(current, rounds, converged))
    }

    fn finish(labels: Vec<LabelSet>, rounds: Vec<RoundStats>, converged: bool) -> CopraResult {
        CopraResult {
            membership: Membership::from_label_sets(&labels),
            label_sets: labels,
            rounds,
            converged,
            elapsed: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdjacencyGraph, CopraBuilder, CopraError};

    fn context() -> ExecutionContext {
        ExecutionContext::new(2).expect("pool must build")
    }

    #[test]
    fn empty_graph_returns_without_rounds() {
        let copra = CopraBuilder::new().build().expect("defaults are valid");
        let result = copra
            .run(&AdjacencyGraph::new(), &context())
            .expect("empty graph must succeed");
        assert_eq!(result.iterations(), 0);
        assert!(result.converged());
        assert!(result.membership().is_empty());
    }

    #[test]
    fn iteration_cap_stops_an_unsettled_run() {
        // A two-vertex path swaps labels every synchronous round.
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let copra = CopraBuilder::new()
            .with_max_labels(1)
            .with_max_iterations(3)
            .build()
            .expect("configuration is valid");
        let result = copra.run(&graph, &context()).expect("run must succeed");
        assert_eq!(result.iterations(), 3);
        assert!(!result.converged());
    }

    #[test]
    fn repeat_keeps_the_last_result() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let once = CopraBuilder::new().with_max_labels(1).build().expect("valid");
        let thrice = CopraBuilder::new()
            .with_max_labels(1)
            .with_repeat(3)
            .build()
            .expect("valid");
        let expected = once.run(&graph, &context()).expect("run must succeed");
        let actual = thrice.run(&graph, &context()).expect("run must succeed");
        assert_eq!(actual.label_sets(), expected.label_sets());
        assert_eq!(actual.rounds(), expected.rounds());
    }

    #[test]
    fn incremental_run_validates_batch_before_prior() {
        let graph = AdjacencyGraph::undirected([(0, 1, 1.0)]);
        let copra = CopraBuilder::new().build().expect("defaults are valid");
        let batch = EdgeBatch::new(vec![(0, 9)], vec![]);
        let prior = vec![LabelSet::singleton(0); 5];
        let err = copra
            .run_delta_screening(&graph, &batch, &prior, &context())
            .expect_err("batch must be rejected");
        assert!(matches!(err, CopraError::InvalidEdgeReference { .. }));
    }
}
