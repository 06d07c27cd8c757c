//! Result types produced by COPRA runs.

use std::{collections::HashSet, time::Duration};

use crate::{Graph, LabelSet, VertexId};

/// Dominant community of every vertex, indexed by vertex id.
///
/// # Examples
/// ```
/// use copra_core::{LabelSet, Membership};
///
/// let membership = Membership::from_label_sets(&[
///     LabelSet::singleton(1),
///     LabelSet::empty(),
///     LabelSet::singleton(1),
/// ]);
/// assert_eq!(membership.get(0), Some(1));
/// assert_eq!(membership.get(1), None);
/// assert_eq!(membership.len(), 2);
/// assert_eq!(membership.community_count(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Membership {
    communities: Vec<Option<VertexId>>,
}

impl Membership {
    /// Reduces each label set to its dominant community.
    ///
    /// Empty sets, which belong to non-live ids, map to `None`.
    #[must_use]
    pub fn from_label_sets(labels: &[LabelSet]) -> Self {
        Self {
            communities: labels.iter().map(LabelSet::dominant).collect(),
        }
    }

    /// Places every live vertex of `graph` in its own community.
    #[must_use]
    pub fn singletons<G: Graph>(graph: &G) -> Self {
        Self {
            communities: (0..graph.span())
                .map(|vertex| graph.has_vertex(vertex).then_some(vertex))
                .collect(),
        }
    }

    /// Returns the community of `vertex`, if it is live.
    #[must_use]
    pub fn get(&self, vertex: VertexId) -> Option<VertexId> {
        self.communities.get(vertex).copied().flatten()
    }

    /// Iterates over `(vertex, community)` pairs of live vertices.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.communities
            .iter()
            .enumerate()
            .filter_map(|(vertex, community)| community.map(|id| (vertex, id)))
    }

    /// Returns how many vertices have a community.
    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.iter().flatten().count()
    }

    /// Returns whether no vertex has a community.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct communities.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.communities
            .iter()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Activity and change counts of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundStats {
    round: usize,
    active: usize,
    changed: usize,
}

impl RoundStats {
    pub(crate) const fn new(round: usize, active: usize, changed: usize) -> Self {
        Self {
            round,
            active,
            changed,
        }
    }

    /// Returns the 1-based round number.
    #[must_use]
    #[rustfmt::skip]
    pub const fn round(&self) -> usize { self.round }

    /// Returns how many live vertices were relabelled.
    #[must_use]
    #[rustfmt::skip]
    pub const fn active(&self) -> usize { self.active }

    /// Returns how many vertices changed their dominant community.
    #[must_use]
    #[rustfmt::skip]
    pub const fn changed(&self) -> usize { self.changed }
}

/// Output of a [`crate::Copra`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct CopraResult {
    pub(crate) membership: Membership,
    pub(crate) label_sets: Vec<LabelSet>,
    pub(crate) rounds: Vec<RoundStats>,
    pub(crate) converged: bool,
    pub(crate) elapsed: Duration,
}

impl CopraResult {
    /// Returns the dominant community of every vertex.
    #[must_use]
    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Returns the final label sets, indexed by vertex id.
    ///
    /// Pass these to an incremental entry point as the prior state.
    #[must_use]
    pub fn label_sets(&self) -> &[LabelSet] {
        &self.label_sets
    }

    /// Consumes the result, returning the final label sets.
    #[must_use]
    pub fn into_label_sets(self) -> Vec<LabelSet> {
        self.label_sets
    }

    /// Returns the number of rounds executed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.rounds.len()
    }

    /// Returns per-round statistics in execution order.
    #[must_use]
    pub fn rounds(&self) -> &[RoundStats] {
        &self.rounds
    }

    /// Returns whether the changed fraction reached the tolerance before the
    /// iteration cap.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the mean wall time of one repetition.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
