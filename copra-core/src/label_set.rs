//! Per-vertex multi-membership state.
//!
//! A [`LabelSet`] holds at most `L` distinct communities, each with a
//! belonging coefficient. Live vertices always hold a non-empty set whose
//! coefficients sum to one; non-live ids hold an empty set.

use std::cmp::Ordering;

use crate::{CopraError, Result, VertexId};

/// Absolute slack allowed when checking that coefficients sum to one.
pub const COEFFICIENT_SUM_TOLERANCE: f64 = 1e-6;

/// A community and the strength with which a vertex belongs to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label {
    community: VertexId,
    coefficient: f64,
}

impl Label {
    /// Creates a label.
    #[must_use]
    pub const fn new(community: VertexId, coefficient: f64) -> Self {
        Self {
            community,
            coefficient,
        }
    }

    /// Returns the community id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn community(&self) -> VertexId { self.community }

    /// Returns the belonging coefficient.
    #[must_use]
    #[rustfmt::skip]
    pub const fn coefficient(&self) -> f64 { self.coefficient }
}

/// Orders labels by coefficient descending, then community id ascending.
pub(crate) fn label_order(left: &Label, right: &Label) -> Ordering {
    right
        .coefficient
        .total_cmp(&left.coefficient)
        .then_with(|| left.community.cmp(&right.community))
}

/// Ordered set of labels belonging to one vertex.
///
/// # Examples
/// ```
/// use copra_core::LabelSet;
///
/// let labels = LabelSet::singleton(4);
/// assert_eq!(labels.dominant(), Some(4));
/// assert_eq!(labels.len(), 1);
/// assert!(labels.validate(4, 2).is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Returns the empty set held by non-live ids.
    #[must_use]
    pub const fn empty() -> Self {
        Self { labels: Vec::new() }
    }

    /// Returns `{(community, 1.0)}`.
    #[must_use]
    pub fn singleton(community: VertexId) -> Self {
        Self {
            labels: vec![Label::new(community, 1.0)],
        }
    }

    /// Builds a set from labels, ordering them by coefficient descending and
    /// community id ascending.
    ///
    /// No normalization is applied; use [`LabelSet::validate`] to check the
    /// result.
    #[must_use]
    pub fn from_labels(mut labels: Vec<Label>) -> Self {
        labels.sort_by(label_order);
        Self { labels }
    }

    /// Returns the highest-coefficient community, lowest id on ties.
    #[must_use]
    pub fn dominant(&self) -> Option<VertexId> {
        self.labels.first().map(Label::community)
    }

    /// Returns the coefficient held for `community`, if any.
    #[must_use]
    pub fn coefficient_of(&self, community: VertexId) -> Option<f64> {
        self.labels
            .iter()
            .find(|label| label.community == community)
            .map(Label::coefficient)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the set holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over the labels in dominance order.
    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }

    /// Returns the sum of all coefficients.
    #[must_use]
    pub fn coefficient_sum(&self) -> f64 {
        self.labels.iter().map(Label::coefficient).sum()
    }

    /// Checks the invariants of a live vertex's set against the label cap.
    ///
    /// # Errors
    /// Returns [`CopraError::InconsistentLabelSet`] when the set is empty,
    /// exceeds `max_labels`, repeats a community, is out of order, holds a
    /// coefficient outside `[0, 1]`, or does not sum to one within
    /// [`COEFFICIENT_SUM_TOLERANCE`].
    pub fn validate(&self, vertex: VertexId, max_labels: usize) -> Result<()> {
        let fail = |reason| Err(CopraError::InconsistentLabelSet { vertex, reason });
        if self.labels.is_empty() {
            return fail("live vertex holds no labels");
        }
        if self.labels.len() > max_labels {
            return fail("more labels than the configured cap");
        }
        if self
            .labels
            .iter()
            .any(|label| !(0.0..=1.0).contains(&label.coefficient))
        {
            return fail("coefficient outside [0, 1]");
        }
        if self
            .labels
            .windows(2)
            .any(|pair| label_order(&pair[0], &pair[1]) != Ordering::Less)
        {
            return fail("labels out of order or repeated");
        }
        let mut communities: Vec<VertexId> = self.labels.iter().map(Label::community).collect();
        communities.sort_unstable();
        if communities.windows(2).any(|pair| pair[0] == pair[1]) {
            return fail("community repeated");
        }
        if (self.coefficient_sum() - 1.0).abs() > COEFFICIENT_SUM_TOLERANCE {
            return fail("coefficients do not sum to 1");
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn from_labels_orders_by_coefficient_then_id() {
        let labels = LabelSet::from_labels(vec![
            Label::new(5, 0.25),
            Label::new(3, 0.5),
            Label::new(1, 0.25),
        ]);
        let order: Vec<_> = labels.iter().map(Label::community).collect();
        assert_eq!(order, vec![3, 1, 5]);
        assert_eq!(labels.dominant(), Some(3));
    }

    #[test]
    fn dominant_prefers_lowest_id_on_ties() {
        let labels = LabelSet::from_labels(vec![Label::new(9, 0.5), Label::new(2, 0.5)]);
        assert_eq!(labels.dominant(), Some(2));
    }

    #[test]
    fn empty_set_has_no_dominant() {
        assert_eq!(LabelSet::empty().dominant(), None);
    }

    #[rstest]
    #[case::empty(LabelSet::empty(), 2, "live vertex holds no labels")]
    #[case::over_cap(
        LabelSet::from_labels(vec![Label::new(0, 0.5), Label::new(1, 0.5)]),
        1,
        "more labels than the configured cap"
    )]
    #[case::repeated(
        LabelSet::from_labels(vec![Label::new(1, 0.5), Label::new(1, 0.5)]),
        2,
        "labels out of order or repeated"
    )]
    #[case::unnormalized(
        LabelSet::from_labels(vec![Label::new(0, 0.5), Label::new(1, 0.25)]),
        2,
        "coefficients do not sum to 1"
    )]
    #[case::negative(
        LabelSet::from_labels(vec![Label::new(0, 1.5), Label::new(1, -0.5)]),
        2,
        "coefficient outside [0, 1]"
    )]
    fn validate_rejects_broken_sets(
        #[case] labels: LabelSet,
        #[case] cap: usize,
        #[case] expected: &str,
    ) {
        let err = labels.validate(7, cap).expect_err("set must be rejected");
        match err {
            CopraError::InconsistentLabelSet { vertex, reason } => {
                assert_eq!(vertex, 7);
                assert_eq!(reason, expected);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_normalized_sets() {
        let labels = LabelSet::from_labels(vec![
            Label::new(0, 0.5),
            Label::new(1, 0.3),
            Label::new(2, 0.2),
        ]);
        assert!(labels.validate(0, 3).is_ok());
        assert_eq!(labels.coefficient_of(1), Some(0.3));
        assert_eq!(labels.coefficient_of(4), None);
    }
}
