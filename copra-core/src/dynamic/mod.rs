//! Activity schedules deciding which vertices each round relabels.
//!
//! A full run relabels everything ([`AllActive`]). The incremental entry
//! points restrict work to vertices a batch of edge edits may have disturbed:
//! [`DeltaScreening`] fixes that set up front, while [`Frontier`] lets it
//! travel outward from vertices that keep changing.

mod delta_screening;
mod frontier;

pub use self::{delta_screening::DeltaScreening, frontier::Frontier};

use crate::{EdgeBatch, Result, VertexId};

/// Per-round activity predicate plus change observer.
///
/// [`ActivitySchedule::is_active`] and [`ActivitySchedule::on_changed`] are
/// called concurrently from every worker during a round;
/// [`ActivitySchedule::advance`] runs alone at the barrier between rounds.
pub trait ActivitySchedule: Send + Sync {
    /// Returns whether `vertex` is relabelled in the current round.
    fn is_active(&self, vertex: VertexId) -> bool;

    /// Observes that `vertex` changed its dominant community this round.
    fn on_changed(&self, _vertex: VertexId) {}

    /// Moves the schedule to the next round.
    fn advance(&mut self) {}
}

/// Schedule of a full run: every vertex, every round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllActive;

impl ActivitySchedule for AllActive {
    fn is_active(&self, _vertex: VertexId) -> bool {
        true
    }
}

/// Flags both endpoints of every edited edge over `[0, span)`.
fn mark_endpoints(span: usize, batch: &EdgeBatch) -> Result<Vec<bool>> {
    batch.validate(span)?;
    let mut flags = vec![false; span];
    for (source, target) in batch.endpoints() {
        for vertex in [source, target] {
            if let Some(flag) = flags.get_mut(vertex) {
                *flag = true;
            }
        }
    }
    Ok(flags)
}

fn flagged(flags: &[bool]) -> Vec<VertexId> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(vertex, &flag)| flag.then_some(vertex))
        .collect()
}
