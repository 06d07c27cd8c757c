//! Worker-private scan buffers.
//!
//! Each worker of the execution context owns one [`Scratch`] slot for the
//! whole run. Slots are selected by Rayon's thread index, so a lock is only
//! ever taken by its own worker and never contends.

use std::sync::{Mutex, MutexGuard};

use rayon::current_thread_index;

use crate::{CopraError, Result, VertexId};

/// Vote accumulator for the vertex currently being relabelled.
#[derive(Debug)]
pub(crate) struct Scratch {
    touched: Vec<VertexId>,
    votes: Vec<f64>,
}

impl Scratch {
    fn new(span: usize) -> Self {
        Self {
            touched: Vec::new(),
            votes: vec![0.0; span],
        }
    }

    /// Zeroes the entries touched by the previous vertex.
    pub(crate) fn clear(&mut self) {
        for &community in &self.touched {
            if let Some(vote) = self.votes.get_mut(community) {
                *vote = 0.0;
            }
        }
        self.touched.clear();
    }

    /// Adds `weight` to the vote for `community`.
    ///
    /// Non-positive contributions are dropped, so a zero vote always means
    /// "not yet touched".
    pub(crate) fn add(&mut self, community: VertexId, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        let Some(vote) = self.votes.get_mut(community) else {
            return;
        };
        if *vote == 0.0 {
            self.touched.push(community);
        }
        *vote += weight;
    }

    /// Returns the communities touched since the last [`Scratch::clear`].
    pub(crate) fn touched(&self) -> &[VertexId] {
        &self.touched
    }

    /// Returns the accumulated vote for `community`.
    pub(crate) fn vote(&self, community: VertexId) -> f64 {
        self.votes.get(community).copied().unwrap_or(0.0)
    }
}

/// Fixed pool of scratch slots, one per worker.
#[derive(Debug)]
pub(crate) struct ScratchPool {
    slots: Vec<Mutex<Scratch>>,
}

impl ScratchPool {
    /// Allocates `workers` slots sized for ids in `[0, span)`.
    pub(crate) fn new(workers: usize, span: usize) -> Self {
        Self {
            slots: (0..workers.max(1))
                .map(|_| Mutex::new(Scratch::new(span)))
                .collect(),
        }
    }

    /// Locks the slot owned by the calling worker.
    ///
    /// Calls from outside the pool fall back to slot zero.
    pub(crate) fn acquire(&self) -> Result<MutexGuard<'_, Scratch>> {
        let index = current_thread_index().unwrap_or(0);
        let slot = self
            .slots
            .get(index)
            .or_else(|| self.slots.first())
            .ok_or(CopraError::LockPoisoned {
                resource: "scratch pool",
            })?;
        slot.lock().map_err(|_| CopraError::LockPoisoned {
            resource: "scratch slot",
        })
    }
}
