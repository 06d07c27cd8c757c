//! Explicit execution context for parallel runs.

use std::{num::NonZeroUsize, sync::Arc, thread};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{CopraError, Result};

/// Worker pool that every round of a run executes on.
///
/// The context is passed to each entry point instead of configuring a
/// process-wide pool, so runs with different worker counts can coexist.
///
/// # Examples
/// ```
/// use copra_core::ExecutionContext;
///
/// let context = ExecutionContext::new(2)?;
/// assert_eq!(context.workers(), 2);
/// assert_eq!(ExecutionContext::sequential()?.workers(), 1);
/// # Ok::<(), copra_core::CopraError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    pool: Arc<ThreadPool>,
    workers: NonZeroUsize,
}

impl ExecutionContext {
    /// Builds a dedicated pool of `workers` threads.
    ///
    /// # Errors
    /// Returns [`CopraError::InvalidWorkerCount`] for zero workers and
    /// [`CopraError::ThreadPool`] when the threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self> {
        let count =
            NonZeroUsize::new(workers).ok_or(CopraError::InvalidWorkerCount { got: workers })?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(count.get())
            .thread_name(|index| format!("copra-worker-{index}"))
            .build()
            .map_err(|error| CopraError::ThreadPool {
                message: error.to_string(),
            })?;
        Ok(Self {
            pool: Arc::new(pool),
            workers: count,
        })
    }

    /// Builds a single-worker context.
    ///
    /// # Errors
    /// Returns [`CopraError::ThreadPool`] when the worker cannot be spawned.
    pub fn sequential() -> Result<Self> {
        Self::new(1)
    }

    /// Builds a context sized to the machine's available parallelism.
    ///
    /// # Errors
    /// Returns [`CopraError::ThreadPool`] when the workers cannot be spawned.
    pub fn available() -> Result<Self> {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self::new(workers)
    }

    /// Returns the number of worker threads.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Runs `op` inside the worker pool.
    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_are_rejected() {
        let err = ExecutionContext::new(0).expect_err("zero workers must fail");
        assert_eq!(err, CopraError::InvalidWorkerCount { got: 0 });
    }

    #[test]
    fn install_runs_on_the_dedicated_pool() {
        let context = ExecutionContext::new(3).expect("pool must build");
        let threads = context.install(rayon::current_num_threads);
        assert_eq!(threads, 3);
    }
}
