//! Error types for the COPRA core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::VertexId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Returns the stable machine-readable representation of this code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!("Returns the stable [`", stringify!($CodeTy), "`] for this error.")]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant { .. } => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running [`crate::Copra`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CopraError {
    /// The label cap must admit at least one label per vertex.
    #[error("max_labels must be at least 1 (got {got})")]
    InvalidMaxLabels {
        /// The rejected label cap.
        got: usize,
    },
    /// The tolerance must be a finite value in `(0, 1]`.
    #[error("tolerance must lie in (0, 1] (got {got})")]
    InvalidTolerance {
        /// The rejected tolerance.
        got: f64,
    },
    /// At least one round must be allowed.
    #[error("max_iterations must be at least 1 (got {got})")]
    InvalidMaxIterations {
        /// The rejected iteration cap.
        got: usize,
    },
    /// At least one timed repetition must be requested.
    #[error("repeat must be at least 1 (got {got})")]
    InvalidRepeat {
        /// The rejected repetition count.
        got: usize,
    },
    /// An execution context needs at least one worker.
    #[error("worker count must be at least 1 (got {got})")]
    InvalidWorkerCount {
        /// The rejected worker count.
        got: usize,
    },
    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {message}")]
    ThreadPool {
        /// Message reported by the pool builder.
        message: String,
    },
    /// A batch edge references a vertex outside the graph's id range.
    #[error("edge ({source_vertex}, {target_vertex}) references a vertex outside span {span}")]
    InvalidEdgeReference {
        /// Source endpoint as supplied.
        source_vertex: VertexId,
        /// Target endpoint as supplied.
        target_vertex: VertexId,
        /// Exclusive upper bound on vertex ids.
        span: usize,
    },
    /// Prior label sets cover more ids than the current graph.
    #[error("prior label sets cover {prior} ids but the graph span is {span}")]
    PriorSpanMismatch {
        /// Number of prior label sets supplied.
        prior: usize,
        /// Exclusive upper bound on vertex ids.
        span: usize,
    },
    /// A label set broke its size, uniqueness, order, or normalization invariant.
    #[error("label set of vertex {vertex} is inconsistent: {reason}")]
    InconsistentLabelSet {
        /// Vertex owning the offending label set.
        vertex: VertexId,
        /// Which invariant was violated.
        reason: &'static str,
    },
    /// A synchronisation primitive became poisoned after a worker panic.
    #[error("lock for {resource} is poisoned")]
    LockPoisoned {
        /// Name of the poisoned resource.
        resource: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`CopraError`] variants.
    enum CopraErrorCode for CopraError {
        /// The label cap was zero.
        InvalidMaxLabels => InvalidMaxLabels => "COPRA_INVALID_MAX_LABELS",
        /// The tolerance was outside `(0, 1]`.
        InvalidTolerance => InvalidTolerance => "COPRA_INVALID_TOLERANCE",
        /// The iteration cap was zero.
        InvalidMaxIterations => InvalidMaxIterations => "COPRA_INVALID_MAX_ITERATIONS",
        /// The repetition count was zero.
        InvalidRepeat => InvalidRepeat => "COPRA_INVALID_REPEAT",
        /// The worker count was zero.
        InvalidWorkerCount => InvalidWorkerCount => "COPRA_INVALID_WORKER_COUNT",
        /// The worker pool could not be built.
        ThreadPool => ThreadPool => "COPRA_THREAD_POOL",
        /// A batch edge referenced a vertex outside the graph.
        InvalidEdgeReference => InvalidEdgeReference => "COPRA_INVALID_EDGE_REFERENCE",
        /// Prior label sets did not fit the graph.
        PriorSpanMismatch => PriorSpanMismatch => "COPRA_PRIOR_SPAN_MISMATCH",
        /// A label set broke its invariants.
        InconsistentLabelSet => InconsistentLabelSet => "COPRA_INCONSISTENT_LABEL_SET",
        /// A lock was poisoned.
        LockPoisoned => LockPoisoned => "COPRA_LOCK_POISONED",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, CopraError>;
