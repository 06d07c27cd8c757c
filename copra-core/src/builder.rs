//! Builder utilities for configuring COPRA runs.
//!
//! Collects the label cap, convergence tolerance, iteration cap and
//! repetition count, validating them before a [`Copra`] engine is built.

use std::num::NonZeroUsize;

use crate::{Result, copra::Copra, error::CopraError};

/// Configures and constructs [`Copra`] engines.
///
/// # Examples
/// ```
/// use copra_core::CopraBuilder;
///
/// let copra = CopraBuilder::new()
///     .with_max_labels(2)
///     .with_tolerance(0.01)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(copra.max_labels().get(), 2);
/// assert_eq!(copra.tolerance(), 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct CopraBuilder {
    max_labels: usize,
    tolerance: f64,
    max_iterations: usize,
    repeat: usize,
}

impl Default for CopraBuilder {
    fn default() -> Self {
        Self {
            max_labels: 4,
            tolerance: 0.05,
            max_iterations: 20,
            repeat: 1,
        }
    }
}

impl CopraBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use copra_core::CopraBuilder;
    ///
    /// let builder = CopraBuilder::new();
    /// assert_eq!(builder.max_labels(), 4);
    /// assert_eq!(builder.tolerance(), 0.05);
    /// assert_eq!(builder.max_iterations(), 20);
    /// assert_eq!(builder.repeat(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum number of labels a vertex may hold.
    #[must_use]
    pub fn with_max_labels(mut self, max_labels: usize) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Returns the configured label cap.
    #[must_use]
    pub fn max_labels(&self) -> usize {
        self.max_labels
    }

    /// Overrides the changed-fraction tolerance at which a run stops.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the configured tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Overrides the maximum number of rounds.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the configured iteration cap.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Overrides how many times each run is repeated for timing.
    ///
    /// # Examples
    /// ```
    /// use copra_core::CopraBuilder;
    ///
    /// let builder = CopraBuilder::new().with_repeat(5);
    /// assert_eq!(builder.repeat(), 5);
    /// ```
    #[must_use]
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Returns the configured repetition count.
    #[must_use]
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    /// Validates the configuration and constructs a [`Copra`] engine.
    ///
    /// # Errors
    /// Returns [`CopraError::InvalidMaxLabels`], [`CopraError::InvalidTolerance`],
    /// [`CopraError::InvalidMaxIterations`] or [`CopraError::InvalidRepeat`]
    /// for the first parameter out of range.
    ///
    /// # Examples
    /// ```
    /// use copra_core::{CopraBuilder, CopraError};
    ///
    /// let err = CopraBuilder::new().with_tolerance(0.0).build().unwrap_err();
    /// assert!(matches!(err, CopraError::InvalidTolerance { .. }));
    /// ```
    pub fn build(self) -> Result<Copra> {
        let max_labels = NonZeroUsize::new(self.max_labels).ok_or(CopraError::InvalidMaxLabels {
            got: self.max_labels,
        })?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance <= 1.0) {
            return Err(CopraError::InvalidTolerance {
                got: self.tolerance,
            });
        }
        let max_iterations =
            NonZeroUsize::new(self.max_iterations).ok_or(CopraError::InvalidMaxIterations {
                got: self.max_iterations,
            })?;
        let repeat = NonZeroUsize::new(self.repeat).ok_or(CopraError::InvalidRepeat {
            got: self.repeat,
        })?;

        Ok(Copra::new(max_labels, self.tolerance, max_iterations, repeat))
    }
}
