//! Benchmark setup error type.

use copra_core::CopraError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic graph generation failed.
    #[error("synthetic graph generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Engine configuration or execution failed.
    #[error("copra operation failed: {0}")]
    Copra(#[from] CopraError),
}
