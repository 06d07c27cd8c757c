//! Support library for the copra CLI binary.
//!
//! Exposes the command pipeline and the Matrix Market reader so doctests and
//! integration tests can exercise them without forking a subprocess.

pub mod cli;
pub mod logging;
pub mod matrix_market;
