//! Benchmark support crate for copra.
//!
//! Provides seeded planted-partition graphs and edit batches used by the
//! Criterion benchmarks for static runs and incremental updates.

pub mod error;
pub mod params;
pub mod source;
