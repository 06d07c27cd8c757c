//! Command-line interface orchestration for copra.
//!
//! `run` detects communities in one Matrix Market graph and reports the
//! result; `sweep` times sequential and parallel runs across a grid of
//! tolerances and label caps.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GraphArgs, GraphInfo, RunCommand, RunSummary,
    SWEEP_LABEL_CAPS, SWEEP_TOLERANCE_FACTORS, SweepCommand, SweepRow, SweepSummary, SweepVariant,
    render_summary, run_cli,
};
