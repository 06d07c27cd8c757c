//! Command implementations and argument parsing for the copra CLI.

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use copra_core::{
    AdjacencyGraph, CopraBuilder, CopraError, CopraResult, ExecutionContext, Graph, Membership,
    modularity,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::matrix_market::{MatrixMarketError, read_matrix_market};

const DEFAULT_MAX_LABELS: usize = 4;
const DEFAULT_TOLERANCE: f64 = 0.05;
const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Tolerance denominators swept by the `sweep` command.
pub const SWEEP_TOLERANCE_FACTORS: [u32; 7] = [10, 20, 100, 200, 1_000, 2_000, 10_000];
/// Label caps swept by the `sweep` command.
pub const SWEEP_LABEL_CAPS: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "copra", about = "Detect overlapping communities with COPRA.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Detect communities in one graph with one configuration.
    Run(RunCommand),
    /// Time sequential and parallel runs across tolerances and label caps.
    Sweep(SweepCommand),
}

/// Graph input shared by every command.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Path to a Matrix Market coordinate file.
    pub path: PathBuf,

    /// Override name for the graph (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Worker threads for parallel runs (defaults to available parallelism).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Timed repetitions per run; the mean time is reported.
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,

    /// Maximum number of rounds per run.
    #[arg(long = "max-iterations", default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Graph input and execution options.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Maximum number of labels per vertex.
    #[arg(long = "max-labels", default_value_t = DEFAULT_MAX_LABELS)]
    pub max_labels: usize,

    /// Stop once at most this fraction of vertices changes community.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Print the dominant community of every vertex.
    #[arg(long)]
    pub assignments: bool,
}

/// Options accepted by the `sweep` command.
#[derive(Debug, Args, Clone)]
pub struct SweepCommand {
    /// Graph input and execution options.
    #[command(flatten)]
    pub graph: GraphArgs,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The graph file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The graph file is not a supported Matrix Market file.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: MatrixMarketError,
    },
    /// Configuration or execution failed in the engine.
    #[error(transparent)]
    Core(#[from] CopraError),
}

/// Graph metadata reported with every summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInfo {
    /// Name derived from the file or overridden on the command line.
    pub name: String,
    /// Live vertices after symmetrizing.
    pub vertices: usize,
    /// Directed edges after symmetrizing.
    pub edges: usize,
}

/// Outcome of the `run` command.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Graph the run used.
    pub graph: GraphInfo,
    /// Engine result.
    pub result: CopraResult,
    /// Modularity of the dominant-community partition.
    pub modularity: f64,
    /// Whether per-vertex assignments are rendered.
    pub assignments: bool,
}

/// How one sweep run was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepVariant {
    /// Single worker.
    Sequential,
    /// Configured worker count.
    Parallel,
}

impl SweepVariant {
    /// Returns the label printed for the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "copraSequential",
            Self::Parallel => "copraParallel",
        }
    }
}

/// One line of sweep output.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    /// Mean wall time.
    pub elapsed: Duration,
    /// Rounds executed.
    pub iterations: usize,
    /// Modularity of the dominant-community partition.
    pub modularity: f64,
    /// Execution variant.
    pub variant: SweepVariant,
    /// Label cap.
    pub labels: usize,
    /// Tolerance.
    pub tolerance: f64,
}

/// Outcome of the `sweep` command.
#[derive(Debug, Clone)]
pub struct SweepSummary {
    /// Graph the sweep used.
    pub graph: GraphInfo,
    /// Modularity with every vertex in its own community.
    pub baseline: f64,
    /// Runs in execution order.
    pub rows: Vec<SweepRow>,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Output of `run`.
    Run(RunSummary),
    /// Output of `sweep`.
    Sweep(SweepSummary),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph or running the engine fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use copra_cli::cli::{Cli, Command, ExecutionSummary, GraphArgs, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     "%%MatrixMarket matrix coordinate pattern symmetric\n3 3 3\n2 1\n3 1\n3 2\n",
/// )?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         graph: GraphArgs {
///             path: file.path().to_path_buf(),
///             name: None,
///             threads: Some(2),
///             repeat: 1,
///             max_iterations: 20,
///         },
///         max_labels: 1,
///         tolerance: 0.05,
///         assignments: false,
///     }),
/// };
/// let ExecutionSummary::Run(summary) = run_cli(cli)? else {
///     unreachable!("run command yields a run summary");
/// };
/// assert_eq!(summary.result.membership().community_count(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run).map(ExecutionSummary::Run)
        }
        Command::Sweep(sweep) => {
            Span::current().record("command", field::display("sweep"));
            sweep_command(sweep).map(ExecutionSummary::Sweep)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(max_labels = command.max_labels, tolerance = command.tolerance),
)]
pub(super) fn run_command(command: RunCommand) -> Result<RunSummary, CliError> {
    let copra = CopraBuilder::new()
        .with_max_labels(command.max_labels)
        .with_tolerance(command.tolerance)
        .with_max_iterations(command.graph.max_iterations)
        .with_repeat(command.graph.repeat)
        .build()?;
    let context = execution_context(command.graph.threads)?;
    let (info, graph) = load_graph(&command.graph)?;

    let result = copra.run(&graph, &context)?;
    let score = modularity(&graph, result.membership(), 1.0);
    info!(
        graph = info.name.as_str(),
        communities = result.membership().community_count(),
        iterations = result.iterations(),
        modularity = score,
        "command completed"
    );
    Ok(RunSummary {
        graph: info,
        result,
        modularity: score,
        assignments: command.assignments,
    })
}

#[instrument(name = "cli.sweep", err, skip(command), fields(workers = field::Empty))]
pub(super) fn sweep_command(command: SweepCommand) -> Result<SweepSummary, CliError> {
    let sequential = ExecutionContext::sequential()?;
    let parallel = execution_context(command.graph.threads)?;
    Span::current().record("workers", parallel.workers());
    let (info, graph) = load_graph(&command.graph)?;
    let baseline = modularity(&graph, &Membership::singletons(&graph), 1.0);

    let mut rows = Vec::with_capacity(SWEEP_TOLERANCE_FACTORS.len() * SWEEP_LABEL_CAPS.len() * 2);
    for factor in SWEEP_TOLERANCE_FACTORS {
        let tolerance = 1.0 / f64::from(factor);
        for labels in SWEEP_LABEL_CAPS {
            let copra = CopraBuilder::new()
                .with_max_labels(labels)
                .with_tolerance(tolerance)
                .with_max_iterations(command.graph.max_iterations)
                .with_repeat(command.graph.repeat)
                .build()?;
            for (variant, context) in [
                (SweepVariant::Sequential, &sequential),
                (SweepVariant::Parallel, &parallel),
            ] {
                let result = copra.run(&graph, context)?;
                rows.push(SweepRow {
                    elapsed: result.elapsed(),
                    iterations: result.iterations(),
                    modularity: modularity(&graph, result.membership(), 1.0),
                    variant,
                    labels,
                    tolerance,
                });
            }
        }
    }
    info!(graph = info.name.as_str(), runs = rows.len(), "sweep completed");
    Ok(SweepSummary {
        graph: info,
        baseline,
        rows,
    })
}

fn execution_context(threads: Option<usize>) -> Result<ExecutionContext, CopraError> {
    threads.map_or_else(ExecutionContext::available, ExecutionContext::new)
}

/// Loads and symmetrizes the graph named by `args`.
#[instrument(
    name = "cli.load_graph",
    err,
    skip(args),
    fields(path = %args.path.display(), vertices = field::Empty, edges = field::Empty),
)]
pub(super) fn load_graph(args: &GraphArgs) -> Result<(GraphInfo, AdjacencyGraph), CliError> {
    let file = File::open(&args.path).map_err(|source| CliError::Io {
        path: args.path.clone(),
        source,
    })?;
    let mut graph =
        read_matrix_market(BufReader::new(file)).map_err(|source| CliError::Parse {
            path: args.path.clone(),
            source,
        })?;
    graph.symmetrize();

    let span = Span::current();
    span.record("vertices", graph.order());
    span.record("edges", graph.edge_count());
    let info = GraphInfo {
        name: derive_graph_name(&args.path, args.name.as_deref()),
        vertices: graph.order(),
        edges: graph.edge_count(),
    };
    Ok((info, graph))
}

pub(super) fn derive_graph_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "graph".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Run(run) => render_run(run, &mut writer),
        ExecutionSummary::Sweep(sweep) => render_sweep(sweep, &mut writer),
    }
}

fn render_graph(graph: &GraphInfo, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "graph: {}", graph.name)?;
    writeln!(writer, "vertices: {}", graph.vertices)?;
    writeln!(writer, "edges: {}", graph.edges)
}

fn render_run(run: &RunSummary, writer: &mut impl Write) -> io::Result<()> {
    render_graph(&run.graph, writer)?;
    let status = if run.result.converged() {
        "converged"
    } else {
        "iteration cap reached"
    };
    writeln!(writer, "iterations: {} ({status})", run.result.iterations())?;
    writeln!(writer, "time: {:.3} ms", millis(run.result.elapsed()))?;
    writeln!(
        writer,
        "communities: {}",
        run.result.membership().community_count()
    )?;
    writeln!(writer, "modularity: {:.9}", run.modularity)?;
    if run.assignments {
        for (vertex, community) in run.result.membership().iter() {
            writeln!(writer, "{vertex}\t{community}")?;
        }
    }
    Ok(())
}

fn render_sweep(sweep: &SweepSummary, writer: &mut impl Write) -> io::Result<()> {
    render_graph(&sweep.graph, writer)?;
    writeln!(writer, "[{:01.6} modularity] noop", sweep.baseline)?;
    for row in &sweep.rows {
        writeln!(
            writer,
            "[{:09.3} ms; {:04} iters.; {:01.9} modularity] {} {{labels={:02}, tolerance={:.0e}}}",
            millis(row.elapsed),
            row.iterations,
            row.modularity,
            row.variant.as_str(),
            row.labels,
            row.tolerance,
        )?;
    }
    Ok(())
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
