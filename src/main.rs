use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry};

use lattice_align::aligner::astar::heuristic::Dijkstra;
use lattice_align::aligner::astar::SearchStats;
use lattice_align::aligner::utils::{print_alignment, print_diff};
use lattice_align::io::fasta::load_pair;
use lattice_align::io::load_lines;
use lattice_align::{
    AlignError, AlignedPair, Alignment, LatticeAligner, Levenshtein, MismatchIndel,
    PairwiseAligner, SearchConfig, Verbosity, WeightingStrategy,
};

mod cli;
mod debug_tracing;

use cli::{CliArgs, CliSubcommand, OutputArgs, OutputType, Weighting, WeightingArgs};
use debug_tracing::filter::{only_search_nodes, search_node_filter};
use debug_tracing::subscriber::SearchNodeLayer;

/// Build our base tracing subscriber with stderr logging.
fn build_base_subscriber(verbose: u8) -> impl Subscriber + for<'span> LookupSpan<'span> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(search_node_filter())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log)
}

fn init_tracing(verbose: u8, output_args: &OutputArgs) {
    build_base_subscriber(verbose)
        .with(output_args.debug_output.as_deref()
            .map(|dir| SearchNodeLayer::new(dir).with_filter(only_search_nodes())))
        .init();
}

fn search_config(verbose: u8, output_args: &OutputArgs, label: String) -> SearchConfig {
    let verbosity = if output_args.debug_output.is_some() || verbose >= 2 {
        Verbosity::Nodes
    } else if verbose == 1 {
        Verbosity::Summary
    } else {
        Verbosity::Quiet
    };

    SearchConfig::new()
        .with_verbosity(verbosity)
        .with_label(label)
}

/// Run `f` with the weighting strategy selected on the command line.
fn with_strategy<T, R, F>(args: &WeightingArgs, f: F) -> R
where
    T: PartialEq,
    F: FnOnce(&dyn WeightingStrategy<T>) -> R,
{
    let mismatch_indel = MismatchIndel::with_scale(args.cost_mismatch, args.cost_indel, args.weight_scale);

    match (args.weighting, args.dijkstra) {
        (Weighting::Levenshtein, false) => f(&Levenshtein),
        (Weighting::Levenshtein, true) => f(&Dijkstra(Levenshtein)),
        (Weighting::MismatchIndel, false) => f(&mismatch_indel),
        (Weighting::MismatchIndel, true) => f(&Dijkstra(mismatch_indel)),
    }
}

fn validate_weighting(args: &WeightingArgs) -> Result<(), AlignError> {
    if args.weighting == Weighting::MismatchIndel
        && !(args.cost_mismatch >= 0.0 && args.cost_indel >= 0.0)
    {
        return Err(AlignError::Configuration(
            "mismatch and indel penalties must be non-negative".to_string()
        ));
    }

    Ok(())
}

fn open_output(output_args: &OutputArgs) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if let Some(path) = &output_args.output {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?
        }

        let file = File::create(path)
            .with_context(|| format!("Could not create output file {:?}", path))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(io::stdout())
    };

    Ok(writer)
}

#[derive(Serialize)]
struct AlignmentReport<'a> {
    left: &'a str,
    right: &'a str,
    penalty: f64,
    num_steps: usize,
    weight_scale: f64,
    pairs: &'a [AlignedPair<usize>],
    costs: &'a [f64],
    stats: SearchStats,
}

impl<'a> AlignmentReport<'a> {
    fn new<T>(left: &'a str, right: &'a str, aln: &'a Alignment<'_, T>) -> Self {
        Self {
            left,
            right,
            penalty: aln.penalty(),
            num_steps: aln.num_steps(),
            weight_scale: aln.weight_scale(),
            pairs: aln.positions(),
            costs: aln.costs(),
            stats: aln.stats(),
        }
    }
}

fn align_subcommand(verbose: u8, align_args: &cli::AlignArgs) -> Result<()> {
    init_tracing(verbose, &align_args.output);
    validate_weighting(&align_args.weighting)?;

    let (left, right) = load_pair(&align_args.sequences)?;
    info!("Aligning {} ({} bp) to {} ({} bp)...", left.name, left.sequence.len(), right.name, right.sequence.len());

    let config = search_config(verbose, &align_args.output, format!("{}_{}", left.name, right.name));
    let aln = with_strategy::<u8, _, _>(&align_args.weighting, |strategy| {
        LatticeAligner::with_config(strategy, config)
            .align(&left.sequence[..], &right.sequence[..])
    })?;

    info!("Done. Alignment penalty: {}", aln.penalty());

    let mut writer = open_output(&align_args.output)?;
    match align_args.output.output_type {
        OutputType::Text => {
            writeln!(writer, "# left: {}", left.name)?;
            writeln!(writer, "# right: {}", right.name)?;
            writeln!(writer, "# penalty: {}\tsteps: {}", aln.penalty(), aln.num_steps())?;
            writeln!(writer, "{}", print_alignment(&aln.pairwise(), |c| char::from(*c).to_string()))?;
        },
        OutputType::Json => {
            let report = AlignmentReport::new(&left.name, &right.name, &aln);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;

    Ok(())
}

fn diff_subcommand(verbose: u8, diff_args: &cli::DiffArgs) -> Result<()> {
    init_tracing(verbose, &diff_args.output);
    validate_weighting(&diff_args.weighting)?;

    let left = load_lines(&diff_args.left)?;
    let right = load_lines(&diff_args.right)?;
    let left_name = file_label(&diff_args.left);
    let right_name = file_label(&diff_args.right);
    info!("Comparing {} ({} lines) to {} ({} lines)...", left_name, left.len(), right_name, right.len());

    let config = search_config(verbose, &diff_args.output, format!("{}_{}", left_name, right_name));
    let aln = with_strategy::<String, _, _>(&diff_args.weighting, |strategy| {
        LatticeAligner::with_config(strategy, config)
            .align(&left[..], &right[..])
    })?;

    info!("Done. Alignment penalty: {}", aln.penalty());

    let mut writer = open_output(&diff_args.output)?;
    match diff_args.output.output_type {
        OutputType::Text => {
            writeln!(writer, "--- {}", diff_args.left.display())?;
            writeln!(writer, "+++ {}", diff_args.right.display())?;
            writeln!(writer, "{}", print_diff(&aln.pairwise(), |line| line.clone()))?;
        },
        OutputType::Json => {
            let report = AlignmentReport::new(&left_name, &right_name, &aln);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;

    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    match &args.command {
        Some(CliSubcommand::Align(v)) => align_subcommand(args.verbose, v)?,
        Some(CliSubcommand::Diff(v)) => diff_subcommand(args.verbose, v)?,
        None => {
            return Err(AlignError::Configuration("no subcommand given".to_string()))
                .context("Run with --help to see the available subcommands.")
        }
    };

    Ok(())
}
