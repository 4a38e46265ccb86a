use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};


/// The output formats supported by lattice-align
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputType {
    /// Human readable alignment
    #[default]
    Text,

    /// Alignment positions, per-step costs and search statistics as JSON
    Json,
}

/// Built-in weighting strategies
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Weighting {
    /// Unit penalty for mismatches and indels (edit distance)
    Levenshtein,

    /// Separate penalties for mismatches and indels
    #[default]
    MismatchIndel,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<CliSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliSubcommand {
    /// Align the first two sequences of a FASTA file
    Align(AlignArgs),

    /// Align two text files line by line
    Diff(DiffArgs),
}

#[derive(Args, Debug)]
pub struct WeightingArgs {
    /// Weighting strategy
    #[arg(value_enum, short = 'w', long, default_value = "mismatch-indel")]
    #[clap(help_heading = "Alignment configuration")]
    pub weighting: Weighting,

    /// Penalty for mismatching tokens (mismatch-indel weighting only)
    #[arg(short = 'n', long, default_value = "1.5")]
    #[clap(help_heading = "Alignment configuration")]
    pub cost_mismatch: f64,

    /// Penalty for an inserted or deleted token (mismatch-indel weighting only)
    #[arg(short = 'g', long, default_value = "1.0")]
    #[clap(help_heading = "Alignment configuration")]
    pub cost_indel: f64,

    /// Multiplier for penalties relative to the step count (mismatch-indel weighting only)
    #[arg(short = 's', long, default_value = "1000")]
    #[clap(help_heading = "Alignment configuration")]
    pub weight_scale: f64,

    /// Disable the A* heuristic and perform a plain Dijkstra search
    #[arg(long)]
    #[clap(help_heading = "Alignment configuration")]
    pub dijkstra: bool,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    pub output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long, default_value = "text")]
    #[clap(help_heading = "Outputs")]
    pub output_type: OutputType,

    /// Write visited and queued search nodes as TSV files to the given directory
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    pub debug_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// FASTA file (optionally gzipped) with the two sequences to align
    #[clap(help_heading = "Inputs")]
    pub sequences: PathBuf,

    #[command(flatten)]
    pub weighting: WeightingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Original text file
    #[clap(help_heading = "Inputs")]
    pub left: PathBuf,

    /// Modified text file
    #[clap(help_heading = "Inputs")]
    pub right: PathBuf,

    #[command(flatten)]
    pub weighting: WeightingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}
