use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum AlignError {
    /// The inputs or the weighting strategy are not usable for an alignment
    Configuration(String),

    /// A closure based weighting strategy was built without a weighter
    MissingWeighter,

    /// The weighter returned a negative or non-finite penalty for the given step
    InvalidPenalty { left: Option<usize>, right: Option<usize>, penalty: f64 },

    /// The heuristic returned a negative or non-finite estimate for the given cell
    InvalidHeuristic { left: usize, right: usize, estimate: f64 },

    /// The queue ran empty before reaching the end of both sequences
    SearchExhausted { visited: usize },

    /// The search tree outgrew the node index type
    SearchSpaceTooLarge(usize),

    /// Error variant when we couldn't read from a file
    FileReadError { source: io::Error },

    /// Other IO errors
    IOError(io::Error),
}

impl Error for AlignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::FileReadError { ref source } => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for AlignError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl Display for AlignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Configuration(ref msg) =>
                write!(f, "Invalid alignment configuration: {msg}"),
            Self::MissingWeighter =>
                write!(f, "No weighter was supplied to the weighting strategy!"),
            Self::InvalidPenalty { left, right, penalty } =>
                write!(f, "Weighter returned invalid penalty {penalty} for step (left: {left:?}, right: {right:?})!"),
            Self::InvalidHeuristic { left, right, estimate } =>
                write!(f, "Heuristic returned invalid estimate {estimate} for lattice cell ({left}, {right})!"),
            Self::SearchExhausted { visited } =>
                write!(f, "Search space exhausted after visiting {visited} nodes without reaching the end of both sequences!"),
            Self::SearchSpaceTooLarge(num_nodes) =>
                write!(f, "The search tree grew too large ({num_nodes} nodes)!"),
            Self::FileReadError { source: _ } =>
                write!(f, "Could not read from file!"),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}
