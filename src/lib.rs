//! Minimum penalty alignment of two sequences by A* search over the edit lattice.
//!
//! The caller supplies a [`WeightingStrategy`] scoring each diagonal, left-only and right-only
//! step, and optionally an admissible heuristic and a weight scale. The search returns the
//! alignment with the lowest `weight_scale * penalty + number of steps`.

pub mod errors;
pub mod io;
pub mod aligner;

pub use aligner::{Alignment, LatticeAligner, PairwiseAligner};
pub use aligner::config::{SearchConfig, Verbosity};
pub use aligner::utils::AlignedPair;
pub use aligner::weighting::{FnWeighting, Levenshtein, MismatchIndel, WeightingStrategy};
pub use errors::AlignError;
