use std::io::BufRead;
use std::path::Path;

use crate::errors::AlignError;
use super::open_maybe_gzipped;

/// Read a text file as a sequence of lines, without line terminators.
pub fn load_lines(fname: &Path) -> Result<Vec<String>, AlignError> {
    open_maybe_gzipped(fname)?
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| AlignError::FileReadError { source })
}
