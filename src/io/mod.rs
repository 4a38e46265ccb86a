use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::AlignError;

pub mod fasta;
pub mod text;

pub use fasta::{load_sequences, NamedSequence};
pub use text::load_lines;

/// Open a file for buffered reading, transparently decompressing files ending in `.gz`.
pub fn open_maybe_gzipped(fname: &Path) -> Result<Box<dyn BufRead>, AlignError> {
    let is_gzipped = fname.file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let file = File::open(fname)
        .map_err(|source| AlignError::FileReadError { source })?;

    let reader: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}
