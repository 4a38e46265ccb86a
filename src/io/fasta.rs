//! Reading sequences to align from FASTA files.

use std::path::Path;

use noodles::fasta;
use tracing::debug;

use crate::errors::AlignError;
use super::open_maybe_gzipped;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Load all records from a (optionally gzipped) FASTA file.
pub fn load_sequences(fname: &Path) -> Result<Vec<NamedSequence>, AlignError> {
    let mut reader = fasta::io::Reader::new(open_maybe_gzipped(fname)?);

    let mut sequences = Vec::new();
    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8_lossy(record.name()).into_owned();
        let sequence: &[u8] = record.sequence().as_ref();

        debug!(name = %name, length = sequence.len(), "Read FASTA record");
        sequences.push(NamedSequence { name, sequence: sequence.to_vec() });
    }

    Ok(sequences)
}

/// Load exactly two records from a FASTA file, the left and right sequence of an alignment.
pub fn load_pair(fname: &Path) -> Result<(NamedSequence, NamedSequence), AlignError> {
    let mut sequences = load_sequences(fname)?;

    if sequences.len() < 2 {
        return Err(AlignError::Configuration(
            format!("expected two sequences in {:?}, found {}", fname, sequences.len())
        ));
    }

    let right = sequences.swap_remove(1);
    let left = sequences.swap_remove(0);

    Ok((left, right))
}
