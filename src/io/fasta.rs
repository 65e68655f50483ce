use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::errors::WavealignError;

/// A named residue sequence read from FASTA input.
#[derive(Debug, Clone)]
pub struct FastaSequence {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Read exactly two sequences from a FASTA file, transparently decompressing
/// gzipped input. Any other record count is rejected.
pub fn read_sequence_pair(path: &Path) -> Result<(FastaSequence, FastaSequence), WavealignError> {
    let is_gzipped = path
        .file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let reader_inner: Box<dyn std::io::BufRead> = if is_gzipped {
        Box::new(
            File::open(path)
                .map(MultiGzDecoder::new)
                .map(BufReader::new)?,
        )
    } else {
        Box::new(File::open(path).map(BufReader::new)?)
    };
    let mut reader = fasta::io::Reader::new(reader_inner);

    let mut sequences = Vec::with_capacity(2);
    for result in reader.records() {
        let record = result?;
        sequences.push(FastaSequence {
            name: String::from_utf8_lossy(record.name()).into_owned(),
            sequence: record.sequence().as_ref().to_vec(),
        });
    }

    if sequences.len() != 2 {
        return Err(WavealignError::SequenceCount(sequences.len()));
    }

    let second = sequences.pop().unwrap();
    let first = sequences.pop().unwrap();

    Ok((first, second))
}
