use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum WavealignError {
    /// The two sequences differ in length; the tiling scheme requires a square matrix
    NonSquare(usize, usize),

    /// One of the input sequences contains no symbols
    EmptySequence,

    /// A residue that is not part of the substitution table's alphabet
    UnknownSymbol(char),

    /// The substitution table is not square, not symmetric, or does not match its alphabet
    InvalidTable(String),

    /// The input FASTA did not contain exactly two records
    SequenceCount(usize),

    /// Error variant when we could not parse a substitution table file
    TableParseError { source: serde_json::Error },

    /// Other IO errors
    IOError(io::Error),
}

impl Error for WavealignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::TableParseError { ref source } => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for WavealignError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<serde_json::Error> for WavealignError {
    fn from(value: serde_json::Error) -> Self {
        Self::TableParseError {
            source: value
        }
    }
}

impl Display for WavealignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NonSquare(len_a, len_b) =>
                write!(f, "The sequence lengths differ ({len_a} vs {len_b}); the tiled wavefront requires equal-length sequences!"),
            Self::EmptySequence =>
                write!(f, "Cannot align an empty sequence!"),
            Self::UnknownSymbol(symbol) =>
                write!(f, "Symbol {symbol:?} is not part of the substitution table's alphabet!"),
            Self::InvalidTable(ref reason) =>
                write!(f, "Invalid substitution table: {reason}"),
            Self::SequenceCount(count) =>
                write!(f, "Expected exactly two sequences in the input, found {count}!"),
            Self::TableParseError { source: _ } =>
                write!(f, "Could not parse the substitution table file!"),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}
