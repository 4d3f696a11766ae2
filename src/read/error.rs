use thiserror::Error;

use super::Scanner;

/// An error that occurs while reading a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("unexpected end of input")]
    EndOfLine,
    #[error("unexpected character at position {0}")]
    Character(usize),
    #[error("unknown element at position {0}")]
    UnknownElement(usize),
    #[error("unsupported chirality extension at position {0}")]
    UnsupportedChirality(usize),
    #[error("wildcard atoms are not supported (position {0})")]
    Wildcard(usize),
    #[error("ring bond {0} was never closed")]
    UnclosedRing(u8),
}

pub(crate) fn missing_character(scanner: &Scanner) -> ReadError {
    if scanner.is_done() {
        ReadError::EndOfLine
    } else {
        ReadError::Character(scanner.cursor())
    }
}
