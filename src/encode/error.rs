use thiserror::Error;

use crate::read::ReadError;

/// An error raised while encoding a SMILES string. The encoder guards
/// its input strictly; clamping is left to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("failed to read {smiles:?}: {source}")]
    Read { smiles: String, source: ReadError },
    #[error("kekulization failed for {smiles:?}")]
    Kekulization { smiles: String },
    #[error("bond capacity of atom {atom} exceeded in {smiles:?}: {total} > {capacity}")]
    Capacity {
        smiles: String,
        atom: usize,
        total: u8,
        capacity: u8,
    },
}
