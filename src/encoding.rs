//! Label and one-hot conversions between SELFIES strings and the integer
//! encodings consumed by sequence models. The caller supplies the
//! vocabulary; `[nop]` serves as the padding symbol.

use std::collections::HashMap;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::grammar::split_selfies;

/// An error raised by the encoding helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("symbol {0:?} is not in the vocabulary")]
    MissingSymbol(String),
    #[error("label {0} is not in the vocabulary")]
    MissingLabel(usize),
    #[error("one-hot row of width {found} does not match vocabulary size {expected}")]
    WidthMismatch { found: usize, expected: usize },
    #[error("one-hot row has no active entry")]
    MissingHot,
    #[error(transparent)]
    Selfies(#[from] DecodeError),
}

/// Converts a SELFIES string into its label encoding and one-hot
/// encoding under `vocab_stoi`, padded with `[nop]` up to `pad_to_len`
/// symbols.
pub fn selfies_to_encoding(
    selfies: &str,
    vocab_stoi: &HashMap<String, usize>,
    pad_to_len: usize,
) -> Result<(Vec<usize>, Vec<Vec<u8>>), EncodingError> {
    let mut symbols: Vec<String> = split_selfies(selfies)
        .map(|symbol| symbol.map(str::to_string))
        .collect::<Result<_, _>>()?;
    while symbols.len() < pad_to_len {
        symbols.push("[nop]".to_string());
    }

    let labels: Vec<usize> = symbols
        .iter()
        .map(|symbol| {
            vocab_stoi
                .get(symbol)
                .copied()
                .ok_or_else(|| EncodingError::MissingSymbol(symbol.clone()))
        })
        .collect::<Result<_, _>>()?;

    let width = vocab_stoi.len();
    let one_hot = labels
        .iter()
        .map(|&label| {
            let mut row = vec![0; width];
            row[label] = 1;
            row
        })
        .collect();

    Ok((labels, one_hot))
}

/// Converts a label encoding back into a SELFIES string.
pub fn encoding_to_selfies(
    labels: &[usize],
    vocab_itos: &HashMap<usize, String>,
) -> Result<String, EncodingError> {
    labels
        .iter()
        .map(|&label| {
            vocab_itos
                .get(&label)
                .map(String::as_str)
                .ok_or(EncodingError::MissingLabel(label))
        })
        .collect()
}

/// Converts a batch of SELFIES strings into flattened one-hot rows.
pub fn batch_selfies_to_flat_hot(
    batch: &[&str],
    vocab_stoi: &HashMap<String, usize>,
    pad_to_len: usize,
) -> Result<Vec<Vec<u8>>, EncodingError> {
    batch
        .iter()
        .map(|selfies| {
            let (_, one_hot) = selfies_to_encoding(selfies, vocab_stoi, pad_to_len)?;
            Ok(one_hot.into_iter().flatten().collect())
        })
        .collect()
}

/// Converts flattened one-hot rows back into SELFIES strings.
pub fn batch_flat_hot_to_selfies(
    batch: &[Vec<u8>],
    vocab_itos: &HashMap<usize, String>,
) -> Result<Vec<String>, EncodingError> {
    let width = vocab_itos.len();

    batch
        .iter()
        .map(|flat| {
            if width == 0 || flat.len() % width != 0 {
                return Err(EncodingError::WidthMismatch {
                    found: flat.len(),
                    expected: width,
                });
            }

            flat.chunks(width)
                .map(|row| {
                    let label = row
                        .iter()
                        .position(|&hot| hot == 1)
                        .ok_or(EncodingError::MissingHot)?;
                    vocab_itos
                        .get(&label)
                        .map(String::as_str)
                        .ok_or(EncodingError::MissingLabel(label))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vocab() -> (HashMap<String, usize>, HashMap<usize, String>) {
        let symbols = ["[nop]", "[C]", "[O]", "[=C]"];
        let stoi = symbols
            .iter()
            .enumerate()
            .map(|(label, &symbol)| (symbol.to_string(), label))
            .collect();
        let itos = symbols
            .iter()
            .enumerate()
            .map(|(label, &symbol)| (label, symbol.to_string()))
            .collect();
        (stoi, itos)
    }

    #[test]
    fn labels_and_one_hot() {
        let (stoi, _) = vocab();
        let (labels, one_hot) = selfies_to_encoding("[C][=C][O]", &stoi, 4).unwrap();

        assert_eq!(labels, vec![1, 3, 2, 0]);
        assert_eq!(one_hot[0], vec![0, 1, 0, 0]);
        assert_eq!(one_hot[3], vec![1, 0, 0, 0]);
    }

    #[test]
    fn label_round_trip() {
        let (stoi, itos) = vocab();
        let (labels, _) = selfies_to_encoding("[C][O]", &stoi, 0).unwrap();

        assert_eq!(encoding_to_selfies(&labels, &itos).unwrap(), "[C][O]");
    }

    #[test]
    fn missing_symbol() {
        let (stoi, _) = vocab();

        assert_eq!(
            selfies_to_encoding("[N]", &stoi, 0).unwrap_err(),
            EncodingError::MissingSymbol("[N]".to_string())
        );
    }

    #[test]
    fn flat_hot_round_trip() {
        let (stoi, itos) = vocab();
        let flat = batch_selfies_to_flat_hot(&["[C][O]", "[=C]"], &stoi, 2).unwrap();

        assert_eq!(flat[0].len(), 8);
        assert_eq!(
            batch_flat_hot_to_selfies(&flat, &itos).unwrap(),
            vec!["[C][O]".to_string(), "[=C][nop]".to_string()]
        );
    }

    #[test]
    fn malformed_width() {
        let (_, itos) = vocab();

        assert_eq!(
            batch_flat_hot_to_selfies(&[vec![0, 1, 0]], &itos).unwrap_err(),
            EncodingError::WidthMismatch {
                found: 3,
                expected: 4
            }
        );
    }
}
