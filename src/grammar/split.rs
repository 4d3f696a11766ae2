use std::collections::BTreeSet;

use crate::decode::DecodeError;

/// Returns an iterator over the symbols of a SELFIES string. Fragment
/// separators are yielded as `"."` symbols of their own.
pub fn split_selfies(selfies: &str) -> SplitSelfies<'_> {
    SplitSelfies { selfies, at: 0 }
}

/// Number of symbols in a SELFIES string, counting fragment separators.
pub fn len_selfies(selfies: &str) -> usize {
    selfies.chars().filter(|&c| c == '[' || c == '.').count()
}

/// Collects the set of symbols used across an iterator of SELFIES
/// strings, excluding the `.` separator.
pub fn alphabet_from_selfies<'a, I>(selfies_iter: I) -> Result<BTreeSet<String>, DecodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut alphabet = BTreeSet::new();
    for selfies in selfies_iter {
        for symbol in split_selfies(selfies) {
            let symbol = symbol?;
            if symbol != "." {
                alphabet.insert(symbol.to_string());
            }
        }
    }
    Ok(alphabet)
}

/// See [`split_selfies`].
#[derive(Debug)]
pub struct SplitSelfies<'a> {
    selfies: &'a str,
    at: usize,
}

impl<'a> Iterator for SplitSelfies<'a> {
    type Item = Result<&'a str, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.selfies[self.at..];
        let character = rest.chars().next()?;

        match character {
            '.' => {
                self.at += 1;
                Some(Ok("."))
            }
            '[' => match rest.find(']') {
                Some(end) => {
                    self.at += end + 1;
                    Some(Ok(&rest[..=end]))
                }
                None => {
                    self.at = self.selfies.len();
                    Some(Err(DecodeError::HangingBracket {
                        selfies: self.selfies.to_string(),
                    }))
                }
            },
            _ => {
                self.at = self.selfies.len();
                Some(Err(DecodeError::Character {
                    character,
                    selfies: self.selfies.to_string(),
                }))
            }
        }
    }
}
