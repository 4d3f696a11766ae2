use thiserror::Error;

/// An error raised while decoding a SELFIES string.
///
/// Decoding is total over the grammar: unknown symbols at index
/// positions read as digit zero and over-subscribed bonds are clamped.
/// Only structurally impossible input raises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("hanging '[' bracket in {selfies:?}")]
    HangingBracket { selfies: String },
    #[error("unexpected character {character:?} in {selfies:?}")]
    Character { character: char, selfies: String },
    #[error("invalid symbol {symbol:?} in {selfies:?}")]
    InvalidSymbol { symbol: String, selfies: String },
}
