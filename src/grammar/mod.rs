mod index;
mod split;
mod symbol;

pub use split::{alphabet_from_selfies, len_selfies, split_selfies, SplitSelfies};
pub(crate) use index::{index_from_symbols, symbols_from_index};
pub(crate) use symbol::{flush_symbol_cache, parse_symbol, SymbolKind};
