//! Bookkeeping that links output tokens back to the input symbols that
//! produced them.

/// A single provenance record: the index and text of one input symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Position of the symbol in the input string, counted in symbols.
    pub index: usize,
    /// The symbol text, e.g. `"[=C]"` or `"Cl"`.
    pub token: String,
}

impl Attribution {
    pub fn new(index: usize, token: impl Into<String>) -> Self {
        Self {
            index,
            token: token.into(),
        }
    }
}

/// One output token together with the stack of input symbols that were
/// active when it was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAttribution {
    pub token: String,
    pub attribution: Vec<Attribution>,
}

/// Attributions for a whole output string, in emission order.
pub type AttributionMap = Vec<TokenAttribution>;
