use mendeleev::Element;

/// Extension helpers for [`Element`] lookups by atomic symbol.
pub trait ElementExt {
    /// Finds the element whose symbol matches `symbol` exactly
    /// (case-sensitive, e.g. `"Cl"` but not `"CL"`).
    fn from_symbol(symbol: &str) -> Option<Element>;
}

impl ElementExt for Element {
    fn from_symbol(symbol: &str) -> Option<Element> {
        Element::list()
            .iter()
            .find(|element| element.symbol() == symbol)
            .copied()
    }
}
