use crate::grammar;

/// One tokenized symbol and its position in the input, counted over all
/// symbols including separators and no-ops.
#[derive(Debug, Clone, Copy)]
pub(super) struct Token<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Forward-only cursor over one fragment's symbols. The main derivation
/// and its recursive branch frames all advance the same cursor; a branch
/// consumes symbols from its parent's stream up to its own budget.
#[derive(Debug)]
pub(super) struct Cursor<'a> {
    tokens: Vec<Token<'a>>,
    at: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, at: 0 }
    }

    pub fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.at).copied();
        if token.is_some() {
            self.at += 1;
        }
        token
    }

    /// Consumes up to `count` symbols and reads them as an index
    /// numeral. Returns the value and how many symbols were actually
    /// consumed (fewer only at the end of the stream).
    pub fn take_index(&mut self, count: usize) -> (usize, usize) {
        let mut digits = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next() {
                Some(token) => digits.push(token.text),
                None => break,
            }
        }
        (grammar::index_from_symbols(&digits), digits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor<'a>(symbols: &[&'a str]) -> Cursor<'a> {
        Cursor::new(
            symbols
                .iter()
                .enumerate()
                .map(|(index, &text)| Token { index, text })
                .collect(),
        )
    }

    #[test]
    fn walks_forward_only() {
        let mut cursor = cursor(&["[C]", "[O]"]);

        assert_eq!(cursor.next().unwrap().text, "[C]");
        assert_eq!(cursor.next().unwrap().text, "[O]");
        assert!(cursor.next().is_none());
    }

    #[test]
    fn take_index_reads_digits() {
        let mut cursor = cursor(&["[Ring1]", "[C]", "[O]"]);

        assert_eq!(cursor.take_index(2), (16, 2));
        assert_eq!(cursor.next().unwrap().text, "[O]");
    }

    #[test]
    fn take_index_stops_at_the_end() {
        let mut cursor = cursor(&["[Ring1]"]);

        assert_eq!(cursor.take_index(3), (1, 1));
    }
}
