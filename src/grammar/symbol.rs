use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use mendeleev::Element;

use crate::feature::{Chirality, ElementExt, Stereo};
use crate::graph::Atom;

/// A SELFIES symbol classified by its bracket body. Unknown bodies parse
/// to `None`: they still carry digit value 0 at index positions, but are
/// errors at derivation positions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SymbolKind {
    Atom {
        order: u8,
        stereo: Option<Stereo>,
        atom: Atom,
    },
    Branch {
        order: u8,
        tail: usize,
    },
    Ring {
        order: u8,
        tail: usize,
        stereo: (Option<Stereo>, Option<Stereo>),
    },
    Epsilon,
    Nop,
}

static PARSED: LazyLock<RwLock<HashMap<String, Option<SymbolKind>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Classifies `symbol`, memoizing the result. The memo is flushed when
/// the semantic constraints are swapped so cached atoms never carry a
/// stale capacity.
pub(crate) fn parse_symbol(symbol: &str) -> Option<SymbolKind> {
    if let Some(known) = PARSED.read().expect("symbol cache lock").get(symbol) {
        return known.clone();
    }

    let parsed = classify(symbol);
    PARSED
        .write()
        .expect("symbol cache lock")
        .insert(symbol.to_string(), parsed.clone());
    parsed
}

pub(crate) fn flush_symbol_cache() {
    PARSED.write().expect("symbol cache lock").clear();
}

fn classify(symbol: &str) -> Option<SymbolKind> {
    let body = symbol.strip_prefix('[')?.strip_suffix(']')?;

    if body == "nop" {
        return Some(SymbolKind::Nop);
    }
    if body.contains("eps") {
        return Some(SymbolKind::Epsilon);
    }
    if let Some(at) = body.find("Branch") {
        let order = branch_order(&body[..at])?;
        let tail = tail_length(&body[at + "Branch".len()..])?;
        return Some(SymbolKind::Branch { order, tail });
    }
    if let Some(at) = body.find("Ring") {
        let (order, stereo) = ring_prefix(&body[..at])?;
        let tail = tail_length(&body[at + "Ring".len()..])?;
        return Some(SymbolKind::Ring {
            order,
            tail,
            stereo,
        });
    }

    parse_atom_body(body).map(|(order, stereo, atom)| SymbolKind::Atom {
        order,
        stereo,
        atom,
    })
}

fn branch_order(prefix: &str) -> Option<u8> {
    match prefix {
        "" => Some(1),
        "=" => Some(2),
        "#" => Some(3),
        _ => None,
    }
}

fn ring_prefix(prefix: &str) -> Option<(u8, (Option<Stereo>, Option<Stereo>))> {
    match prefix {
        "" => Some((1, (None, None))),
        "=" => Some((2, (None, None))),
        "#" => Some((3, (None, None))),
        "/" => Some((1, (Some(Stereo::Up), Some(Stereo::Up)))),
        "\\" => Some((1, (Some(Stereo::Down), Some(Stereo::Down)))),
        _ => {
            let mut marks = prefix.chars().map(stereo_mark);
            match (marks.next(), marks.next(), marks.next()) {
                (Some(Some(left)), Some(Some(right)), None) => Some((1, (left, right))),
                _ => None,
            }
        }
    }
}

fn stereo_mark(character: char) -> Option<Option<Stereo>> {
    match character {
        '-' => Some(None),
        '/' => Some(Some(Stereo::Up)),
        '\\' => Some(Some(Stereo::Down)),
        _ => None,
    }
}

fn tail_length(digit: &str) -> Option<usize> {
    match digit {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

fn parse_atom_body(body: &str) -> Option<(u8, Option<Stereo>, Atom)> {
    let mut rest = body;

    let (order, stereo) = match rest.chars().next()? {
        '=' => (2, None),
        '#' => (3, None),
        '/' => (1, Some(Stereo::Up)),
        '\\' => (1, Some(Stereo::Down)),
        _ => (1, None),
    };
    if order != 1 || stereo.is_some() {
        rest = &rest[1..];
    }

    let isotope_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let isotope = if isotope_end > 0 {
        Some(rest[..isotope_end].parse::<u16>().ok()?)
    } else {
        None
    };
    rest = &rest[isotope_end..];

    if !rest.chars().next()?.is_ascii_uppercase() {
        return None;
    }
    let symbol_end = 1 + rest[1..]
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(rest.len() - 1);
    let element = Element::from_symbol(&rest[..symbol_end])?;
    rest = &rest[symbol_end..];

    let chirality = if let Some(tail) = rest.strip_prefix("@@") {
        rest = tail;
        Some(Chirality::Clockwise)
    } else if let Some(tail) = rest.strip_prefix('@') {
        rest = tail;
        Some(Chirality::Counterclockwise)
    } else {
        None
    };

    let hydrogens = if let Some(tail) = rest.strip_prefix('H') {
        rest = tail;
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            Some(1)
        } else {
            let count = rest[..digits].parse::<u8>().ok()?;
            rest = &rest[digits..];
            Some(count)
        }
    } else {
        None
    };

    let charge = match rest.chars().next() {
        None => 0,
        Some(sign @ ('+' | '-')) => {
            rest = &rest[1..];
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let magnitude: i8 = if digits == 0 {
                1
            } else {
                let parsed = rest[..digits].parse::<i8>().ok()?;
                rest = &rest[digits..];
                parsed
            };
            if sign == '-' {
                -magnitude
            } else {
                magnitude
            }
        }
        Some(_) => return None,
    };

    if !rest.is_empty() {
        return None;
    }

    let atom = Atom::new(element)
        .isotope(isotope)
        .chirality(chirality)
        .hydrogens(hydrogens)
        .charge(charge);
    Some((order, stereo, atom))
}
