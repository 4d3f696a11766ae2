//! Bonding-capacity constraints: how many bond-order units each atom kind
//! may carry. A single process-wide table drives both codecs; swapping it
//! also discards every cache derived from it.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock, OnceLock, RwLock};

use mendeleev::Element;
use thiserror::Error;

use crate::feature::ElementExt;
use crate::grammar;

/// An error raised while installing a custom constraint table.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConstraintsError {
    #[error("constraint table is missing the fallback key \"?\"")]
    MissingFallback,
    #[error("constraint key is not an element or charged element: {0}")]
    InvalidKey(String),
}

/// A validated mapping from atom key (`"C"`, `"N+1"`, `"?"`) to the
/// maximum sum of bond orders that atom kind may carry.
///
/// The caches derived from a table (its robust alphabet and its
/// per-element capacity memo) are owned by the table itself, so replacing
/// the active table invalidates them wholesale.
#[derive(Debug)]
pub struct Constraints {
    limits: HashMap<String, u8>,
    fallback: u8,
    robust_alphabet: OnceLock<BTreeSet<String>>,
    capacities: RwLock<HashMap<(Element, i8), u8>>,
}

impl Constraints {
    pub(crate) fn new(limits: HashMap<String, u8>) -> Result<Self, ConstraintsError> {
        let Some(&fallback) = limits.get("?") else {
            return Err(ConstraintsError::MissingFallback);
        };

        for key in limits.keys() {
            if key != "?" {
                parse_key(key).ok_or_else(|| ConstraintsError::InvalidKey(key.clone()))?;
            }
        }

        Ok(Self {
            limits,
            fallback,
            robust_alphabet: OnceLock::new(),
            capacities: RwLock::new(HashMap::new()),
        })
    }

    /// Maximum bond-order sum for `element` carrying `charge`, before any
    /// explicit hydrogens are subtracted. Unlisted atom kinds fall back to
    /// the `"?"` entry.
    pub fn bonding_capacity(&self, element: Element, charge: i8) -> u8 {
        if let Some(&capacity) = self
            .capacities
            .read()
            .expect("capacity memo lock")
            .get(&(element, charge))
        {
            return capacity;
        }

        let key = atom_key(element, charge);
        let capacity = self.limits.get(&key).copied().unwrap_or(self.fallback);

        self.capacities
            .write()
            .expect("capacity memo lock")
            .insert((element, charge), capacity);

        capacity
    }

    /// The set of SELFIES symbols derivable under this table.
    pub fn robust_alphabet(&self) -> &BTreeSet<String> {
        self.robust_alphabet.get_or_init(|| {
            let mut alphabet = BTreeSet::new();

            for (key, &capacity) in &self.limits {
                let Some((element, charge)) = parse_key(key) else {
                    continue;
                };
                let body = atom_key(element, charge);

                alphabet.insert(format!("[{body}]"));
                if capacity >= 2 {
                    alphabet.insert(format!("[={body}]"));
                }
                if capacity >= 3 {
                    alphabet.insert(format!("[#{body}]"));
                }
            }

            for order in ["", "=", "#"] {
                for size in 1..=3 {
                    alphabet.insert(format!("[{order}Branch{size}]"));
                    alphabet.insert(format!("[{order}Ring{size}]"));
                }
            }

            alphabet
        })
    }

    /// A copy of the raw key/limit mapping.
    pub fn limits(&self) -> HashMap<String, u8> {
        self.limits.clone()
    }
}

/// Formats the table key for an element/charge pair: `"C"`, `"N+1"`,
/// `"O-1"`.
fn atom_key(element: Element, charge: i8) -> String {
    if charge == 0 {
        element.symbol().to_string()
    } else {
        format!("{}{:+}", element.symbol(), charge)
    }
}

/// Splits a table key into its element and charge, rejecting anything
/// that is not `<element>` or `<element><signed nonzero integer>`.
fn parse_key(key: &str) -> Option<(Element, i8)> {
    let sign = key.find(['+', '-']);

    let (symbol, charge) = match sign {
        None => (key, 0),
        Some(at) => {
            let charge: i8 = key[at..].parse().ok()?;
            if charge == 0 {
                return None;
            }
            (&key[..at], charge)
        }
    };

    Element::from_symbol(symbol).map(|element| (element, charge))
}

fn default_limits() -> HashMap<String, u8> {
    [
        ("H", 1),
        ("F", 1),
        ("Cl", 1),
        ("Br", 1),
        ("I", 1),
        ("B", 3),
        ("B+1", 2),
        ("B-1", 4),
        ("O", 2),
        ("O+1", 3),
        ("O-1", 1),
        ("N", 3),
        ("N+1", 4),
        ("N-1", 2),
        ("C", 4),
        ("C+1", 5),
        ("C-1", 3),
        ("P", 5),
        ("P+1", 6),
        ("P-1", 4),
        ("S", 6),
        ("S+1", 7),
        ("S-1", 5),
        ("?", 8),
    ]
    .into_iter()
    .map(|(key, limit)| (key.to_string(), limit))
    .collect()
}

fn octet_rule_limits() -> HashMap<String, u8> {
    let mut limits = default_limits();
    for (key, limit) in [
        ("S", 2),
        ("S+1", 3),
        ("S-1", 1),
        ("P", 3),
        ("P+1", 4),
        ("P-1", 2),
    ] {
        limits.insert(key.to_string(), limit);
    }
    limits
}

fn hypervalent_limits() -> HashMap<String, u8> {
    let mut limits = default_limits();
    for (key, limit) in [("Cl", 7), ("Br", 7), ("I", 7), ("N", 5)] {
        limits.insert(key.to_string(), limit);
    }
    limits
}

/// Returns a copy of a preset constraint table. Recognized names are
/// `"default"`, `"octet_rule"` and `"hypervalent"`.
pub fn get_preset_constraints(name: &str) -> Option<HashMap<String, u8>> {
    match name {
        "default" => Some(default_limits()),
        "octet_rule" => Some(octet_rule_limits()),
        "hypervalent" => Some(hypervalent_limits()),
        _ => None,
    }
}

static ACTIVE: LazyLock<RwLock<Arc<Constraints>>> = LazyLock::new(|| {
    RwLock::new(Arc::new(
        Constraints::new(default_limits()).expect("default constraint table"),
    ))
});

/// A consistent snapshot of the active table. Codec calls take one
/// snapshot up front so a concurrent swap cannot split a derivation
/// between two tables.
pub(crate) fn active() -> Arc<Constraints> {
    ACTIVE.read().expect("constraints lock").clone()
}

/// Installs `limits` as the process-wide constraint table. The mapping
/// must contain the fallback key `"?"`; every other key must name an
/// element, optionally followed by a signed non-zero charge.
pub fn set_semantic_constraints(limits: HashMap<String, u8>) -> Result<(), ConstraintsError> {
    let table = Constraints::new(limits)?;
    *ACTIVE.write().expect("constraints lock") = Arc::new(table);
    grammar::flush_symbol_cache();
    Ok(())
}

/// Restores the `default` preset.
pub fn set_default_constraints() {
    *ACTIVE.write().expect("constraints lock") = Arc::new(
        Constraints::new(default_limits()).expect("default constraint table"),
    );
    grammar::flush_symbol_cache();
}

/// Returns a fresh copy of the active key/limit mapping. Mutating the
/// returned map does not affect the installed table.
pub fn get_semantic_constraints() -> HashMap<String, u8> {
    active().limits()
}

/// The set of SELFIES symbols currently considered derivable.
pub fn get_semantic_robust_alphabet() -> BTreeSet<String> {
    active().robust_alphabet().clone()
}

/// A throwaway copy of the default table for unit tests that must not
/// touch the process-wide one.
#[cfg(test)]
pub(crate) fn test_table() -> Constraints {
    Constraints::new(default_limits()).expect("default constraint table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_capacities() {
        let table = Constraints::new(default_limits()).unwrap();

        assert_eq!(table.bonding_capacity(Element::C, 0), 4);
        assert_eq!(table.bonding_capacity(Element::C, 1), 5);
        assert_eq!(table.bonding_capacity(Element::N, -1), 2);
        assert_eq!(table.bonding_capacity(Element::S, 0), 6);
    }

    #[test]
    fn unknown_atom_falls_back() {
        let table = Constraints::new(default_limits()).unwrap();

        assert_eq!(table.bonding_capacity(Element::Fe, 0), 8);
        assert_eq!(table.bonding_capacity(Element::C, 3), 8);
    }

    #[test]
    fn capacity_is_memoized() {
        let table = Constraints::new(default_limits()).unwrap();

        assert_eq!(table.bonding_capacity(Element::P, 0), 5);
        assert!(table
            .capacities
            .read()
            .unwrap()
            .contains_key(&(Element::P, 0)));
    }

    #[test]
    fn octet_rule_restricts_sulfur_and_phosphorus() {
        let limits = octet_rule_limits();

        assert_eq!(limits["S"], 2);
        assert_eq!(limits["P"], 3);
        assert_eq!(limits["C"], 4);
    }

    #[test]
    fn hypervalent_extends_halogens() {
        let limits = hypervalent_limits();

        assert_eq!(limits["Cl"], 7);
        assert_eq!(limits["N"], 5);
    }

    #[test]
    fn rejects_missing_fallback() {
        let mut limits = default_limits();
        limits.remove("?");

        assert_eq!(
            Constraints::new(limits).unwrap_err(),
            ConstraintsError::MissingFallback
        );
    }

    #[test]
    fn rejects_bad_keys() {
        for bad in ["Xx", "C+0", "C++1", "c", "1C"] {
            let mut limits = default_limits();
            limits.insert(bad.to_string(), 4);

            assert_eq!(
                Constraints::new(limits).unwrap_err(),
                ConstraintsError::InvalidKey(bad.to_string()),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn preset_lookup() {
        assert!(get_preset_constraints("default").is_some());
        assert!(get_preset_constraints("octet_rule").is_some());
        assert!(get_preset_constraints("hypervalent").is_some());
        assert!(get_preset_constraints("nonsense").is_none());
    }

    #[test]
    fn robust_alphabet_respects_capacity() {
        let table = Constraints::new(default_limits()).unwrap();
        let alphabet = table.robust_alphabet();

        assert!(alphabet.contains("[C]"));
        assert!(alphabet.contains("[#C]"));
        assert!(alphabet.contains("[F]"));
        assert!(!alphabet.contains("[=F]"));
        assert!(alphabet.contains("[N+1]"));
        assert!(alphabet.contains("[=Branch2]"));
        assert!(alphabet.contains("[Ring3]"));
    }
}
