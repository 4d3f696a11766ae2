mod cursor;
mod engine;
mod error;

pub use error::DecodeError;

use cursor::{Cursor, Token};
use engine::Derivation;

use crate::attribution::AttributionMap;
use crate::constraints;
use crate::grammar::split_selfies;
use crate::graph::MoleculeGraph;
use crate::write::write_smiles;

/// Translates a SELFIES string into SMILES.
///
/// Every finite sequence of alphabet symbols decodes to a valid
/// molecular graph: bond orders are clamped against remaining bonding
/// capacity, impossible ring bonds are skipped, and symbols at index
/// positions that are not index digits read as zero. Errors are raised
/// only for structurally impossible input: a hanging `[`, characters
/// outside any bracket, or an unknown symbol at a derivation position.
///
/// The empty string decodes to `"C"`.
pub fn decode(selfies: &str) -> Result<String, DecodeError> {
    decode_inner(selfies, false).map(|(smiles, _)| smiles)
}

/// Like [`decode`], additionally reporting, for every output token, the
/// stack of input symbols that produced it.
pub fn decode_attributed(selfies: &str) -> Result<(String, AttributionMap), DecodeError> {
    decode_inner(selfies, true)
}

fn decode_inner(selfies: &str, attribute: bool) -> Result<(String, AttributionMap), DecodeError> {
    if selfies.is_empty() {
        return Ok(("C".to_string(), AttributionMap::new()));
    }

    let table = constraints::active();
    let mut fragments: Vec<Vec<Token>> = vec![Vec::new()];

    for (index, symbol) in split_selfies(selfies).enumerate() {
        let symbol = symbol?;
        if symbol == "." {
            fragments.push(Vec::new());
        } else if symbol != "[nop]" {
            fragments
                .last_mut()
                .expect("current fragment")
                .push(Token {
                    index,
                    text: symbol,
                });
        }
    }

    let mut derivation = Derivation {
        graph: MoleculeGraph::new(attribute),
        rings: Vec::new(),
        table: &table,
        selfies,
    };

    for tokens in fragments {
        let mut cursor = Cursor::new(tokens);
        let mut stack = Vec::new();
        derivation.derive(&mut cursor, usize::MAX, 0, None, &mut stack)?;
    }
    derivation.resolve_rings();

    Ok(write_smiles(&derivation.graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_methane_by_convention() {
        assert_eq!(decode("").unwrap(), "C");
    }

    #[test]
    fn linear_chain() {
        assert_eq!(decode("[C][C][O]").unwrap(), "CCO");
    }

    #[test]
    fn bond_orders() {
        assert_eq!(decode("[C][=C]").unwrap(), "C=C");
        assert_eq!(decode("[C][#C]").unwrap(), "C#C");
    }

    #[test]
    fn orders_clamp_to_capacity() {
        // Fluorine can take one bond, no matter what the symbol asks.
        assert_eq!(decode("[C][#F]").unwrap(), "CF");
        // Oxygen caps the triple at a double.
        assert_eq!(decode("[C][O][#C]").unwrap(), "COC");
        assert_eq!(decode("[O][#C]").unwrap(), "O=C");
    }

    #[test]
    fn saturated_atoms_start_new_fragments() {
        assert_eq!(decode("[C][F][F]").unwrap(), "CF.F");
    }

    #[test]
    fn benzene() {
        assert_eq!(
            decode("[C][=C][C][=C][C][=C][Ring1][=Branch1]").unwrap(),
            "C1=CC=CC=C1"
        );
    }

    #[test]
    fn branch() {
        assert_eq!(decode("[C][C][=Branch1][C][=O][N]").unwrap(), "CC(=O)N");
    }

    #[test]
    fn branch_with_too_little_state_is_skipped() {
        // Fluorine has one bond left after attaching, so the branch
        // symbol and its index symbol are consumed without effect.
        assert_eq!(decode("[C][F][Branch1][C][O]").unwrap(), "CF.O");
    }

    #[test]
    fn adjacent_ring_promotes_the_bond() {
        assert_eq!(decode("[C][C][Ring1][C]").unwrap(), "C=C");
    }

    #[test]
    fn epsilon_stops_bond_emission() {
        assert_eq!(decode("[C][epsilon][C]").unwrap(), "C.C");
    }

    #[test]
    fn nop_is_transparent() {
        let plain = decode("[C][C][=Branch1][C][=O][N]").unwrap();

        for spiked in [
            "[nop][C][C][=Branch1][C][=O][N]",
            "[C][C][nop][=Branch1][C][=O][N]",
            "[C][C][=Branch1][nop][C][=O][N]",
            "[C][C][=Branch1][C][=O][nop][N]",
            "[C][C][=Branch1][C][=O][N][nop]",
        ] {
            assert_eq!(decode(spiked).unwrap(), plain, "{spiked}");
        }
    }

    #[test]
    fn fragments_decode_independently() {
        assert_eq!(decode("[C].[O]").unwrap(), "C.O");
    }

    #[test]
    fn rings_without_capacity_are_skipped() {
        // After the triple bond both carbons have one bond left; the
        // requested ring is a duplicate of the existing bond and raises
        // it to the cap instead of duplicating it.
        assert_eq!(decode("[C][#C][Ring1][C]").unwrap(), "C#C");
    }

    #[test]
    fn self_loops_are_skipped() {
        assert_eq!(decode("[C][Ring1][C]").unwrap(), "C");
    }

    #[test]
    fn unknown_symbol_at_derivation_position() {
        assert_eq!(
            decode("[C][banana]").unwrap_err(),
            DecodeError::InvalidSymbol {
                symbol: "[banana]".to_string(),
                selfies: "[C][banana]".to_string()
            }
        );
    }

    #[test]
    fn unknown_symbol_at_index_position_reads_as_zero() {
        assert_eq!(
            decode("[C][C][C][Branch1][banana][O]").unwrap(),
            decode("[C][C][C][Branch1][C][O]").unwrap()
        );
    }

    #[test]
    fn hanging_bracket() {
        assert!(matches!(
            decode("[C][O"),
            Err(DecodeError::HangingBracket { .. })
        ));
    }

    #[test]
    fn attribution_tracks_branch_symbols() {
        let (smiles, map) = decode_attributed("[C][N][C][Branch1][C][P][C][C][Ring1][=Branch1]")
            .unwrap();

        assert!(smiles.contains('P'));
        let phosphorus = map
            .iter()
            .find(|token| token.token == "P")
            .expect("P token in output");
        assert!(phosphorus
            .attribution
            .iter()
            .any(|attribution| attribution.token == "[P]" && attribution.index == 5));
        assert!(phosphorus
            .attribution
            .iter()
            .any(|attribution| attribution.token == "[Branch1]"));
    }
}
