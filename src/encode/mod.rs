mod emit;
mod error;

pub use error::EncodeError;

use crate::attribution::AttributionMap;
use crate::constraints;
use crate::read;

/// Translates a SMILES string into SELFIES.
///
/// The input is parsed, kekulized, and checked against the active
/// bonding-capacity constraints; the resulting SELFIES decodes back to
/// an equivalent molecule.
pub fn encode(smiles: &str) -> Result<String, EncodeError> {
    encode_inner(smiles, false).map(|(selfies, _)| selfies)
}

/// Like [`encode`], additionally reporting, for every output symbol, the
/// source atoms it derives from.
pub fn encode_attributed(smiles: &str) -> Result<(String, AttributionMap), EncodeError> {
    encode_inner(smiles, true)
}

fn encode_inner(smiles: &str, attribute: bool) -> Result<(String, AttributionMap), EncodeError> {
    let table = constraints::active();

    let mut graph = read::read(smiles, attribute).map_err(|source| EncodeError::Read {
        smiles: smiles.to_string(),
        source,
    })?;

    if !graph.kekulize() {
        return Err(EncodeError::Kekulization {
            smiles: smiles.to_string(),
        });
    }

    for atom in 0..graph.len() {
        let capacity = graph.atom(atom).bonding_capacity(&table);
        let total = graph.bond_count(atom);
        if total > capacity {
            return Err(EncodeError::Capacity {
                smiles: smiles.to_string(),
                atom,
                total,
                capacity,
            });
        }
    }

    emit::correct_ring_chirality(&mut graph);
    Ok(emit::emit(&graph))
}
