use crate::attribution::{AttributionMap, TokenAttribution};
use crate::feature::{BondOrder, Stereo};
use crate::grammar::symbols_from_index;
use crate::graph::{Atom, DirBond, MoleculeGraph};

/// Emits the SELFIES symbol stream for a kekulized graph.
///
/// Each fragment is walked depth-first in adjacency order. At every atom
/// the ring bonds closing here come first, then every outgoing bond but
/// the last opens a branch, and the last bond continues the chain.
pub(super) fn emit(graph: &MoleculeGraph) -> (String, AttributionMap) {
    let mut tokens: AttributionMap = Vec::new();

    for (count, &root) in graph.roots().iter().enumerate() {
        if count > 0 {
            tokens.push(TokenAttribution {
                token: ".".to_string(),
                attribution: Vec::new(),
            });
        }
        tokens.push(atom_token(graph, root, None));
        tokens.extend(chain_tokens(graph, root));
    }

    let text = tokens.iter().map(|token| token.token.as_str()).collect();
    (text, tokens)
}

fn chain_tokens(graph: &MoleculeGraph, index: usize) -> AttributionMap {
    let mut out = Vec::new();
    let bonds = graph.out_bonds(index);

    for bond in bonds.iter().filter(|bond| bond.ring && bond.dst < bond.src) {
        out.extend(ring_tokens(graph, bond));
    }

    let plain: Vec<&DirBond> = bonds.iter().filter(|bond| !bond.ring).collect();
    for (count, bond) in plain.iter().enumerate() {
        let mut sub = vec![atom_token(graph, bond.dst, Some(bond))];
        sub.extend(chain_tokens(graph, bond.dst));

        if count + 1 < plain.len() {
            let tail = symbols_from_index(sub.len() - 1);
            let attribution = graph.atom_attribution(index).to_vec();

            out.push(TokenAttribution {
                token: format!("[{}Branch{}]", bond.order, tail.len()),
                attribution: attribution.clone(),
            });
            for digit in tail {
                out.push(TokenAttribution {
                    token: digit.to_string(),
                    attribution: attribution.clone(),
                });
            }
        }
        out.extend(sub);
    }

    out
}

/// The closing tokens of a ring bond, emitted at its higher-indexed
/// endpoint. The index tail encodes how far back the partner sits.
fn ring_tokens(graph: &MoleculeGraph, bond: &DirBond) -> AttributionMap {
    let tail = symbols_from_index(bond.src - bond.dst - 1);

    let left = graph
        .get_dir_bond(bond.dst, bond.src)
        .and_then(|forward| forward.stereo);
    let right = bond.stereo;

    let token = if bond.order.size() == 1 && (left.is_some() || right.is_some()) {
        format!(
            "[{}{}Ring{}]",
            stereo_mark(left),
            stereo_mark(right),
            tail.len()
        )
    } else {
        format!("[{}Ring{}]", bond.order, tail.len())
    };

    let attribution = [
        graph.atom_attribution(bond.dst),
        graph.atom_attribution(bond.src),
    ]
    .concat();

    let mut out = vec![TokenAttribution {
        token,
        attribution: attribution.clone(),
    }];
    for digit in tail {
        out.push(TokenAttribution {
            token: digit.to_string(),
            attribution: attribution.clone(),
        });
    }
    out
}

fn stereo_mark(stereo: Option<Stereo>) -> char {
    stereo.map_or('-', |stereo| stereo.token())
}

fn atom_token(graph: &MoleculeGraph, index: usize, incoming: Option<&DirBond>) -> TokenAttribution {
    let atom = graph.atom(index);
    let mut body = String::new();

    if let Some(bond) = incoming {
        match bond.order {
            BondOrder::Single | BondOrder::Aromatic => {
                if let Some(stereo) = bond.stereo {
                    body.push(stereo.token());
                }
            }
            BondOrder::Double => body.push('='),
            BondOrder::Triple => body.push('#'),
        }
    }

    body.push_str(&atom_body(atom));

    TokenAttribution {
        token: format!("[{body}]"),
        attribution: graph.atom_attribution(index).to_vec(),
    }
}

fn atom_body(atom: &Atom) -> String {
    let mut body = String::new();

    if let Some(isotope) = atom.isotope_mass() {
        body.push_str(&isotope.to_string());
    }
    body.push_str(atom.element().symbol());
    if let Some(chirality) = atom.chirality_mark() {
        body.push_str(&chirality.to_string());
    }
    if let Some(hydrogens) = atom.hydrogen_count() {
        body.push('H');
        body.push_str(&hydrogens.to_string());
    }
    match atom.charge_value() {
        0 => {}
        charge if charge > 0 => body.push_str(&format!("+{charge}")),
        charge => body.push_str(&charge.to_string()),
    }

    body
}

/// Flips `@`/`@@` on atoms whose neighbor order changes between the two
/// notations. Ring closures are read back before branches when decoding,
/// so an atom with ring bonds sees its neighbors permuted; an odd
/// permutation inverts the marker.
pub(super) fn correct_ring_chirality(graph: &mut MoleculeGraph) {
    for index in 0..graph.len() {
        if graph.atom(index).chirality_mark().is_none() || !graph.has_ring_bond(index) {
            continue;
        }

        let mut closes = Vec::new();
        let mut opens = Vec::new();
        let mut rest = Vec::new();
        for (position, bond) in graph.out_bonds(index).iter().enumerate() {
            if !bond.ring {
                rest.push(position);
            } else if bond.dst < index {
                closes.push(position);
            } else {
                opens.push((bond.dst, position));
            }
        }
        opens.sort_unstable();

        let order: Vec<usize> = closes
            .into_iter()
            .chain(opens.into_iter().map(|(_, position)| position))
            .chain(rest)
            .collect();

        if inversions(&order) % 2 == 1 {
            graph.atom_mut(index).invert_chirality();
        }
    }
}

fn inversions(values: &[usize]) -> usize {
    let mut count = 0;
    for (at, &value) in values.iter().enumerate() {
        count += values[at + 1..].iter().filter(|&&later| later < value).count();
    }
    count
}
