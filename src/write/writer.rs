use std::collections::HashMap;

use crate::attribution::{Attribution, AttributionMap, TokenAttribution};
use crate::feature::BondOrder;
use crate::graph::{Atom, DirBond, MoleculeGraph};

/// Serializes a molecular graph to SMILES, walking each fragment
/// depth-first in adjacency order. Returns the string together with the
/// per-token attribution records carried by the graph (empty lists when
/// the graph tracks none).
pub fn write_smiles(graph: &MoleculeGraph) -> (String, AttributionMap) {
    let mut writer = Writer {
        graph,
        out: Vec::new(),
        digits: RingDigits::default(),
    };

    for (count, &root) in graph.roots().iter().enumerate() {
        if count > 0 {
            writer.push(".".to_string(), Vec::new());
        }
        writer.atom_token(root);
        writer.chain(root);
    }

    let text = writer
        .out
        .iter()
        .map(|token| token.token.as_str())
        .collect();
    (text, writer.out)
}

struct Writer<'a> {
    graph: &'a MoleculeGraph,
    out: AttributionMap,
    digits: RingDigits,
}

impl Writer<'_> {
    fn push(&mut self, token: String, attribution: Vec<Attribution>) {
        self.out.push(TokenAttribution { token, attribution });
    }

    fn chain(&mut self, index: usize) {
        let bonds = self.graph.out_bonds(index);

        // Ring digits attach directly to the atom token, ahead of any
        // branch.
        for bond in bonds.iter().filter(|bond| bond.ring) {
            let rnum = self.digits.hit(bond.src, bond.dst);
            let token = format!("{}{}", bond_text(self.graph, bond), rnum_text(rnum));
            let attribution = self.graph.bond_attribution(bond.src, bond.dst).to_vec();
            self.push(token, attribution);
        }

        let plain: Vec<&DirBond> = bonds.iter().filter(|bond| !bond.ring).collect();
        for (count, bond) in plain.iter().enumerate() {
            let last = count + 1 == plain.len();
            if !last {
                self.push("(".to_string(), Vec::new());
            }

            let text = bond_text(self.graph, bond);
            if !text.is_empty() {
                let attribution = self.graph.bond_attribution(bond.src, bond.dst).to_vec();
                self.push(text, attribution);
            }

            self.atom_token(bond.dst);
            self.chain(bond.dst);

            if !last {
                self.push(")".to_string(), Vec::new());
            }
        }
    }

    fn atom_token(&mut self, index: usize) {
        let token = atom_text(self.graph.atom(index));
        let attribution = self.graph.atom_attribution(index).to_vec();
        self.push(token, attribution);
    }
}

fn bond_text(graph: &MoleculeGraph, bond: &DirBond) -> String {
    match bond.order {
        BondOrder::Single => bond
            .stereo
            .map_or_else(String::new, |stereo| stereo.token().to_string()),
        BondOrder::Double => "=".to_string(),
        BondOrder::Triple => "#".to_string(),
        BondOrder::Aromatic => {
            // An aromatic bond between two aromatic atoms is implied.
            if graph.atom(bond.src).is_aromatic() && graph.atom(bond.dst).is_aromatic() {
                String::new()
            } else {
                "-".to_string()
            }
        }
    }
}

fn atom_text(atom: &Atom) -> String {
    let symbol = atom.element().symbol();
    let organic = matches!(
        symbol,
        "B" | "C" | "N" | "O" | "P" | "S" | "F" | "Cl" | "Br" | "I"
    );
    let aromatic_organic = matches!(symbol, "B" | "C" | "N" | "O" | "P" | "S");

    let plain = atom.isotope_mass().is_none()
        && atom.chirality_mark().is_none()
        && atom.hydrogen_count().is_none()
        && atom.charge_value() == 0
        && if atom.is_aromatic() {
            aromatic_organic
        } else {
            organic
        };

    if plain {
        return if atom.is_aromatic() {
            symbol.to_lowercase()
        } else {
            symbol.to_string()
        };
    }

    let mut out = String::from("[");
    if let Some(isotope) = atom.isotope_mass() {
        out.push_str(&isotope.to_string());
    }
    if atom.is_aromatic() {
        out.push_str(&symbol.to_lowercase());
    } else {
        out.push_str(symbol);
    }
    if let Some(chirality) = atom.chirality_mark() {
        out.push_str(&chirality.to_string());
    }
    match atom.hydrogen_count() {
        None => {}
        Some(1) => out.push('H'),
        Some(count) => {
            out.push('H');
            out.push_str(&count.to_string());
        }
    }
    match atom.charge_value() {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        charge if charge > 0 => out.push_str(&format!("+{charge}")),
        charge => out.push_str(&charge.to_string()),
    }
    out.push(']');
    out
}

fn rnum_text(rnum: u8) -> String {
    if rnum <= 9 {
        rnum.to_string()
    } else {
        format!("%{rnum:02}")
    }
}

/// Allocates ring-closure numbers, pairing the two sightings of each
/// ring bond and recycling numbers once their ring closes. Numbers above
/// nine render in the `%nn` form.
#[derive(Debug, Default)]
struct RingDigits {
    open: HashMap<(usize, usize), u8>,
    free: Vec<u8>,
    next: u8,
}

impl RingDigits {
    fn hit(&mut self, a: usize, b: usize) -> u8 {
        let key = if a < b { (a, b) } else { (b, a) };

        if let Some(rnum) = self.open.remove(&key) {
            self.free.push(rnum);
            return rnum;
        }

        let rnum = self.free.pop().unwrap_or_else(|| {
            self.next += 1;
            assert!(self.next <= 99, "ring numbers exhausted");
            self.next
        });
        self.open.insert(key, rnum);
        rnum
    }
}
