use std::collections::HashMap;

use mendeleev::Element;

use super::{find_perfect_matching, MoleculeGraph};
use crate::feature::BondOrder;

/// Valences an element may adopt inside a delocalized ring system.
const fn aromatic_valences(element: Element) -> Option<&'static [u8]> {
    match element {
        Element::B | Element::Al => Some(&[3]),
        Element::C | Element::Si => Some(&[4]),
        Element::N | Element::P | Element::As => Some(&[3, 5]),
        Element::O => Some(&[2]),
        Element::S | Element::Se | Element::Te => Some(&[2, 4, 6]),
        _ => None,
    }
}

const fn valence_electrons(element: Element) -> i16 {
    match element {
        Element::B | Element::Al => 3,
        Element::C | Element::Si => 4,
        Element::N | Element::P | Element::As => 5,
        Element::O | Element::S | Element::Se | Element::Te => 6,
        _ => 0,
    }
}

impl MoleculeGraph {
    /// Replaces every order-1.5 bond with alternating single and double
    /// bonds and clears the aromatic flags. Returns `false` when the
    /// delocalized subgraph admits no perfect matching, leaving the graph
    /// untouched.
    pub fn kekulize(&mut self) -> bool {
        if self.aromatic_subgraph.is_empty() {
            return true;
        }

        // Vertices that provably cannot host a double bond are excluded
        // before matching; a wrongly kept vertex only costs a matching
        // failure, never a wrong assignment.
        let mut kept: Vec<usize> = self
            .aromatic_subgraph
            .keys()
            .copied()
            .filter(|&node| self.hosts_pi_bond(node))
            .collect();
        kept.sort_unstable();

        let label_of: HashMap<usize, usize> = kept
            .iter()
            .enumerate()
            .map(|(label, &node)| (node, label))
            .collect();

        let pruned: Vec<Vec<usize>> = kept
            .iter()
            .map(|node| {
                self.aromatic_subgraph[node]
                    .iter()
                    .filter_map(|adj| label_of.get(adj).copied())
                    .collect()
            })
            .collect();

        let Some(matching) = find_perfect_matching(&pruned) else {
            return false;
        };

        let edges: Vec<(usize, usize)> = self
            .aromatic_subgraph
            .iter()
            .flat_map(|(&node, adjacent)| adjacent.iter().map(move |&adj| (node, adj)))
            .filter(|&(node, adj)| node < adj)
            .collect();
        for (node, adj) in edges {
            self.update_bond_order(node, adj, BondOrder::Single);
        }

        let nodes: Vec<usize> = self.aromatic_subgraph.keys().copied().collect();
        for node in nodes {
            self.atoms[node].clear_aromatic();
        }

        for (label, &partner) in matching.iter().enumerate() {
            if label < partner {
                self.update_bond_order(kept[label], kept[partner], BondOrder::Double);
            }
        }

        self.aromatic_subgraph.clear();
        true
    }

    /// Conservative test for membership in the kekule matching: the atom
    /// must have a feasible valence with room for one bond beyond its
    /// sigma framework, and an odd, positive count of electrons left
    /// after sigma bonds and hydrogens.
    fn hosts_pi_bond(&self, node: usize) -> bool {
        let neighbors = self.aromatic_subgraph[&node].len() as i16;
        if neighbors == 0 {
            return false;
        }

        let atom = &self.atoms[node];
        let Some(valences) = aromatic_valences(atom.element()) else {
            return false;
        };

        let plain = self.bond_counts[node] as i16 - neighbors;
        let hydrogens = match atom.hydrogen_count() {
            Some(count) => count as i16,
            None if atom.charge_value() == 0 => {
                (valences[0] as i16 - (plain + neighbors + 1)).max(0)
            }
            None => 0,
        };

        let electrons = valence_electrons(atom.element()) - atom.charge_value() as i16;
        let free = electrons - (plain + neighbors + hydrogens);
        if free < 1 || free % 2 == 0 {
            return false;
        }

        valences
            .iter()
            .any(|&valence| valence as i16 - (plain + hydrogens) >= neighbors + 1)
    }
}
