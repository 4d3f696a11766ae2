use std::collections::{HashMap, HashSet};

use super::{Atom, DirBond};
use crate::attribution::Attribution;
use crate::feature::{BondOrder, Stereo};

/// Key into the attribution side-map. Bonds are keyed by their unordered
/// endpoint pair so both orientations share one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum AttributionKey {
    Atom(usize),
    Bond(usize, usize),
}

fn bond_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// An adjacency-list molecular graph shared by both codecs.
///
/// Atom indices are dense and never recycled. Each atom's outgoing bond
/// list preserves insertion order, which in turn dictates traversal order
/// during generation. Non-ring bonds live only on their source atom; ring
/// bonds are mirrored on both endpoints and must be updated in tandem.
#[derive(Debug)]
pub struct MoleculeGraph {
    pub(super) atoms: Vec<Atom>,
    pub(super) roots: Vec<usize>,
    pub(super) adjacency: Vec<Vec<DirBond>>,
    pub(super) bond_keys: HashSet<(usize, usize)>,
    pub(super) bond_counts: Vec<u8>,
    pub(super) ring_flags: Vec<bool>,
    /// Undirected adjacency over atoms joined by order-1.5 bonds. Empty
    /// once the graph is kekulized.
    pub(super) aromatic_subgraph: HashMap<usize, Vec<usize>>,
    attributions: Option<HashMap<AttributionKey, Vec<Attribution>>>,
}

impl MoleculeGraph {
    pub fn new(attributable: bool) -> Self {
        Self {
            atoms: Vec::new(),
            roots: Vec::new(),
            adjacency: Vec::new(),
            bond_keys: HashSet::new(),
            bond_counts: Vec::new(),
            ring_flags: Vec::new(),
            aromatic_subgraph: HashMap::new(),
            attributions: attributable.then(HashMap::new),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atom(&self, index: usize) -> &Atom {
        &self.atoms[index]
    }

    pub fn atom_mut(&mut self, index: usize) -> &mut Atom {
        &mut self.atoms[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Outgoing bonds of `index` in insertion order.
    pub fn out_bonds(&self, index: usize) -> &[DirBond] {
        &self.adjacency[index]
    }

    /// Sum of incident bond orders (aromatic bonds count as single until
    /// kekulization promotes half of them).
    pub fn bond_count(&self, index: usize) -> u8 {
        self.bond_counts[index]
    }

    pub fn has_ring_bond(&self, index: usize) -> bool {
        self.ring_flags[index]
    }

    pub fn is_kekulized(&self) -> bool {
        self.aromatic_subgraph.is_empty()
    }

    /// Appends `atom` and returns its index. Root atoms start a new
    /// fragment in the serialized output.
    pub fn add_atom(&mut self, atom: Atom, mark_root: bool) -> usize {
        let index = self.atoms.len();

        if mark_root {
            self.roots.push(index);
        }
        if atom.is_aromatic() {
            self.aromatic_subgraph.entry(index).or_default();
        }

        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.bond_counts.push(0);
        self.ring_flags.push(false);

        index
    }

    /// Adds a non-ring bond. The source must precede the destination and
    /// the endpoints must not already be bonded.
    pub fn add_bond(&mut self, src: usize, dst: usize, order: BondOrder, stereo: Option<Stereo>) {
        assert!(src < dst, "bond source must precede destination");
        assert!(
            self.bond_keys.insert((src, dst)),
            "duplicate bond ({src}, {dst})"
        );

        self.adjacency[src].push(DirBond::new(src, dst, order, stereo));
        self.bond_counts[src] += order.size();
        self.bond_counts[dst] += order.size();

        if order.is_aromatic() {
            self.link_aromatic(src, dst);
        }
    }

    /// Adds a ring bond as a mirrored pair of directed bonds. `a_pos` and
    /// `b_pos` choose slots in the respective adjacency lists; `None`
    /// appends.
    #[allow(clippy::too_many_arguments)]
    pub fn add_ring_bond(
        &mut self,
        a: usize,
        b: usize,
        order: BondOrder,
        a_stereo: Option<Stereo>,
        b_stereo: Option<Stereo>,
        a_pos: Option<usize>,
        b_pos: Option<usize>,
    ) {
        assert!(
            self.bond_keys.insert(bond_key(a, b)),
            "duplicate bond ({a}, {b})"
        );

        let a_at = a_pos.unwrap_or(self.adjacency[a].len());
        let a_at = a_at.min(self.adjacency[a].len());
        self.adjacency[a].insert(a_at, DirBond::ring(a, b, order, a_stereo));

        let b_at = b_pos.unwrap_or(self.adjacency[b].len());
        let b_at = b_at.min(self.adjacency[b].len());
        self.adjacency[b].insert(b_at, DirBond::ring(b, a, order, b_stereo));

        self.bond_counts[a] += order.size();
        self.bond_counts[b] += order.size();
        self.ring_flags[a] = true;
        self.ring_flags[b] = true;

        if order.is_aromatic() {
            self.link_aromatic(a, b);
        }
    }

    /// Rewrites the order of the bond between `a` and `b`. Ring bonds
    /// have both orientations updated; bond-count sums are adjusted on
    /// both endpoints.
    pub fn update_bond_order(&mut self, a: usize, b: usize, order: BondOrder) {
        assert!(!order.is_aromatic(), "cannot update a bond to aromatic");
        assert!(self.has_bond(a, b), "no bond between {a} and {b}");

        let mut old = None;
        for (src, dst) in [(a, b), (b, a)] {
            if let Some(bond) = self.adjacency[src].iter_mut().find(|bond| bond.dst == dst) {
                old = Some(bond.order);
                bond.order = order;
            }
        }

        let old = old.expect("stored bond orientation");
        let grew = order.size() as i16 - old.size() as i16;
        for index in [a, b] {
            self.bond_counts[index] = (self.bond_counts[index] as i16 + grew) as u8;
        }
    }

    pub fn has_bond(&self, a: usize, b: usize) -> bool {
        self.bond_keys.contains(&bond_key(a, b))
    }

    /// The bond from `src` to `dst`, synthesizing the reverse view when
    /// only the opposite orientation is stored.
    pub fn get_dir_bond(&self, src: usize, dst: usize) -> Option<DirBond> {
        if !self.has_bond(src, dst) {
            return None;
        }

        self.adjacency[src]
            .iter()
            .find(|bond| bond.dst == dst)
            .cloned()
            .or_else(|| {
                self.adjacency[dst]
                    .iter()
                    .find(|bond| bond.dst == src)
                    .map(DirBond::reversed)
            })
    }

    fn link_aromatic(&mut self, a: usize, b: usize) {
        self.aromatic_subgraph.entry(a).or_default().push(b);
        self.aromatic_subgraph.entry(b).or_default().push(a);
    }

    pub(crate) fn attach_atom_attribution(&mut self, index: usize, stack: Vec<Attribution>) {
        if let Some(attributions) = &mut self.attributions {
            attributions.insert(AttributionKey::Atom(index), stack);
        }
    }

    pub(crate) fn attach_bond_attribution(&mut self, a: usize, b: usize, stack: Vec<Attribution>) {
        if let Some(attributions) = &mut self.attributions {
            let (a, b) = bond_key(a, b);
            attributions.insert(AttributionKey::Bond(a, b), stack);
        }
    }

    pub(crate) fn atom_attribution(&self, index: usize) -> &[Attribution] {
        self.attributions
            .as_ref()
            .and_then(|attributions| attributions.get(&AttributionKey::Atom(index)))
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn bond_attribution(&self, a: usize, b: usize) -> &[Attribution] {
        let (a, b) = bond_key(a, b);
        self.attributions
            .as_ref()
            .and_then(|attributions| attributions.get(&AttributionKey::Bond(a, b)))
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mendeleev::Element;
    use pretty_assertions::assert_eq;

    fn carbon() -> Atom {
        Atom::new(Element::C)
    }

    #[test]
    fn add_atom_assigns_dense_indices() {
        let mut graph = MoleculeGraph::new(false);

        assert_eq!(graph.add_atom(carbon(), true), 0);
        assert_eq!(graph.add_atom(carbon(), false), 1);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.roots(), &[0]);
    }

    #[test]
    fn bond_counts_track_orders() {
        let mut graph = MoleculeGraph::new(false);
        graph.add_atom(carbon(), true);
        graph.add_atom(carbon(), false);
        graph.add_atom(carbon(), false);

        graph.add_bond(0, 1, BondOrder::Double, None);
        graph.add_bond(1, 2, BondOrder::Single, None);

        assert_eq!(graph.bond_count(0), 2);
        assert_eq!(graph.bond_count(1), 3);
        assert_eq!(graph.bond_count(2), 1);
    }

    #[test]
    fn ring_bonds_are_mirrored() {
        let mut graph = MoleculeGraph::new(false);
        for _ in 0..3 {
            graph.add_atom(carbon(), false);
        }
        graph.add_bond(0, 1, BondOrder::Single, None);
        graph.add_bond(1, 2, BondOrder::Single, None);
        graph.add_ring_bond(0, 2, BondOrder::Single, None, None, None, None);

        assert!(graph.has_ring_bond(0));
        assert!(graph.has_ring_bond(2));
        assert!(!graph.has_ring_bond(1));
        assert_eq!(graph.out_bonds(0).len(), 2);
        assert_eq!(graph.out_bonds(2).len(), 1);
        assert_eq!(graph.bond_count(0), 2);
        assert_eq!(graph.bond_count(2), 2);
    }

    #[test]
    fn ring_bond_position_reserves_a_slot() {
        let mut graph = MoleculeGraph::new(false);
        for _ in 0..3 {
            graph.add_atom(carbon(), false);
        }
        graph.add_bond(0, 1, BondOrder::Single, None);
        graph.add_bond(1, 2, BondOrder::Single, None);
        graph.add_ring_bond(0, 2, BondOrder::Single, None, None, Some(0), None);

        assert_eq!(graph.out_bonds(0)[0].dst, 2);
        assert_eq!(graph.out_bonds(0)[1].dst, 1);
    }

    #[test]
    fn update_bond_order_touches_both_orientations() {
        let mut graph = MoleculeGraph::new(false);
        for _ in 0..2 {
            graph.add_atom(carbon(), false);
        }
        graph.add_ring_bond(0, 1, BondOrder::Single, None, None, None, None);
        graph.update_bond_order(0, 1, BondOrder::Double);

        assert_eq!(graph.out_bonds(0)[0].order, BondOrder::Double);
        assert_eq!(graph.out_bonds(1)[0].order, BondOrder::Double);
        assert_eq!(graph.bond_count(0), 2);
        assert_eq!(graph.bond_count(1), 2);
    }

    #[test]
    fn get_dir_bond_synthesizes_the_reverse() {
        let mut graph = MoleculeGraph::new(false);
        for _ in 0..2 {
            graph.add_atom(carbon(), false);
        }
        graph.add_bond(0, 1, BondOrder::Single, Some(crate::feature::Stereo::Up));

        let forward = graph.get_dir_bond(0, 1).unwrap();
        let reverse = graph.get_dir_bond(1, 0).unwrap();

        assert_eq!(forward.stereo, Some(crate::feature::Stereo::Up));
        assert_eq!(reverse.stereo, Some(crate::feature::Stereo::Down));
        assert_eq!(reverse.src, 1);
        assert_eq!(graph.get_dir_bond(0, 0), None);
    }

    #[test]
    fn aromatic_bonds_populate_the_subgraph() {
        let mut graph = MoleculeGraph::new(false);
        graph.add_atom(carbon().aromatic(true), true);
        graph.add_atom(carbon().aromatic(true), false);
        graph.add_bond(0, 1, BondOrder::Aromatic, None);

        assert!(!graph.is_kekulized());
        assert_eq!(graph.aromatic_subgraph[&0], vec![1]);
        assert_eq!(graph.aromatic_subgraph[&1], vec![0]);
    }
}
