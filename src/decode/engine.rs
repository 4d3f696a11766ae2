use super::cursor::Cursor;
use super::DecodeError;
use crate::attribution::Attribution;
use crate::constraints::Constraints;
use crate::feature::{BondOrder, Stereo};
use crate::grammar::{parse_symbol, SymbolKind};
use crate::graph::MoleculeGraph;

/// A ring bond noticed during derivation, resolved after every fragment
/// has been derived.
#[derive(Debug)]
pub(super) struct PendingRing {
    left: usize,
    right: usize,
    order: u8,
    stereo: (Option<Stereo>, Option<Stereo>),
    attribution: Vec<Attribution>,
}

pub(super) struct Derivation<'a> {
    pub graph: MoleculeGraph,
    pub rings: Vec<PendingRing>,
    pub table: &'a Constraints,
    pub selfies: &'a str,
}

impl Derivation<'_> {
    /// Runs the derivation state machine over one frame: the main chain
    /// of a fragment, or a branch consuming from its parent's cursor.
    ///
    /// `state` is the number of bonds still available on `prev`; at zero,
    /// atoms keep arriving but start fresh fragments. Returns the number
    /// of symbols consumed, which the parent counts against its own
    /// budget.
    pub fn derive(
        &mut self,
        cursor: &mut Cursor,
        budget: usize,
        init_state: u8,
        root: Option<usize>,
        stack: &mut Vec<Attribution>,
    ) -> Result<usize, DecodeError> {
        let mut consumed = 0;
        let mut state = init_state;
        let mut prev = root;

        while consumed < budget {
            let Some(token) = cursor.next() else {
                break;
            };
            consumed += 1;

            let Some(kind) = parse_symbol(token.text) else {
                return Err(DecodeError::InvalidSymbol {
                    symbol: token.text.to_string(),
                    selfies: self.selfies.to_string(),
                });
            };

            match kind {
                SymbolKind::Nop => {}
                SymbolKind::Epsilon => {
                    state = 0;
                }
                SymbolKind::Atom {
                    order,
                    stereo,
                    atom,
                } => {
                    let capacity = atom.bonding_capacity(self.table);
                    let bond_order = order.min(state).min(capacity);
                    stack.push(Attribution::new(token.index, token.text));

                    let index = match prev {
                        Some(prev) if bond_order > 0 => {
                            let index = self.graph.add_atom(atom, false);
                            self.graph.add_bond(
                                prev,
                                index,
                                BondOrder::from_size(bond_order).expect("clamped bond order"),
                                stereo,
                            );
                            self.graph.attach_bond_attribution(prev, index, stack.clone());
                            index
                        }
                        _ => self.graph.add_atom(atom, true),
                    };

                    self.graph.attach_atom_attribution(index, stack.clone());
                    stack.pop();

                    prev = Some(index);
                    state = capacity - bond_order;
                }
                SymbolKind::Branch { order, tail } => {
                    stack.push(Attribution::new(token.index, token.text));
                    let (length, used) = cursor.take_index(tail);
                    consumed += used;

                    if state >= 2 {
                        let branch_state = order.min(state - 1);
                        consumed +=
                            self.derive(cursor, length + 1, branch_state, prev, stack)?;
                        state -= branch_state;
                    }
                    stack.pop();
                }
                SymbolKind::Ring {
                    order,
                    tail,
                    stereo,
                } => {
                    stack.push(Attribution::new(token.index, token.text));
                    let (offset, used) = cursor.take_index(tail);
                    consumed += used;

                    if state >= 1 {
                        if let Some(prev) = prev {
                            let left = prev.saturating_sub(offset + 1);
                            let ring_order = order.min(state);
                            self.rings.push(PendingRing {
                                left,
                                right: prev,
                                order: ring_order,
                                stereo,
                                attribution: stack.clone(),
                            });
                            state -= ring_order;
                        }
                    }
                    stack.pop();
                }
            }
        }

        Ok(consumed)
    }

    /// Ties off the deferred ring bonds. Each pair is handled
    /// independently: exhausted endpoints skip the ring, orders clamp to
    /// the smaller free capacity, and a ring over an existing bond raises
    /// that bond's order instead, capped at a triple.
    pub fn resolve_rings(&mut self) {
        let rings = std::mem::take(&mut self.rings);

        for ring in rings {
            if ring.left == ring.right {
                continue;
            }

            let free_left = self.free_capacity(ring.left);
            let free_right = self.free_capacity(ring.right);
            if free_left == 0 || free_right == 0 {
                continue;
            }

            let order = ring.order.min(free_left).min(free_right);
            match self.graph.get_dir_bond(ring.left, ring.right) {
                Some(existing) => {
                    let raised = (existing.order.size() + order).min(3);
                    self.graph.update_bond_order(
                        ring.left,
                        ring.right,
                        BondOrder::from_size(raised).expect("bounded bond order"),
                    );
                }
                None => {
                    self.graph.add_ring_bond(
                        ring.left,
                        ring.right,
                        BondOrder::from_size(order).expect("clamped bond order"),
                        ring.stereo.0,
                        ring.stereo.1,
                        None,
                        None,
                    );
                    self.graph
                        .attach_bond_attribution(ring.left, ring.right, ring.attribution);
                }
            }
        }
    }

    fn free_capacity(&self, index: usize) -> u8 {
        self.graph
            .atom(index)
            .bonding_capacity(self.table)
            .saturating_sub(self.graph.bond_count(index))
    }
}
