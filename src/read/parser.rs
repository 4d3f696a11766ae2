use std::collections::HashMap;

use mendeleev::Element;

use super::{missing_character, ReadError, Scanner};
use crate::attribution::Attribution;
use crate::feature::{BondOrder, Chirality, ElementExt, Stereo};
use crate::graph::{Atom, MoleculeGraph};

/// Reads a SMILES string into a molecular graph.
///
/// The supported subset covers organic-subset atoms, bracket atoms with
/// isotope, `@`/`@@` chirality, hydrogen count and charge, the bond
/// characters `- = # / \`, branch parentheses, single-digit ring
/// closures, and dot disconnections. An implicit bond between two
/// aromatic atoms reads as order 1.5.
pub fn read(smiles: &str, attributable: bool) -> Result<MoleculeGraph, ReadError> {
    if smiles.is_empty() {
        return Err(ReadError::EndOfLine);
    }

    Parser::new(smiles, attributable).parse()
}

/// A ring digit waiting for its partner. `slot` remembers where in the
/// opening atom's adjacency list the bond belongs, so the closure can be
/// spliced in at the position the digit was written.
#[derive(Debug)]
struct RingOpen {
    atom: usize,
    order: Option<BondOrder>,
    stereo: Option<Stereo>,
    slot: usize,
}

#[derive(Debug, Clone, Copy)]
struct PendingBond {
    order: BondOrder,
    stereo: Option<Stereo>,
}

#[derive(Debug)]
struct Parser {
    scanner: Scanner,
    graph: MoleculeGraph,
    stack: Vec<usize>,
    prev: Option<usize>,
    opens: HashMap<u8, RingOpen>,
    atoms_read: usize,
    attributable: bool,
    dangling_dot: bool,
}

impl Parser {
    fn new(smiles: &str, attributable: bool) -> Self {
        Self {
            scanner: Scanner::new(smiles),
            graph: MoleculeGraph::new(attributable),
            stack: Vec::new(),
            prev: None,
            opens: HashMap::new(),
            atoms_read: 0,
            attributable,
            dangling_dot: false,
        }
    }

    fn parse(mut self) -> Result<MoleculeGraph, ReadError> {
        let mut pending: Option<PendingBond> = None;

        while let Some(character) = self.scanner.peek() {
            match character {
                '.' => {
                    if pending.is_some() {
                        return Err(ReadError::Character(self.scanner.cursor()));
                    }
                    self.scanner.pop();
                    self.prev = None;
                    self.dangling_dot = true;
                }
                '(' => {
                    if pending.is_some() {
                        return Err(ReadError::Character(self.scanner.cursor()));
                    }
                    self.scanner.pop();
                    let prev = self
                        .prev
                        .ok_or(ReadError::Character(self.scanner.cursor()))?;
                    self.stack.push(prev);
                }
                ')' => {
                    if pending.is_some() {
                        return Err(ReadError::Character(self.scanner.cursor()));
                    }
                    self.scanner.pop();
                    let parent = self
                        .stack
                        .pop()
                        .ok_or(ReadError::Character(self.scanner.cursor() - 1))?;
                    self.prev = Some(parent);
                }
                '-' | '=' | '#' | '/' | '\\' => {
                    if pending.is_some() {
                        return Err(ReadError::Character(self.scanner.cursor()));
                    }
                    self.scanner.pop();
                    pending = Some(match character {
                        '=' => PendingBond {
                            order: BondOrder::Double,
                            stereo: None,
                        },
                        '#' => PendingBond {
                            order: BondOrder::Triple,
                            stereo: None,
                        },
                        '/' => PendingBond {
                            order: BondOrder::Single,
                            stereo: Some(Stereo::Up),
                        },
                        '\\' => PendingBond {
                            order: BondOrder::Single,
                            stereo: Some(Stereo::Down),
                        },
                        _ => PendingBond {
                            order: BondOrder::Single,
                            stereo: None,
                        },
                    });
                }
                '*' => return Err(ReadError::Wildcard(self.scanner.cursor())),
                '0'..='9' => {
                    let rnum = character as u8 - b'0';
                    self.scanner.pop();
                    self.ring_bond(rnum, pending.take())?;
                }
                '%' => {
                    self.scanner.pop();
                    let rnum = self.read_two_digit_rnum()?;
                    self.ring_bond(rnum, pending.take())?;
                }
                _ => {
                    self.read_atom(pending.take())?;
                }
            }
        }

        if pending.is_some() || self.dangling_dot || !self.stack.is_empty() {
            return Err(ReadError::EndOfLine);
        }
        if let Some(&digit) = self.opens.keys().min() {
            return Err(ReadError::UnclosedRing(digit));
        }

        Ok(self.graph)
    }

    fn read_atom(&mut self, pending: Option<PendingBond>) -> Result<(), ReadError> {
        let start = self.scanner.cursor();
        let atom = match self.scanner.peek() {
            Some('[') => self.read_bracket()?,
            Some(character) => match character {
                'B' => {
                    self.scanner.pop();
                    if self.scanner.pop_if('r') {
                        Atom::new(Element::Br)
                    } else {
                        Atom::new(Element::B)
                    }
                }
                'C' => {
                    self.scanner.pop();
                    if self.scanner.pop_if('l') {
                        Atom::new(Element::Cl)
                    } else {
                        Atom::new(Element::C)
                    }
                }
                'N' => {
                    self.scanner.pop();
                    Atom::new(Element::N)
                }
                'O' => {
                    self.scanner.pop();
                    Atom::new(Element::O)
                }
                'P' => {
                    self.scanner.pop();
                    Atom::new(Element::P)
                }
                'S' => {
                    self.scanner.pop();
                    Atom::new(Element::S)
                }
                'F' => {
                    self.scanner.pop();
                    Atom::new(Element::F)
                }
                'I' => {
                    self.scanner.pop();
                    Atom::new(Element::I)
                }
                'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                    self.scanner.pop();
                    let symbol = character.to_ascii_uppercase().to_string();
                    let element =
                        Element::from_symbol(&symbol).ok_or(ReadError::UnknownElement(start))?;
                    Atom::new(element).aromatic(true)
                }
                _ => return Err(ReadError::Character(start)),
            },
            None => return Err(ReadError::EndOfLine),
        };

        self.insert_atom(atom, pending, start)
    }

    fn read_bracket(&mut self) -> Result<Atom, ReadError> {
        self.scanner.pop();

        let isotope = self.read_isotope();
        let (element, aromatic) = self.read_symbol()?;
        let chirality = self.read_chirality()?;
        let hydrogens = self.read_hydrogens();
        let charge = self.read_charge();

        if !self.scanner.pop_if(']') {
            return Err(missing_character(&self.scanner));
        }

        Ok(Atom::new(element)
            .aromatic(aromatic)
            .isotope(isotope)
            .chirality(chirality)
            .hydrogens(hydrogens)
            .charge(charge))
    }

    fn read_isotope(&mut self) -> Option<u16> {
        let mut value: u16 = 0;
        let mut any = false;

        for _ in 0..3 {
            match self.scanner.peek() {
                Some(digit @ '0'..='9') => {
                    self.scanner.pop();
                    value = value * 10 + (digit as u16 - '0' as u16);
                    any = true;
                }
                _ => break,
            }
        }

        any.then_some(value)
    }

    fn read_symbol(&mut self) -> Result<(Element, bool), ReadError> {
        let start = self.scanner.cursor();

        match self.scanner.peek() {
            Some('*') => Err(ReadError::Wildcard(start)),
            Some(first) if first.is_ascii_uppercase() => {
                self.scanner.pop();
                let mut symbol = first.to_string();
                while let Some(next) = self.scanner.peek() {
                    if next.is_ascii_lowercase() {
                        self.scanner.pop();
                        symbol.push(next);
                    } else {
                        break;
                    }
                }
                Element::from_symbol(&symbol)
                    .map(|element| (element, false))
                    .ok_or(ReadError::UnknownElement(start))
            }
            Some(first) if first.is_ascii_lowercase() => {
                self.scanner.pop();
                let mut symbol = first.to_string();
                if let Some(next) = self.scanner.peek() {
                    if next.is_ascii_lowercase() {
                        self.scanner.pop();
                        symbol.push(next);
                    }
                }
                let aromatic = matches!(
                    symbol.as_str(),
                    "b" | "c" | "n" | "o" | "p" | "s" | "se" | "as"
                );
                if !aromatic {
                    return Err(ReadError::UnknownElement(start));
                }

                let mut characters = symbol.chars();
                let capitalized: String = characters
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .into_iter()
                    .chain(characters)
                    .collect();
                Element::from_symbol(&capitalized)
                    .map(|element| (element, true))
                    .ok_or(ReadError::UnknownElement(start))
            }
            Some(_) => Err(ReadError::Character(start)),
            None => Err(ReadError::EndOfLine),
        }
    }

    fn read_chirality(&mut self) -> Result<Option<Chirality>, ReadError> {
        if !self.scanner.pop_if('@') {
            return Ok(None);
        }
        if self.scanner.pop_if('@') {
            return Ok(Some(Chirality::Clockwise));
        }
        // @TH1, @AL2, @SP3, @TB.., @OH.. are outside the subset
        if matches!(self.scanner.peek(), Some('T' | 'A' | 'S' | 'O')) {
            return Err(ReadError::UnsupportedChirality(self.scanner.cursor() - 1));
        }
        Ok(Some(Chirality::Counterclockwise))
    }

    fn read_hydrogens(&mut self) -> Option<u8> {
        if !self.scanner.pop_if('H') {
            return None;
        }
        match self.scanner.peek() {
            Some(digit @ '0'..='9') => {
                self.scanner.pop();
                Some(digit as u8 - b'0')
            }
            _ => Some(1),
        }
    }

    fn read_charge(&mut self) -> i8 {
        let sign: i8 = if self.scanner.pop_if('+') {
            1
        } else if self.scanner.pop_if('-') {
            -1
        } else {
            return 0;
        };

        match self.scanner.peek() {
            Some('1'..='9') => {
                let first = self.scanner.pop().map_or(0, |c| c as i8 - b'0' as i8);
                if first == 1 {
                    if let Some(second @ '0'..='5') = self.scanner.peek() {
                        self.scanner.pop();
                        return sign * (10 + second as i8 - b'0' as i8);
                    }
                }
                sign * first
            }
            Some(doubled) if (doubled == '+' && sign == 1) || (doubled == '-' && sign == -1) => {
                self.scanner.pop();
                sign * 2
            }
            _ => sign,
        }
    }

    fn read_two_digit_rnum(&mut self) -> Result<u8, ReadError> {
        let mut rnum = 0;
        for _ in 0..2 {
            match self.scanner.peek() {
                Some(digit @ '0'..='9') => {
                    self.scanner.pop();
                    rnum = rnum * 10 + (digit as u8 - b'0');
                }
                _ => return Err(missing_character(&self.scanner)),
            }
        }
        Ok(rnum)
    }

    fn insert_atom(
        &mut self,
        atom: Atom,
        pending: Option<PendingBond>,
        start: usize,
    ) -> Result<(), ReadError> {
        let index = match self.prev {
            None => {
                if pending.is_some() {
                    return Err(ReadError::Character(start));
                }
                self.graph.add_atom(atom, true)
            }
            Some(prev) => {
                let aromatic_pair = self.graph.atom(prev).is_aromatic() && atom.is_aromatic();
                let (order, stereo) = match pending {
                    Some(bond) => (bond.order, bond.stereo),
                    None if aromatic_pair => (BondOrder::Aromatic, None),
                    None => (BondOrder::Single, None),
                };

                let index = self.graph.add_atom(atom, false);
                self.graph.add_bond(prev, index, order, stereo);
                index
            }
        };

        if self.attributable {
            let token = self.scanner.slice(start, self.scanner.cursor());
            self.graph
                .attach_atom_attribution(index, vec![Attribution::new(self.atoms_read, token)]);
        }

        self.atoms_read += 1;
        self.prev = Some(index);
        self.dangling_dot = false;
        Ok(())
    }

    fn ring_bond(&mut self, rnum: u8, pending: Option<PendingBond>) -> Result<(), ReadError> {
        let at = self.scanner.cursor() - 1;
        let prev = self.prev.ok_or(ReadError::Character(at))?;

        match self.opens.remove(&rnum) {
            Some(open) => {
                if open.atom == prev || self.graph.has_bond(open.atom, prev) {
                    return Err(ReadError::Character(at));
                }

                let close_order = pending.map(|bond| bond.order);
                let close_stereo = pending.and_then(|bond| bond.stereo);
                let order = match (open.order, close_order) {
                    (None, None) => BondOrder::Single,
                    (Some(order), None) | (None, Some(order)) => order,
                    (Some(a), Some(b)) => {
                        if a.size() >= b.size() {
                            a
                        } else {
                            b
                        }
                    }
                };
                let aromatic_pair =
                    self.graph.atom(open.atom).is_aromatic() && self.graph.atom(prev).is_aromatic();
                let order = if order == BondOrder::Single && aromatic_pair {
                    BondOrder::Aromatic
                } else {
                    order
                };

                self.graph.add_ring_bond(
                    open.atom,
                    prev,
                    order,
                    open.stereo,
                    close_stereo,
                    Some(open.slot),
                    None,
                );
            }
            None => {
                let reserved = self
                    .opens
                    .values()
                    .filter(|other| other.atom == prev)
                    .count();
                let slot = self.graph.out_bonds(prev).len() + reserved;
                self.opens.insert(
                    rnum,
                    RingOpen {
                        atom: prev,
                        order: pending.map(|bond| bond.order),
                        stereo: pending.and_then(|bond| bond.stereo),
                        slot,
                    },
                );
            }
        }

        Ok(())
    }
}
