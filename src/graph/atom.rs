use std::sync::atomic::{AtomicU16, Ordering};

use mendeleev::Element;

use crate::constraints::Constraints;
use crate::feature::Chirality;

const CAPACITY_UNSET: u16 = u16::MAX;

/// A node of the molecular graph.
///
/// The bonding capacity derived from the active constraint table is
/// memoized on first use; the mutators that can change it (hydrogen
/// count, charge) reset the memo.
#[derive(Debug)]
pub struct Atom {
    element: Element,
    aromatic: bool,
    isotope: Option<u16>,
    chirality: Option<Chirality>,
    hydrogens: Option<u8>,
    charge: i8,
    capacity: AtomicU16,
}

impl Atom {
    /// Constructs a plain, uncharged, aliphatic atom.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            aromatic: false,
            isotope: None,
            chirality: None,
            hydrogens: None,
            charge: 0,
            capacity: AtomicU16::new(CAPACITY_UNSET),
        }
    }

    pub fn aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    pub fn isotope(mut self, isotope: Option<u16>) -> Self {
        self.isotope = isotope;
        self
    }

    pub fn chirality(mut self, chirality: Option<Chirality>) -> Self {
        self.chirality = chirality;
        self
    }

    pub fn hydrogens(mut self, hydrogens: Option<u8>) -> Self {
        self.hydrogens = hydrogens;
        *self.capacity.get_mut() = CAPACITY_UNSET;
        self
    }

    pub fn charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        *self.capacity.get_mut() = CAPACITY_UNSET;
        self
    }

    pub const fn element(&self) -> Element {
        self.element
    }

    pub const fn is_aromatic(&self) -> bool {
        self.aromatic
    }

    pub const fn isotope_mass(&self) -> Option<u16> {
        self.isotope
    }

    pub const fn chirality_mark(&self) -> Option<Chirality> {
        self.chirality
    }

    pub const fn hydrogen_count(&self) -> Option<u8> {
        self.hydrogens
    }

    pub const fn charge_value(&self) -> i8 {
        self.charge
    }

    /// Swaps `@` and `@@`, if a marker is present.
    pub fn invert_chirality(&mut self) {
        if let Some(chirality) = self.chirality {
            self.chirality = Some(chirality.inverted());
        }
    }

    /// Drops the aromatic flag after kekulization.
    pub(crate) fn clear_aromatic(&mut self) {
        self.aromatic = false;
    }

    /// Maximum sum of incident bond orders under `table`, with explicit
    /// hydrogens subtracted.
    pub fn bonding_capacity(&self, table: &Constraints) -> u8 {
        let memo = self.capacity.load(Ordering::Relaxed);
        if memo != CAPACITY_UNSET {
            return memo as u8;
        }

        let capacity = table
            .bonding_capacity(self.element, self.charge)
            .saturating_sub(self.hydrogens.unwrap_or(0));
        self.capacity.store(capacity as u16, Ordering::Relaxed);
        capacity
    }
}

impl Clone for Atom {
    fn clone(&self) -> Self {
        Self {
            element: self.element,
            aromatic: self.aromatic,
            isotope: self.isotope,
            chirality: self.chirality,
            hydrogens: self.hydrogens,
            charge: self.charge,
            capacity: AtomicU16::new(self.capacity.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.aromatic == other.aromatic
            && self.isotope == other.isotope
            && self.chirality == other.chirality
            && self.hydrogens == other.hydrogens
            && self.charge == other.charge
    }
}
