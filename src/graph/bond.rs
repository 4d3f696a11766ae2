use crate::feature::{BondOrder, Stereo};

/// A bond directed from `src` to `dst`, in the order the atoms appeared
/// in the source string. Ring-closure bonds are stored once per
/// direction; all other bonds only on their source atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBond {
    pub src: usize,
    pub dst: usize,
    pub order: BondOrder,
    pub stereo: Option<Stereo>,
    pub ring: bool,
}

impl DirBond {
    pub fn new(src: usize, dst: usize, order: BondOrder, stereo: Option<Stereo>) -> Self {
        Self {
            src,
            dst,
            order,
            stereo,
            ring: false,
        }
    }

    pub fn ring(src: usize, dst: usize, order: BondOrder, stereo: Option<Stereo>) -> Self {
        Self {
            src,
            dst,
            order,
            stereo,
            ring: true,
        }
    }

    /// The same bond viewed from `dst`. Directional marks flip with the
    /// viewing direction.
    pub fn reversed(&self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
            order: self.order,
            stereo: self.stereo.map(|stereo| stereo.flipped()),
            ring: self.ring,
        }
    }
}
