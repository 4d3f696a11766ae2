mod atom;
mod bond;
mod kekulize;
mod matching;
mod molecule;

pub use atom::Atom;
pub use bond::DirBond;
pub use molecule::MoleculeGraph;
pub(crate) use matching::find_perfect_matching;
