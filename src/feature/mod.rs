mod bond_order;
mod chirality;
mod element_ext;
mod stereo;

pub use bond_order::BondOrder;
pub use chirality::Chirality;
pub use element_ext::ElementExt;
pub use stereo::Stereo;
