//! Primitives for reading and writing [SELFIES](https://github.com/aspuru-guzik-group/selfies)
//! (Self-Referencing Embedded Strings), a molecular line notation whose
//! every string decodes to a valid molecule. Covers the
//! [OpenSMILES](http://opensmiles.org) organic subset on the SMILES side.
//!
//! The decoder is total: bond orders clamp against remaining bonding
//! capacity, impossible ring closures are skipped, and index symbols
//! never fail to read. The encoder is strict: malformed SMILES,
//! unkekulizable aromatic systems, and capacity violations are errors.
//!
//! ```
//! fn main() -> Result<(), selfies::EncodeError> {
//!     let encoded = selfies::encode("c1ccccc1")?;
//!
//!     assert_eq!(encoded, "[C][=C][C][=C][C][=C][Ring1][=Branch1]");
//!     assert_eq!(selfies::decode(&encoded).unwrap(), "C1=CC=CC=C1");
//!
//!     Ok(())
//! }
//! ```

/// Output-token provenance records.
pub mod attribution;
/// Bonding-capacity constraint tables and presets.
pub mod constraints;
/// SELFIES to SMILES translation.
pub mod decode;
/// SMILES to SELFIES translation.
pub mod encode;
/// Label and one-hot encodings for sequence models.
pub mod encoding;
/// Common components shared between the graph and both notations.
pub mod feature;
/// Symbol grammar, the index codec, and string utilities.
pub mod grammar;
/// The molecular graph both codecs build and walk.
pub mod graph;
/// Reading SMILES strings into graphs.
pub mod read;
/// Writing graphs back out as SMILES strings.
pub mod write;

pub use mendeleev::Element;

pub use attribution::{Attribution, AttributionMap, TokenAttribution};
pub use constraints::{
    get_preset_constraints, get_semantic_constraints, get_semantic_robust_alphabet,
    set_default_constraints, set_semantic_constraints, ConstraintsError,
};
pub use decode::{decode, decode_attributed, DecodeError};
pub use encode::{encode, encode_attributed, EncodeError};
pub use encoding::{
    batch_flat_hot_to_selfies, batch_selfies_to_flat_hot, encoding_to_selfies,
    selfies_to_encoding, EncodingError,
};
pub use grammar::{alphabet_from_selfies, len_selfies, split_selfies};

mod doctests {
    #[cfg(doctest)]
    #[doc = include_str!("../README.md")]
    struct _ReadMe;
}
