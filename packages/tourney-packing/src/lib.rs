//! Dense bit-packing of small per-position records into 252-bit words.
//!
//! Words are stored as `Uint256` but never use more than the low 250 bits, so
//! they stay valid field elements for chains with 252-bit storage slots.

mod codec;
mod shares;

pub use crate::codec::{locate, PackedCodec, Word, USABLE_BITS};
pub use crate::shares::{CustomShareCodec, RecipientShare, RecipientShareCodec};
