//! # Imaging Module
//!
//! Decoding and resizing shared by the hasher, the validator and the
//! batch resizer.

mod decode;
mod resize;

pub use decode::{FastDecoder, SourceFormat};
pub use resize::FastResizer;
