//! Texture and material catalog
//!
//! Decoded textures keyed by pack/name, plus the material templates the
//! view builders instantiate. Every mesh instance gets its own material
//! clone so switching a texture on one object never affects another.

mod catalog;

pub use catalog::*;
