//! Mesh module - render-data primitives
//!
//! Value-type vector math and the triangle-list mesh representation the
//! view builders fill. Meshes keep a per-face second UV channel for baked
//! light maps, injected after construction.

mod math;
mod types;

pub use math::*;
pub use types::*;
