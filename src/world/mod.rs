//! World module - level geometry records and persistence
//!
//! The record types the map compiler emits (wall segments, sector polygons,
//! moving sectors, point entities, screen quads) plus RON-based map data
//! loading, saving, and validation.

mod geometry;
mod level;

pub use geometry::*;
pub use level::*;
