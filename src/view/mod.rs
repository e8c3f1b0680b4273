//! View synthesis - level records to render and collision meshes
//!
//! One builder per grid-object kind turns the world records into a
//! `GridObjectView`: a render mesh, an independently-triangulated collision
//! set, and a bounding volume. A second pass injects baked light-map UVs
//! across already-built views.
//!
//! The whole module is a load-time, single-threaded pipeline: builders are
//! not safe to call concurrently on views that share material or vertex
//! resources, and the light-map cursor is local to one injection pass.

mod bounds;
mod factory;
mod lightmap;
mod triangles;
mod uv;

pub use bounds::*;
pub use factory::*;
pub use lightmap::*;
pub use triangles::*;
pub use uv::*;
