//! levelmesh - sector-based level geometry to mesh synthesis
//!
//! Converts static level descriptions (wall segments, sector polygons,
//! moving doors/elevators, point entities, screen quads) into renderable
//! triangle meshes plus an independently-triangulated collision
//! representation, then stamps precomputed light-map texture coordinates
//! onto the built geometry in a second pass.
//!
//! The pipeline is a one-shot, load-time transform over trusted content:
//! - `world` holds the record types the map compiler emits, plus RON-based
//!   map data persistence and validation
//! - `texture` decodes textures and hands out per-instance material clones
//! - `view` builds one `GridObjectView` per level object and injects the
//!   light-map UV channel once all views exist
//!
//! Everything is single-threaded and synchronous: builders must not be
//! called concurrently on views that share underlying vertex or material
//! resources, and the light-map injection cursor is local to one pass.
//! Inputs are assumed fully resident in memory; nothing here suspends or
//! blocks on I/O during synthesis.

pub mod mesh;
pub mod texture;
pub mod view;
pub mod world;

pub use mesh::{Face, MeshData, Vec2, Vec3, Vertex};
pub use texture::{Material, MaterialCatalog, Texture, TextureCatalog};
pub use view::{
    apply_light_map, parse_light_map, ContentError, GridObjectView,
    LightMapError, ObjectMesh, SectorPart, ViewFactory,
};
pub use world::{
    load_map, save_map, validate_map, GridObject, GridObjectKind, LevelError,
    MapData, MovingSector, PointEntity, ScreenPanel, SectorPolygon,
    TextureRef, WallSegment, TEXTURE_SCALE,
};
