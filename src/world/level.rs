//! Map data loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable map record files.
//! Supports both compressed (brotli) and uncompressed RON files.
//! - Reading: Auto-detects format by checking for valid RON start
//! - Writing: Always uses brotli compression

use std::fs;
use std::io::Cursor;
use std::path::Path;
use serde::{Serialize, Deserialize};
use super::{
    GridObject, GridObjectKind, MovingSector, PointEntity, ScreenPanel,
    SectorPolygon, TextureRef, WallSegment,
};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of records per object kind
    pub const MAX_OBJECTS: usize = 65_536;
    /// Maximum vertices in a sector footprint polygon
    pub const MAX_POLYGON_VERTICES: usize = 4_096;
    /// Maximum string length for texture and mesh names
    pub const MAX_STRING_LEN: usize = 256;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for map loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// The full record set for one level, as emitted by the map compiler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub segments: Vec<WallSegment>,
    #[serde(default)]
    pub sectors: Vec<SectorPolygon>,
    #[serde(default)]
    pub doors: Vec<MovingSector>,
    #[serde(default)]
    pub elevators: Vec<MovingSector>,
    #[serde(default)]
    pub entities: Vec<PointEntity>,
    #[serde(default)]
    pub panels: Vec<ScreenPanel>,
}

impl MapData {
    /// Flatten the record set into named grid objects, in the canonical
    /// synthesis order: segments, sector floors, sector ceilings, doors,
    /// elevators, entities, panels.
    pub fn grid_objects(&self) -> Vec<GridObject> {
        let sector_views = self.sectors.len() * 2;
        let total = self.segments.len() + sector_views + self.doors.len()
            + self.elevators.len() + self.entities.len() + self.panels.len();
        let mut objects = Vec::with_capacity(total);

        for (i, seg) in self.segments.iter().enumerate() {
            objects.push(GridObject::new(
                format!("segment[{}]", i),
                GridObjectKind::WallSegment(seg.clone()),
            ));
        }
        for (i, sector) in self.sectors.iter().enumerate() {
            objects.push(GridObject::new(
                format!("sector[{}] floor", i),
                GridObjectKind::SectorFloor(sector.clone()),
            ));
        }
        for (i, sector) in self.sectors.iter().enumerate() {
            objects.push(GridObject::new(
                format!("sector[{}] ceiling", i),
                GridObjectKind::SectorCeiling(sector.clone()),
            ));
        }
        for (i, door) in self.doors.iter().enumerate() {
            objects.push(GridObject::new(
                format!("door[{}]", i),
                GridObjectKind::Door(door.clone()),
            ));
        }
        for (i, elevator) in self.elevators.iter().enumerate() {
            objects.push(GridObject::new(
                format!("elevator[{}]", i),
                GridObjectKind::Elevator(elevator.clone()),
            ));
        }
        for (i, entity) in self.entities.iter().enumerate() {
            objects.push(GridObject::new(
                format!("entity[{}]", i),
                GridObjectKind::PointEntity(entity.clone()),
            ));
        }
        for (i, panel) in self.panels.iter().enumerate() {
            objects.push(GridObject::new(
                format!("panel[{}]", i),
                GridObjectKind::ScreenQuad(panel.clone()),
            ));
        }

        objects
    }
}

/// Check if a float is valid (not NaN or Inf)
fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a texture reference
fn validate_texture_ref(tex: &TextureRef, context: &str) -> Result<(), String> {
    if tex.pack.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: texture pack name too long ({} > {})",
            context, tex.pack.len(), limits::MAX_STRING_LEN));
    }
    if tex.name.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: texture name too long ({} > {})",
            context, tex.name.len(), limits::MAX_STRING_LEN));
    }
    Ok(())
}

/// Validate a wall segment
fn validate_segment(seg: &WallSegment, context: &str) -> Result<(), String> {
    for (label, value) in [
        ("start.x", seg.start.x), ("start.y", seg.start.y),
        ("end.x", seg.end.x), ("end.y", seg.end.y),
        ("bottom_y", seg.bottom_y), ("top_y", seg.top_y),
    ] {
        if !is_valid_float(value) {
            return Err(format!("{}: invalid {} = {}", context, label, value));
        }
    }
    validate_texture_ref(&seg.texture, context)?;
    Ok(())
}

/// Validate one vertex/index pair of a sector polygon
fn validate_triangulation(
    vertices: &[crate::mesh::Vec2],
    indices: &[usize],
    context: &str,
    which: &str,
) -> Result<(), String> {
    if vertices.len() > limits::MAX_POLYGON_VERTICES {
        return Err(format!("{}: too many {} vertices ({} > {})",
            context, which, vertices.len(), limits::MAX_POLYGON_VERTICES));
    }
    for (i, v) in vertices.iter().enumerate() {
        if !is_valid_float(v.x) || !is_valid_float(v.y) {
            return Err(format!("{}: invalid {} vertex[{}] = ({}, {})",
                context, which, i, v.x, v.y));
        }
    }
    if indices.len() % 3 != 0 {
        return Err(format!("{}: {} index count {} is not a multiple of 3",
            context, which, indices.len()));
    }
    for (i, &index) in indices.iter().enumerate() {
        if index >= vertices.len() {
            return Err(format!("{}: {} index[{}] = {} out of range (only {} vertices)",
                context, which, i, index, vertices.len()));
        }
    }
    Ok(())
}

/// Validate a sector polygon
fn validate_sector(sector: &SectorPolygon, context: &str) -> Result<(), String> {
    validate_triangulation(&sector.render_vertices, &sector.render_indices, context, "render")?;
    validate_triangulation(&sector.collision_vertices, &sector.collision_indices, context, "collision")?;

    if !is_valid_float(sector.floor_y) {
        return Err(format!("{}: invalid floor_y = {}", context, sector.floor_y));
    }
    if !is_valid_float(sector.ceiling_y) {
        return Err(format!("{}: invalid ceiling_y = {}", context, sector.ceiling_y));
    }

    validate_texture_ref(&sector.floor_texture, context)?;
    validate_texture_ref(&sector.ceiling_texture, context)?;
    Ok(())
}

/// Validate a moving sector (door or elevator)
fn validate_moving_sector(moving: &MovingSector, context: &str) -> Result<(), String> {
    validate_sector(&moving.sector, context)?;
    if !is_valid_float(moving.travel_height) || moving.travel_height < 0.0 {
        return Err(format!("{}: invalid travel_height = {}", context, moving.travel_height));
    }
    validate_texture_ref(&moving.side_texture, context)?;
    Ok(())
}

/// Validate a point entity
fn validate_entity(entity: &PointEntity, context: &str) -> Result<(), String> {
    for (label, value) in [
        ("position.x", entity.position.x), ("position.y", entity.position.y),
        ("position.z", entity.position.z),
        ("size.x", entity.size.x), ("size.y", entity.size.y), ("size.z", entity.size.z),
    ] {
        if !is_valid_float(value) {
            return Err(format!("{}: invalid {} = {}", context, label, value));
        }
    }
    if entity.mesh_name.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: mesh name too long ({} > {})",
            context, entity.mesh_name.len(), limits::MAX_STRING_LEN));
    }
    validate_texture_ref(&entity.texture, context)?;
    Ok(())
}

/// Validate a screen panel
fn validate_panel(panel: &ScreenPanel, context: &str) -> Result<(), String> {
    validate_segment(&panel.segment, context)?;
    if let super::PanelStyle::Switch { texture_on, texture_off } = &panel.style {
        validate_texture_ref(texture_on, context)?;
        validate_texture_ref(texture_off, context)?;
    }
    Ok(())
}

/// Validate an entire map record set
pub fn validate_map(map: &MapData) -> Result<(), LevelError> {
    let counts = [
        ("segments", map.segments.len()),
        ("sectors", map.sectors.len()),
        ("doors", map.doors.len()),
        ("elevators", map.elevators.len()),
        ("entities", map.entities.len()),
        ("panels", map.panels.len()),
    ];
    for (kind, count) in counts {
        if count > limits::MAX_OBJECTS {
            return Err(LevelError::ValidationError(format!(
                "too many {} ({} > {})", kind, count, limits::MAX_OBJECTS
            )));
        }
    }

    for (i, seg) in map.segments.iter().enumerate() {
        validate_segment(seg, &format!("segment[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    for (i, sector) in map.sectors.iter().enumerate() {
        validate_sector(sector, &format!("sector[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    for (i, door) in map.doors.iter().enumerate() {
        validate_moving_sector(door, &format!("door[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    for (i, elevator) in map.elevators.iter().enumerate() {
        validate_moving_sector(elevator, &format!("elevator[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    for (i, entity) in map.entities.iter().enumerate() {
        validate_entity(entity, &format!("entity[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }
    for (i, panel) in map.panels.iter().enumerate() {
        validate_panel(panel, &format!("panel[{}]", i))
            .map_err(LevelError::ValidationError)?;
    }

    Ok(())
}

/// Decode bytes that may be plain RON text or brotli-compressed RON
fn decode_map_bytes(bytes: &[u8]) -> Result<String, LevelError> {
    // Detect format: RON files start with '(' or whitespace, brotli is binary
    let is_plain_ron = bytes.first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false);

    if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8: {}", e)
            )))
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("brotli decompression failed: {}", e)
            )))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8 after decompression: {}", e)
            )))
    }
}

/// Parse map data from bytes (plain or compressed RON)
pub fn parse_map_bytes(bytes: &[u8]) -> Result<MapData, LevelError> {
    let contents = decode_map_bytes(bytes)?;
    let map: MapData = ron::from_str(&contents)?;
    validate_map(&map)?;
    Ok(map)
}

/// Load map data from a RON file (supports both compressed and uncompressed)
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapData, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let contents = decode_map_bytes(&bytes)?;

    let map: MapData = match ron::from_str(&contents) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("RON parse error in {}: {}", path.display(), e);
            return Err(e.into());
        }
    };

    validate_map(&map)?;
    Ok(map)
}

/// Load map data from a RON string (for embedded maps or testing)
pub fn load_map_from_str(s: &str) -> Result<MapData, LevelError> {
    let map: MapData = ron::from_str(s)?;
    validate_map(&map)?;
    Ok(map)
}

/// Serialize map data to compressed bytes
pub fn serialize_map(map: &MapData) -> Result<Vec<u8>, LevelError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let ron_string = ron::ser::to_string_pretty(map, config)?;

    // Compress with brotli (quality 6, window 22 - good balance of speed/ratio)
    let mut compressed = Vec::new();
    brotli::BrotliCompress(&mut Cursor::new(ron_string.as_bytes()), &mut compressed, &brotli::enc::BrotliEncoderParams {
        quality: 6,
        lgwin: 22,
        ..Default::default()
    }).map_err(|e| LevelError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("brotli compression failed: {}", e)
    )))?;

    Ok(compressed)
}

/// Save map data to a compressed RON file (brotli)
pub fn save_map<P: AsRef<Path>>(map: &MapData, path: P) -> Result<(), LevelError> {
    let data = serialize_map(map)?;
    fs::write(path, data)?;
    Ok(())
}
