//! Core geometry records for sector-based levels
//!
//! A level is a flat collection of grid objects: wall segments, sector
//! polygons (floor/ceiling), moving sectors (doors and elevators), point
//! entities, and screen/switch quads. The map compiler produces these
//! records; the view builders turn them into render and collision meshes.

use serde::{Serialize, Deserialize};
use crate::mesh::{Vec2, Vec3};

/// World units covered by one texture tile; governs all UV generation
pub const TEXTURE_SCALE: f32 = 16.0;

/// Texture reference by pack and name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextureRef {
    /// Texture pack name (e.g., "SAMPLE")
    pub pack: String,
    /// Texture name without extension (e.g., "wall_01")
    pub name: String,
}

impl TextureRef {
    pub fn new(pack: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pack: pack.into(),
            name: name.into(),
        }
    }

    /// Create a None reference (uses fallback checkerboard)
    pub fn none() -> Self {
        Self {
            pack: String::new(),
            name: String::new(),
        }
    }

    /// Check if this is a valid reference
    pub fn is_valid(&self) -> bool {
        !self.pack.is_empty() && !self.name.is_empty()
    }

    /// Catalog key ("pack/name")
    pub fn key(&self) -> String {
        format!("{}/{}", self.pack, self.name)
    }
}

impl Default for TextureRef {
    fn default() -> Self {
        Self::none()
    }
}

fn default_true() -> bool { true }

/// A single wall quad between two footprint points and a height range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub bottom_y: f32,
    pub top_y: f32,
    pub texture: TextureRef,
}

impl WallSegment {
    pub fn new(start: Vec2, end: Vec2, bottom_y: f32, top_y: f32, texture: TextureRef) -> Self {
        Self { start, end, bottom_y, top_y, texture }
    }

    /// World-space length of the segment footprint
    pub fn length(&self) -> f32 {
        self.start.distance_to(self.end)
    }
}

/// A horizontal polygon with independent render and collision triangulations
///
/// `render_indices` and `collision_indices` triangulate the same footprint
/// but may subdivide it differently; consumers must never assume the two
/// triangle counts match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorPolygon {
    /// Footprint ring used for rendering
    pub render_vertices: Vec<Vec2>,
    /// Triangle index list into `render_vertices`
    pub render_indices: Vec<usize>,
    /// Footprint used for collision (may be a simplified version)
    pub collision_vertices: Vec<Vec2>,
    /// Triangle index list into `collision_vertices`
    pub collision_indices: Vec<usize>,
    pub floor_y: f32,
    pub ceiling_y: f32,
    pub floor_texture: TextureRef,
    pub ceiling_texture: TextureRef,
    /// Open-air sectors have no ceiling mesh or ceiling collision
    #[serde(default = "default_true")]
    pub has_ceiling: bool,
    /// Elevator sectors never get a static floor mesh (the floor moves)
    #[serde(default)]
    pub elevator: bool,
}

impl SectorPolygon {
    /// Create a sector sharing one triangulation for render and collision
    pub fn with_shared_triangulation(
        vertices: Vec<Vec2>,
        indices: Vec<usize>,
        floor_y: f32,
        ceiling_y: f32,
        texture: TextureRef,
    ) -> Self {
        Self {
            render_vertices: vertices.clone(),
            render_indices: indices.clone(),
            collision_vertices: vertices,
            collision_indices: indices,
            floor_y,
            ceiling_y,
            floor_texture: texture.clone(),
            ceiling_texture: texture,
            has_ceiling: true,
            elevator: false,
        }
    }

    /// Axis-aligned bounds of the render footprint
    pub fn footprint_bounds(&self) -> Aabb2 {
        Aabb2::from_points(&self.render_vertices)
    }
}

/// A door or elevator: a sector polygon that translates vertically at runtime
///
/// All of the assembly's geometry is expressed relative to its anchor
/// position so the whole thing can move as a rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingSector {
    pub sector: SectorPolygon,
    /// Elevator travel distance below the floor; doors travel their full
    /// floor-to-ceiling gap instead
    pub travel_height: f32,
    pub side_texture: TextureRef,
}

impl MovingSector {
    pub fn new(sector: SectorPolygon, travel_height: f32, side_texture: TextureRef) -> Self {
        Self { sector, travel_height, side_texture }
    }

    /// Vertical range the assembly occupies: door `floor..ceiling`,
    /// elevator `floor - travel..floor`
    pub fn travel_range(&self, elevator: bool) -> (f32, f32) {
        if elevator {
            (self.sector.floor_y - self.travel_height, self.sector.floor_y)
        } else {
            (self.sector.floor_y, self.sector.ceiling_y)
        }
    }

    /// Geometric center the assembly's mesh is expressed relative to:
    /// XZ center of the footprint bounds, Y at the travel-range midpoint
    pub fn anchor_position(&self, elevator: bool) -> Vec3 {
        let bounds = self.sector.footprint_bounds();
        let center = bounds.center();
        let (bottom_y, top_y) = self.travel_range(elevator);
        Vec3::new(center.x, (bottom_y + top_y) / 2.0, center.y)
    }
}

/// A free-standing object placed at a point (pickup, decoration, monster)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointEntity {
    pub position: Vec3,
    /// Half-extents of the collision volume
    pub size: Vec3,
    /// Mesh catalog name
    pub mesh_name: String,
    pub texture: TextureRef,
    /// Solid entities get collision triangles and a 2D bounding square
    #[serde(default = "default_true")]
    pub solid: bool,
}

impl PointEntity {
    pub fn new(position: Vec3, size: Vec3, mesh_name: impl Into<String>, texture: TextureRef) -> Self {
        Self {
            position,
            size,
            mesh_name: mesh_name.into(),
            texture,
            solid: true,
        }
    }
}

/// What a wall-mounted panel displays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PanelStyle {
    /// Display surface whose content is driven externally
    Screen,
    /// Usable switch with an on/off texture pair
    Switch {
        texture_on: TextureRef,
        texture_off: TextureRef,
    },
}

/// A flat quad mounted on a wall segment (screen or switch)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenPanel {
    pub segment: WallSegment,
    pub style: PanelStyle,
}

/// World-units a switch quad sits above its segment bottom, and its height
pub const SWITCH_QUAD_SIZE: f32 = 8.0;

/// The kinds of level object a view can be built for.
///
/// One builder per variant; the kind is fixed when the level object is
/// constructed and never re-inspected afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GridObjectKind {
    WallSegment(WallSegment),
    SectorFloor(SectorPolygon),
    SectorCeiling(SectorPolygon),
    Door(MovingSector),
    Elevator(MovingSector),
    PointEntity(PointEntity),
    ScreenQuad(ScreenPanel),
}

impl GridObjectKind {
    /// Display name for diagnostics and content errors
    pub fn display_name(&self) -> &'static str {
        match self {
            GridObjectKind::WallSegment(_) => "wall segment",
            GridObjectKind::SectorFloor(_) => "sector floor",
            GridObjectKind::SectorCeiling(_) => "sector ceiling",
            GridObjectKind::Door(_) => "door",
            GridObjectKind::Elevator(_) => "elevator",
            GridObjectKind::PointEntity(_) => "point entity",
            GridObjectKind::ScreenQuad(_) => "screen quad",
        }
    }
}

/// A level object: a name for diagnostics plus its kind-specific record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridObject {
    pub name: String,
    pub kind: GridObjectKind,
}

impl GridObject {
    pub fn new(name: impl Into<String>, kind: GridObjectKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Get center of the box
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Half the box extent per axis; a moving sector's reported "size"
    pub fn half_extent(&self) -> Vec3 {
        Vec3::new(
            (self.max.x - self.min.x) * 0.5,
            (self.max.y - self.min.y) * 0.5,
            (self.max.z - self.min.z) * 0.5,
        )
    }
}

/// 2D axis-aligned bounding square on the XZ plane
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest bounds enclosing all points; empty input yields a
    /// degenerate box at the origin
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut bounds = match points.first() {
            Some(&first) => Aabb2::new(first, first),
            None => return Aabb2::default(),
        };
        for &point in &points[1..] {
            bounds.expand(point);
        }
        bounds
    }

    pub fn expand(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_sector(floor_y: f32, ceiling_y: f32) -> SectorPolygon {
        SectorPolygon::with_shared_triangulation(
            vec![
                Vec2::new(-8.0, -8.0),
                Vec2::new(8.0, -8.0),
                Vec2::new(8.0, 8.0),
                Vec2::new(-8.0, 8.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            floor_y,
            ceiling_y,
            TextureRef::new("base", "floor_01"),
        )
    }

    #[test]
    fn test_segment_length() {
        let seg = WallSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 4.0),
            0.0,
            8.0,
            TextureRef::none(),
        );
        assert!((seg.length() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_door_anchor_position() {
        let door = MovingSector::new(square_sector(0.0, 8.0), 0.0, TextureRef::none());
        let anchor = door.anchor_position(false);

        assert!((anchor.x - 0.0).abs() < 0.001);
        assert!((anchor.y - 4.0).abs() < 0.001);
        assert!((anchor.z - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_elevator_anchor_position() {
        let elevator = MovingSector::new(square_sector(0.0, 8.0), 4.0, TextureRef::none());
        let anchor = elevator.anchor_position(true);

        assert!((anchor.y - (-2.0)).abs() < 0.001);

        let (bottom, top) = elevator.travel_range(true);
        assert!((bottom - (-4.0)).abs() < 0.001);
        assert!((top - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_aabb_expand_and_center() {
        let mut bounds = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        bounds.expand(Vec3::new(-2.0, 4.0, 6.0));

        assert!((bounds.min.x - (-2.0)).abs() < 0.001);
        assert!((bounds.max.y - 4.0).abs() < 0.001);
        assert!((bounds.center().z - 3.0).abs() < 0.001);
        assert!((bounds.half_extent().x - 1.0).abs() < 0.001);
        assert!(bounds.contains(Vec3::new(-1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_aabb2_from_points() {
        let bounds = Aabb2::from_points(&[
            Vec2::new(4.0, -1.0),
            Vec2::new(-2.0, 5.0),
            Vec2::new(1.0, 1.0),
        ]);
        assert!((bounds.min.x - (-2.0)).abs() < 0.001);
        assert!((bounds.max.y - 5.0).abs() < 0.001);
        assert!((bounds.center().x - 1.0).abs() < 0.001);
    }
}
