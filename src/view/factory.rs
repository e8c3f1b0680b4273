//! Mesh assemblers
//!
//! One builder per grid-object kind. Each call populates a complete
//! `GridObjectView` (render mesh, collision data, bounding volume, debug
//! mesh) in a single synchronous pass; views are never observed
//! half-populated. Builders keep two pieces of factory state: a running
//! diagnostic triangle counter and a list of content warnings.

use std::collections::HashMap;
use crate::mesh::{MeshData, Vec2, Vec3};
use crate::texture::{Material, MaterialCatalog};
use crate::world::{
    Aabb, Aabb2, GridObject, GridObjectKind, MovingSector, PanelStyle,
    PointEntity, ScreenPanel, SectorPolygon, TextureRef, WallSegment,
    SWITCH_QUAD_SIZE, TEXTURE_SCALE,
};
use super::{bounds, triangles, uv};
use super::triangles::FaceWinding;

/// Relative render/collision footprint area divergence above which a
/// sector is flagged as a content-quality warning
const AREA_DIVERGENCE_WARN: f32 = 0.05;

/// Fatal content error: malformed input that should abort level load,
/// reported with a precise object identifier
#[derive(Debug)]
pub struct ContentError {
    pub object: String,
    pub detail: String,
}

impl ContentError {
    pub fn new(object: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "content error in {}: {}", self.object, self.detail)
    }
}

impl std::error::Error for ContentError {}

/// One logical edge of a moving sector's footprint with its travel range,
/// consumed by physics to test the moving volume without re-deriving it
/// from the mesh
#[derive(Debug, Clone, Copy)]
pub struct BoundarySegment {
    pub start: Vec2,
    pub end: Vec2,
    pub bottom_y: f32,
    pub top_y: f32,
}

/// Collision representation of a view, independent of its render mesh
#[derive(Debug, Clone, Default)]
pub struct CollisionData {
    /// Flat triangle list; length is always a multiple of 3
    pub triangles: Vec<Vec3>,
    /// Derived from the collision triangles, never the render set
    pub bounding_box: Aabb,
    /// Footprint-derived square for cylindrical entities
    pub bounding_square: Option<Aabb2>,
    /// Boundary edges of a moving sector's travel volume
    pub segments: Vec<BoundarySegment>,
}

/// On/off texture pair a switch view flips between at runtime
#[derive(Debug, Clone)]
pub struct PanelTextures {
    pub on: TextureRef,
    pub off: TextureRef,
}

/// One renderable part: geometry, its per-instance material, and the
/// world position its vertices are relative to
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub data: MeshData,
    pub material: Material,
    pub position: Vec3,
}

/// A view's render geometry: either one mesh or a group of sub-meshes
/// (moving sectors carry a cap part and a skirt part)
#[derive(Debug, Clone)]
pub enum ObjectMesh {
    Single(MeshNode),
    Composite(Vec<MeshNode>),
}

impl ObjectMesh {
    pub fn parts(&self) -> &[MeshNode] {
        match self {
            ObjectMesh::Single(node) => std::slice::from_ref(node),
            ObjectMesh::Composite(nodes) => nodes,
        }
    }

    pub fn parts_mut(&mut self) -> &mut [MeshNode] {
        match self {
            ObjectMesh::Single(node) => std::slice::from_mut(node),
            ObjectMesh::Composite(nodes) => nodes,
        }
    }

    /// Total render face count across all parts
    pub fn face_count(&self) -> usize {
        self.parts().iter().map(|part| part.data.face_count()).sum()
    }
}

/// Everything synthesized for one level object
#[derive(Debug, Clone)]
pub struct GridObjectView {
    pub mesh: ObjectMesh,
    pub collision: CollisionData,
    /// Wireframe bounding visualization for tooling, not production
    pub debug_mesh: Option<MeshData>,
    /// Anchor of moving sectors and entities; zero for static geometry
    pub position: Vec3,
    /// Half-extents reported to collision code; zero for static geometry
    pub size: Vec3,
    /// Set on switch views only
    pub panel_textures: Option<PanelTextures>,
}

/// Builds `GridObjectView`s from level records.
///
/// Not safe to call concurrently on views that share underlying material
/// or vertex resources; the whole factory is designed for a single load
/// thread.
#[derive(Debug)]
pub struct ViewFactory {
    materials: MaterialCatalog,
    meshes: HashMap<String, MeshData>,
    tex_scale: f32,
    triangle_count: usize,
    warnings: Vec<String>,
}

impl ViewFactory {
    pub fn new(materials: MaterialCatalog) -> Self {
        Self {
            materials,
            meshes: HashMap::new(),
            tex_scale: TEXTURE_SCALE,
            triangle_count: 0,
            warnings: Vec::new(),
        }
    }

    /// Supply the mesh catalog point entities clone from
    pub fn with_meshes(mut self, meshes: HashMap<String, MeshData>) -> Self {
        self.meshes = meshes;
        self
    }

    pub fn register_mesh(&mut self, name: impl Into<String>, mesh: MeshData) {
        self.meshes.insert(name.into(), mesh);
    }

    /// Running collision-triangle total across all built views, for
    /// tooling and profiling
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Content warnings accumulated so far (degenerate geometry, footprint
    /// divergence)
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Build the view for a level object, dispatching on its kind
    pub fn build_object_view(&mut self, object: &GridObject) -> Result<GridObjectView, ContentError> {
        match &object.kind {
            GridObjectKind::WallSegment(seg) => self.build_segment_view(&object.name, seg),
            GridObjectKind::SectorFloor(sector) => {
                self.build_sector_view(&object.name, sector, SectorPart::Floor)
            }
            GridObjectKind::SectorCeiling(sector) => {
                self.build_sector_view(&object.name, sector, SectorPart::Ceiling)
            }
            GridObjectKind::Door(door) => self.build_moving_sector_view(&object.name, door, false),
            GridObjectKind::Elevator(elevator) => {
                self.build_moving_sector_view(&object.name, elevator, true)
            }
            GridObjectKind::PointEntity(entity) => self.build_entity_view(&object.name, entity),
            GridObjectKind::ScreenQuad(panel) => self.build_panel_view(&object.name, panel),
        }
    }

    /// Wall segment: one vertical quad as two render triangles, collision
    /// quad in its own decomposition
    pub fn build_segment_view(&mut self, object: &str, seg: &WallSegment) -> Result<GridObjectView, ContentError> {
        let distance = seg.length();
        if distance <= f32::EPSILON {
            self.warn(format!(
                "{}: degenerate zero-length segment at ({}, {})",
                object, seg.start.x, seg.start.y
            ));
        }
        let length = uv::repeat_length(distance, self.tex_scale);

        let (render, split) = triangles::segment_render_triangles(seg);
        let uvs = uv::wall_face_uvs(&render, split, length, self.tex_scale);
        let data = MeshData::from_triangle_list(&render, &uvs);
        let material = self.materials.instantiate(&seg.texture);

        let collision = triangles::segment_collision_triangles(seg);
        let bounding_box = bounds::bounding_box(&collision);
        let debug_mesh = bounds::debug_bounds_mesh(&bounding_box);

        self.triangle_count += collision.len() / 3;

        Ok(GridObjectView {
            mesh: ObjectMesh::Single(MeshNode {
                data,
                material,
                position: Vec3::ZERO,
            }),
            collision: CollisionData {
                triangles: collision,
                bounding_box,
                bounding_square: None,
                segments: Vec::new(),
            },
            debug_mesh: Some(debug_mesh),
            position: Vec3::ZERO,
            size: Vec3::ZERO,
            panel_textures: None,
        })
    }

    /// Sector floor or ceiling. Open-air sectors produce no ceiling at
    /// all; elevator sectors produce no static floor (their floor moves).
    pub fn build_sector_view(
        &mut self,
        object: &str,
        sector: &SectorPolygon,
        part: SectorPart,
    ) -> Result<GridObjectView, ContentError> {
        let mut nodes = Vec::new();
        let mut collision = Vec::new();

        match part {
            SectorPart::Floor => {
                if !sector.elevator {
                    nodes.push(self.sector_face_node(
                        object,
                        sector,
                        FaceWinding::Up,
                        sector.floor_y,
                        &sector.floor_texture,
                        &mut collision,
                    )?);
                }
            }
            SectorPart::Ceiling => {
                if sector.has_ceiling {
                    nodes.push(self.sector_face_node(
                        object,
                        sector,
                        FaceWinding::Down,
                        sector.ceiling_y,
                        &sector.ceiling_texture,
                        &mut collision,
                    )?);
                }
            }
        }

        let bounding_box = bounds::bounding_box(&collision);
        let debug_mesh = if collision.is_empty() {
            None
        } else {
            Some(bounds::debug_bounds_mesh(&bounding_box))
        };

        self.triangle_count += collision.len() / 3;

        Ok(GridObjectView {
            mesh: ObjectMesh::Composite(nodes),
            collision: CollisionData {
                triangles: collision,
                bounding_box,
                bounding_square: None,
                segments: Vec::new(),
            },
            debug_mesh,
            position: Vec3::ZERO,
            size: Vec3::ZERO,
            panel_textures: None,
        })
    }

    /// Door or elevator: cap polygon plus side skirt, all vertices
    /// relative to the anchor so the assembly translates as a rigid body
    pub fn build_moving_sector_view(
        &mut self,
        object: &str,
        moving: &MovingSector,
        elevator: bool,
    ) -> Result<GridObjectView, ContentError> {
        let position = moving.anchor_position(elevator);
        let (bottom_y, top_y) = moving.travel_range(elevator);
        let segments = boundary_segments(moving, bottom_y, top_y);
        let mut collision: Vec<Vec3> = Vec::new();

        // Cap: at the floor plane; elevator caps are stood upon (normal
        // up), door caps are seen from below (normal down)
        let winding = if elevator { FaceWinding::Up } else { FaceWinding::Down };
        let cap_texture = if elevator {
            &moving.sector.floor_texture
        } else {
            &moving.sector.ceiling_texture
        };
        let cap_world = triangles::sector_triangles(
            &moving.sector.render_vertices,
            &moving.sector.render_indices,
            moving.sector.floor_y,
            winding,
            object,
            "render",
        )?;
        let cap_uvs = uv::planar_uvs(&cap_world, self.tex_scale);
        let mut cap_data = MeshData::from_triangle_list(&cap_world, &cap_uvs);
        cap_data.translate(position.scale(-1.0));
        let cap_node = MeshNode {
            data: cap_data,
            material: self.materials.instantiate(cap_texture),
            position,
        };

        let mut cap_collision = triangles::sector_triangles(
            &moving.sector.collision_vertices,
            &moving.sector.collision_indices,
            moving.sector.floor_y,
            winding,
            object,
            "collision",
        )?;
        collision.append(&mut cap_collision);

        // Side skirt: one vertical quad per footprint edge, wrapping
        let ring = &moving.sector.render_vertices;
        let mut skirt_world: Vec<Vec3> = Vec::with_capacity(ring.len() * 6);
        let mut skirt_uvs: Vec<[Vec2; 3]> = Vec::with_capacity(ring.len() * 2);
        for i in 0..ring.len() {
            let next = (i + 1) % ring.len();
            let start = ring[i];
            let end = ring[next];

            let distance = start.distance_to(end);
            if distance <= f32::EPSILON {
                self.warn(format!(
                    "{}: degenerate zero-length footprint edge at ({}, {})",
                    object, start.x, start.y
                ));
            }
            let length = uv::repeat_length(distance, self.tex_scale);

            skirt_world.extend_from_slice(&triangles::skirt_quad(start, end, bottom_y, top_y));
            let face_uvs = uv::skirt_face_uvs(length, top_y, bottom_y, self.tex_scale);
            skirt_uvs.push(face_uvs[0]);
            skirt_uvs.push(face_uvs[1]);
        }
        collision.extend_from_slice(&skirt_world);

        let mut skirt_data = MeshData::from_triangle_list(&skirt_world, &skirt_uvs);
        skirt_data.translate(position.scale(-1.0));
        let skirt_node = MeshNode {
            data: skirt_data,
            material: self.materials.instantiate(&moving.side_texture),
            position,
        };

        let bounding_box = bounds::bounding_box(&collision);
        let size = bounding_box.half_extent();

        self.triangle_count += collision.len() / 3;

        Ok(GridObjectView {
            mesh: ObjectMesh::Composite(vec![cap_node, skirt_node]),
            collision: CollisionData {
                triangles: collision,
                bounding_box,
                bounding_square: None,
                segments,
            },
            debug_mesh: Some(bounds::debug_marker_mesh(position)),
            position,
            size,
            panel_textures: None,
        })
    }

    /// Point entity: cataloged mesh at the entity position; solid
    /// entities get a box collision volume and a footprint square
    pub fn build_entity_view(&mut self, object: &str, entity: &PointEntity) -> Result<GridObjectView, ContentError> {
        let data = self
            .meshes
            .get(&entity.mesh_name)
            .cloned()
            .ok_or_else(|| ContentError::new(
                object,
                format!("unknown mesh '{}'", entity.mesh_name),
            ))?;
        let material = self.materials.instantiate(&entity.texture);

        let mut collision = CollisionData::default();
        if entity.solid {
            collision.triangles = bounds::entity_collision_triangles(entity.position, entity.size);
            collision.bounding_box = bounds::bounding_box(&collision.triangles);
            collision.bounding_square = Some(bounds::entity_bounding_square(entity.position, entity.size));
        }

        Ok(GridObjectView {
            mesh: ObjectMesh::Single(MeshNode {
                data,
                material,
                position: entity.position,
            }),
            collision,
            debug_mesh: Some(bounds::debug_marker_mesh(entity.position)),
            position: entity.position,
            size: entity.size,
            panel_textures: None,
        })
    }

    /// Screen or switch quad mounted flush on a wall segment
    pub fn build_panel_view(&mut self, object: &str, panel: &ScreenPanel) -> Result<GridObjectView, ContentError> {
        let (seg, material, panel_textures) = match &panel.style {
            PanelStyle::Screen => {
                let mut material = self.materials.instantiate(&panel.segment.texture);
                material.transparent = true;
                material.overlay = true;
                (panel.segment.clone(), material, None)
            }
            PanelStyle::Switch { texture_on, texture_off } => {
                // Switches sit one quad-height off the segment bottom
                let mut seg = panel.segment.clone();
                seg.bottom_y += SWITCH_QUAD_SIZE;
                seg.top_y = seg.bottom_y + SWITCH_QUAD_SIZE;
                (
                    seg,
                    Material::overlay(texture_off.clone()),
                    Some(PanelTextures {
                        on: texture_on.clone(),
                        off: texture_off.clone(),
                    }),
                )
            }
        };

        if seg.length() <= f32::EPSILON {
            self.warn(format!(
                "{}: degenerate zero-length panel segment at ({}, {})",
                object, seg.start.x, seg.start.y
            ));
        }

        let render = triangles::segment_collision_triangles(&seg);
        let uvs = uv::panel_quad_uvs();
        let data = MeshData::from_triangle_list(&render, &uvs);

        let mut collision = CollisionData::default();
        if panel_textures.is_some() {
            // Usable switches need a coarse box for activation queries
            let mut bounding_box = Aabb::new(
                seg.start.at_height(seg.bottom_y),
                seg.start.at_height(seg.bottom_y),
            );
            bounding_box.expand(seg.end.at_height(seg.top_y));
            collision.bounding_box = bounding_box;
        }

        Ok(GridObjectView {
            mesh: ObjectMesh::Single(MeshNode {
                data,
                material,
                position: Vec3::ZERO,
            }),
            collision,
            debug_mesh: None,
            position: Vec3::ZERO,
            size: Vec3::ZERO,
            panel_textures,
        })
    }

    /// Build one sector face, appending its collision triangles
    fn sector_face_node(
        &mut self,
        object: &str,
        sector: &SectorPolygon,
        winding: FaceWinding,
        height: f32,
        texture: &TextureRef,
        collision_out: &mut Vec<Vec3>,
    ) -> Result<MeshNode, ContentError> {
        let render = triangles::sector_triangles(
            &sector.render_vertices,
            &sector.render_indices,
            height,
            winding,
            object,
            "render",
        )?;
        let mut collision = triangles::sector_triangles(
            &sector.collision_vertices,
            &sector.collision_indices,
            height,
            winding,
            object,
            "collision",
        )?;

        let render_area = triangles::footprint_area(&render);
        if !render.is_empty() && render_area <= f32::EPSILON {
            self.warn(format!("{}: degenerate zero-area footprint", object));
        }
        // Divergent collision footprints are intentional (simplified
        // collision), but a large delta usually means authoring drift
        if !collision.is_empty() && render_area > f32::EPSILON {
            let collision_area = triangles::footprint_area(&collision);
            let delta = (render_area - collision_area).abs() / render_area;
            if delta > AREA_DIVERGENCE_WARN {
                self.warn(format!(
                    "{}: render/collision footprint areas differ by {:.1}% ({:.1} vs {:.1})",
                    object,
                    delta * 100.0,
                    render_area,
                    collision_area
                ));
            }
        }

        let uvs = uv::planar_uvs(&render, self.tex_scale);
        let data = MeshData::from_triangle_list(&render, &uvs);
        collision_out.append(&mut collision);

        Ok(MeshNode {
            data,
            material: self.materials.instantiate(texture),
            position: Vec3::ZERO,
        })
    }

    fn warn(&mut self, message: String) {
        eprintln!("content warning: {}", message);
        self.warnings.push(message);
    }
}

/// Which face of a sector polygon to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorPart {
    Floor,
    Ceiling,
}

/// Boundary edges of a moving sector's collision footprint, wrapping
/// last back to first
fn boundary_segments(moving: &MovingSector, bottom_y: f32, top_y: f32) -> Vec<BoundarySegment> {
    let ring = &moving.sector.collision_vertices;
    let mut segments = Vec::with_capacity(ring.len());
    for i in 0..ring.len() {
        let next = (i + 1) % ring.len();
        segments.push(BoundarySegment {
            start: ring[i],
            end: ring[next],
            bottom_y,
            top_y,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vec2;

    fn factory() -> ViewFactory {
        ViewFactory::new(MaterialCatalog::new())
    }

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

    fn wall(start: Vec2, end: Vec2) -> WallSegment {
        WallSegment::new(start, end, 0.0, 16.0, TextureRef::new("base", "wall_01"))
    }

    #[test]
    fn test_segment_view_quad() {
        let mut factory = factory();
        let seg = wall(Vec2::new(0.0, 0.0), Vec2::new(32.0, 0.0));
        let view = factory.build_segment_view("segment[0]", &seg).unwrap();

        let parts = view.mesh.parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].data.vertices.len(), 6);
        assert_eq!(parts[0].data.face_count(), 2);

        assert_eq!(view.collision.triangles.len(), 6);
        assert_eq!(factory.triangle_count(), 2);

        let bounds = view.collision.bounding_box;
        assert!((bounds.min.x - 0.0).abs() < 0.001);
        assert!((bounds.max.x - 32.0).abs() < 0.001);
        assert!((bounds.max.y - 16.0).abs() < 0.001);
        assert!(view.debug_mesh.is_some());
        assert!(factory.warnings().is_empty());
    }

    #[test]
    fn test_segment_view_long_wall_uv_range() {
        let mut factory = factory();
        let seg = wall(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        let view = factory.build_segment_view("segment[0]", &seg).unwrap();

        let length = uv::repeat_length(100.0, TEXTURE_SCALE);
        for vertex in &view.mesh.parts()[0].data.vertices {
            assert!(vertex.uv.x >= 0.0 && vertex.uv.x <= length + 0.001);
        }
    }

    #[test]
    fn test_degenerate_segment_warns_but_builds() {
        let mut factory = factory();
        let seg = wall(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        let view = factory.build_segment_view("segment[9]", &seg).unwrap();

        assert_eq!(view.collision.triangles.len(), 6);
        assert_eq!(factory.warnings().len(), 1);
        assert!(factory.warnings()[0].contains("segment[9]"));
    }

    #[test]
    fn test_sector_floor_and_ceiling_heights() {
        let mut factory = factory();
        let sector = square_sector(0.0, 10.0);

        let floor = factory
            .build_sector_view("sector[0] floor", &sector, SectorPart::Floor)
            .unwrap();
        assert_eq!(floor.collision.triangles.len() % 3, 0);
        assert!(floor.collision.triangles.iter().all(|v| v.y.abs() < 0.001));

        let ceiling = factory
            .build_sector_view("sector[0] ceiling", &sector, SectorPart::Ceiling)
            .unwrap();
        assert!(ceiling
            .collision
            .triangles
            .iter()
            .all(|v| (v.y - 10.0).abs() < 0.001));

        // Floor and ceiling cover the same footprint
        let floor_area = triangles::footprint_area(&floor.collision.triangles);
        let ceiling_area = triangles::footprint_area(&ceiling.collision.triangles);
        assert!((floor_area - 256.0).abs() < 0.01);
        assert!((floor_area - ceiling_area).abs() < 0.01);
    }

    #[test]
    fn test_open_air_sector_has_no_ceiling() {
        let mut factory = factory();
        let mut sector = square_sector(0.0, 10.0);
        sector.has_ceiling = false;

        let view = factory
            .build_sector_view("sector[0] ceiling", &sector, SectorPart::Ceiling)
            .unwrap();

        assert!(view.mesh.parts().is_empty());
        assert!(view.collision.triangles.is_empty());
        assert!(view.debug_mesh.is_none());
        assert_eq!(factory.triangle_count(), 0);
    }

    #[test]
    fn test_elevator_sector_has_no_static_floor() {
        let mut factory = factory();
        let mut sector = square_sector(0.0, 10.0);
        sector.elevator = true;

        let view = factory
            .build_sector_view("sector[0] floor", &sector, SectorPart::Floor)
            .unwrap();

        assert!(view.mesh.parts().is_empty());
        assert!(view.collision.triangles.is_empty());
    }

    #[test]
    fn test_sector_area_divergence_warns() {
        let mut factory = factory();
        let mut sector = square_sector(0.0, 10.0);
        // Collision footprint shrunk to one quadrant
        sector.collision_vertices = vec![
            Vec2::new(-8.0, -8.0),
            Vec2::new(0.0, -8.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(-8.0, 0.0),
        ];

        factory
            .build_sector_view("sector[4] floor", &sector, SectorPart::Floor)
            .unwrap();

        assert_eq!(factory.warnings().len(), 1);
        assert!(factory.warnings()[0].contains("sector[4]"));
        assert!(factory.warnings()[0].contains("differ"));
    }

    #[test]
    fn test_sector_view_rejects_bad_index() {
        let mut factory = factory();
        let mut sector = square_sector(0.0, 10.0);
        sector.render_indices[1] = 12;

        let err = factory
            .build_sector_view("sector[7] floor", &sector, SectorPart::Floor)
            .unwrap_err();
        assert!(err.to_string().contains("sector[7]"));
    }

    #[test]
    fn test_door_view_anchor_and_segments() {
        let mut factory = factory();
        let door = MovingSector::new(square_sector(0.0, 8.0), 0.0, TextureRef::new("base", "door_side"));
        let view = factory.build_moving_sector_view("door[0]", &door, false).unwrap();

        assert!((view.position.x - 0.0).abs() < 0.001);
        assert!((view.position.y - 4.0).abs() < 0.001);
        assert!((view.position.z - 0.0).abs() < 0.001);

        assert_eq!(view.collision.segments.len(), 4);
        for segment in &view.collision.segments {
            assert!((segment.bottom_y - 0.0).abs() < 0.001);
            assert!((segment.top_y - 8.0).abs() < 0.001);
        }

        // Cap + skirt parts, both anchored at the door position
        let parts = view.mesh.parts();
        assert_eq!(parts.len(), 2);
        assert!((parts[0].position.y - 4.0).abs() < 0.001);
        assert_eq!(parts[0].data.face_count(), 2);
        assert_eq!(parts[1].data.face_count(), 8);

        // Cap vertices are relative to the anchor: floor plane sits at -4
        assert!(parts[0]
            .data
            .vertices
            .iter()
            .all(|v| (v.pos.y - (-4.0)).abs() < 0.001));

        // Collision stays in world space: cap at 0, skirt spanning 0..8
        assert_eq!(view.collision.triangles.len(), 6 + 24);
        let bounds = view.collision.bounding_box;
        assert!((bounds.min.y - 0.0).abs() < 0.001);
        assert!((bounds.max.y - 8.0).abs() < 0.001);
        assert!((view.size.x - 8.0).abs() < 0.001);
        assert!((view.size.y - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_elevator_view_anchor_and_segments() {
        let mut factory = factory();
        let elevator = MovingSector::new(square_sector(0.0, 8.0), 4.0, TextureRef::new("base", "lift_side"));
        let view = factory
            .build_moving_sector_view("elevator[0]", &elevator, true)
            .unwrap();

        assert!((view.position.y - (-2.0)).abs() < 0.001);

        assert_eq!(view.collision.segments.len(), 4);
        for segment in &view.collision.segments {
            assert!((segment.bottom_y - (-4.0)).abs() < 0.001);
            assert!((segment.top_y - 0.0).abs() < 0.001);
        }

        // Elevator cap winds like a floor (normal up)
        let cap = &view.mesh.parts()[0];
        let normal = cap.data.vertices[0].normal;
        assert!((normal.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_entity_view_solid() {
        let mut factory = factory();
        factory.register_mesh("imp", MeshData::default());

        let entity = PointEntity::new(
            Vec3::new(10.0, 0.0, 20.0),
            Vec3::new(3.0, 8.0, 3.0),
            "imp",
            TextureRef::new("monsters", "imp"),
        );
        let view = factory.build_entity_view("entity[0]", &entity).unwrap();

        assert_eq!(view.collision.triangles.len(), 36);
        let square = view.collision.bounding_square.unwrap();
        assert!((square.min.x - 7.0).abs() < 0.001);
        assert!((square.max.x - 13.0).abs() < 0.001);
        assert!((square.max.y - 23.0).abs() < 0.001);
        assert!((view.position.x - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_entity_view_unknown_mesh() {
        let mut factory = factory();
        let entity = PointEntity::new(
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 1.0),
            "missing",
            TextureRef::none(),
        );

        let err = factory.build_entity_view("entity[3]", &entity).unwrap_err();
        assert!(err.to_string().contains("entity[3]"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_non_solid_entity_has_no_collision() {
        let mut factory = factory();
        factory.register_mesh("lamp", MeshData::default());

        let mut entity = PointEntity::new(
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 1.0),
            "lamp",
            TextureRef::none(),
        );
        entity.solid = false;

        let view = factory.build_entity_view("entity[0]", &entity).unwrap();
        assert!(view.collision.triangles.is_empty());
        assert!(view.collision.bounding_square.is_none());
    }

    #[test]
    fn test_switch_view_raised_quad() {
        let mut factory = factory();
        let panel = ScreenPanel {
            segment: wall(Vec2::new(0.0, 0.0), Vec2::new(16.0, 0.0)),
            style: PanelStyle::Switch {
                texture_on: TextureRef::new("base", "switch_on"),
                texture_off: TextureRef::new("base", "switch_off"),
            },
        };
        let view = factory.build_panel_view("panel[0]", &panel).unwrap();

        // Quad raised 8 units, 8 units tall
        let node = &view.mesh.parts()[0];
        let ys: Vec<f32> = node.data.vertices.iter().map(|v| v.pos.y).collect();
        assert!(ys.iter().all(|&y| y >= 8.0 - 0.001 && y <= 16.0 + 0.001));

        let bounds = view.collision.bounding_box;
        assert!((bounds.min.y - 8.0).abs() < 0.001);
        assert!((bounds.max.y - 16.0).abs() < 0.001);

        let textures = view.panel_textures.unwrap();
        assert_eq!(textures.off.name, "switch_off");
        assert_eq!(node.material.texture.name, "switch_off");
        assert!(node.material.transparent);
        assert!(node.material.overlay);
    }

    #[test]
    fn test_screen_view_unit_uvs() {
        let mut factory = factory();
        let panel = ScreenPanel {
            segment: wall(Vec2::new(0.0, 0.0), Vec2::new(16.0, 0.0)),
            style: PanelStyle::Screen,
        };
        let view = factory.build_panel_view("panel[0]", &panel).unwrap();

        let node = &view.mesh.parts()[0];
        assert_eq!(node.data.face_count(), 2);
        for vertex in &node.data.vertices {
            assert!(vertex.uv.x >= -0.001 && vertex.uv.x <= 1.001);
            assert!(vertex.uv.y >= -0.001 && vertex.uv.y <= 1.001);
        }
        assert!(view.panel_textures.is_none());
    }

    #[test]
    fn test_dispatch_by_kind() {
        let mut factory = factory();
        let object = GridObject::new(
            "segment[0]",
            GridObjectKind::WallSegment(wall(Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0))),
        );
        let view = factory.build_object_view(&object).unwrap();
        assert_eq!(view.mesh.face_count(), 2);
    }

    #[test]
    fn test_triangle_count_accumulates() {
        let mut factory = factory();
        let seg = wall(Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0));
        let sector = square_sector(0.0, 8.0);

        factory.build_segment_view("segment[0]", &seg).unwrap();
        factory
            .build_sector_view("sector[0] floor", &sector, SectorPart::Floor)
            .unwrap();

        // 2 wall triangles + 2 floor collision triangles
        assert_eq!(factory.triangle_count(), 4);
    }
}
