//! Bounding volume builder
//!
//! Axis-aligned boxes derived from collision triangle sets, the 2D
//! bounding square used for cylindrical entities, and the wireframe debug
//! boxes generated alongside for tooling.

use crate::mesh::{MeshData, Vec2, Vec3};
use crate::world::{Aabb, Aabb2};

/// Padding added to debug box half-extents so the wireframe never
/// z-fights the real geometry
pub const DEBUG_BOX_EPSILON: f32 = 0.005;

/// Scan a flat point list into an axis-aligned box.
/// Empty input yields a degenerate box at the origin.
pub fn bounding_box(points: &[Vec3]) -> Aabb {
    let mut bounds = match points.first() {
        Some(&first) => Aabb::new(first, first),
        None => return Aabb::default(),
    };
    for &point in &points[1..] {
        bounds.expand(point);
    }
    bounds
}

/// Unit cube (corners at ±1) as a flat triangle list, outward winding
pub fn unit_cube_triangles() -> [Vec3; 36] {
    let p = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    [
        // -Z
        p[0], p[3], p[2], p[0], p[2], p[1],
        // +Z
        p[4], p[5], p[6], p[4], p[6], p[7],
        // -X
        p[0], p[4], p[7], p[0], p[7], p[3],
        // +X
        p[1], p[2], p[6], p[1], p[6], p[5],
        // -Y
        p[0], p[1], p[5], p[0], p[5], p[4],
        // +Y
        p[3], p[7], p[6], p[3], p[6], p[2],
    ]
}

/// Scale and translate the unit cube into a box mesh
fn box_mesh(center: Vec3, half_extent: Vec3) -> MeshData {
    let triangles: Vec<Vec3> = unit_cube_triangles()
        .iter()
        .map(|v| v.mul_components(half_extent) + center)
        .collect();
    let uvs = vec![[Vec2::ZERO; 3]; triangles.len() / 3];
    MeshData::from_triangle_list(&triangles, &uvs)
}

/// Wireframe visualization of a bounding box, slightly inflated
pub fn debug_bounds_mesh(bounds: &Aabb) -> MeshData {
    let padding = Vec3::new(DEBUG_BOX_EPSILON, DEBUG_BOX_EPSILON, DEBUG_BOX_EPSILON);
    box_mesh(bounds.center(), bounds.half_extent() + padding)
}

/// Unit-sized wireframe marker at a position (anchors of moving sectors
/// and entities)
pub fn debug_marker_mesh(position: Vec3) -> MeshData {
    box_mesh(position, Vec3::new(0.5, 0.5, 0.5))
}

/// Collision triangles for a box-shaped entity: the unit cube scaled by
/// the entity's half-extents and moved to its position
pub fn entity_collision_triangles(position: Vec3, size: Vec3) -> Vec<Vec3> {
    unit_cube_triangles()
        .iter()
        .map(|v| v.mul_components(size) + position)
        .collect()
}

/// 2D bounding square for a cylindrical entity, from its footprint rather
/// than its collision triangles
pub fn entity_bounding_square(position: Vec3, size: Vec3) -> Aabb2 {
    let center = position.to_footprint();
    let half = size.to_footprint();
    Aabb2::new(center - half, center + half)
}
