//! Triangle extraction
//!
//! Turns wall segments and sector polygons into flat world-space triangle
//! lists. Render and collision variants are extracted separately: walls use
//! two different quad decompositions, sectors use two independently-authored
//! triangulations of the same footprint.

use crate::mesh::{Vec2, Vec3};
use crate::world::WallSegment;
use super::factory::ContentError;

/// Which way a horizontal face's normal points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceWinding {
    /// Floors and elevator caps (walkable from above)
    Up,
    /// Ceilings and door caps (visible from below)
    Down,
}

/// Render decomposition of a wall quad.
///
/// Two triangles sharing the start-top / end-bottom diagonal, plus the
/// split index into the flat vertex list where the first triangle pair
/// ends (the horizontal UV orientation flips there).
pub fn segment_render_triangles(seg: &WallSegment) -> (Vec<Vec3>, usize) {
    let triangles = vec![
        seg.start.at_height(seg.top_y),
        seg.end.at_height(seg.top_y),
        seg.end.at_height(seg.bottom_y),
        seg.end.at_height(seg.bottom_y),
        seg.start.at_height(seg.bottom_y),
        seg.start.at_height(seg.top_y),
    ];
    (triangles, 3)
}

/// Collision decomposition of a wall quad (shared end-top / start-bottom
/// diagonal; the physics code expects this specific vertex order)
pub fn segment_collision_triangles(seg: &WallSegment) -> Vec<Vec3> {
    skirt_quad(seg.start, seg.end, seg.bottom_y, seg.top_y).to_vec()
}

/// Vertical quad between two footprint points, as used by moving-sector
/// side skirts and panel quads
pub fn skirt_quad(start: Vec2, end: Vec2, bottom_y: f32, top_y: f32) -> [Vec3; 6] {
    [
        start.at_height(top_y),
        end.at_height(top_y),
        start.at_height(bottom_y),
        end.at_height(top_y),
        end.at_height(bottom_y),
        start.at_height(bottom_y),
    ]
}

/// Project a polygon triangulation onto a height plane.
///
/// Walks `indices` in triples and emits one world-space triangle per
/// triple. `Up` reverses each triple so the face normal points up without
/// a separate normal-flip step. Out-of-range indices are content errors
/// reported against `object`.
pub fn sector_triangles(
    vertices: &[Vec2],
    indices: &[usize],
    height: f32,
    winding: FaceWinding,
    object: &str,
    which: &str,
) -> Result<Vec<Vec3>, ContentError> {
    let mut triangles = vec![Vec3::ZERO; indices.len()];

    let lookup = |slot: usize| -> Result<Vec3, ContentError> {
        let index = indices[slot];
        vertices
            .get(index)
            .map(|v| v.at_height(height))
            .ok_or_else(|| ContentError::new(
                object,
                format!(
                    "{} index[{}] = {} out of range (only {} vertices)",
                    which, slot, index, vertices.len()
                ),
            ))
    };

    for base in (0..indices.len()).step_by(3) {
        match winding {
            FaceWinding::Up => {
                triangles[base] = lookup(base + 2)?;
                triangles[base + 1] = lookup(base + 1)?;
                triangles[base + 2] = lookup(base)?;
            }
            FaceWinding::Down => {
                triangles[base] = lookup(base)?;
                triangles[base + 1] = lookup(base + 1)?;
                triangles[base + 2] = lookup(base + 2)?;
            }
        }
    }

    Ok(triangles)
}

/// Total XZ footprint area of a flat triangle list
pub fn footprint_area(triangles: &[Vec3]) -> f32 {
    let mut area = 0.0;
    for base in (0..triangles.len()).step_by(3) {
        let a = triangles[base].to_footprint();
        let b = triangles[base + 1].to_footprint();
        let c = triangles[base + 2].to_footprint();
        let ab = b - a;
        let ac = c - a;
        area += (ab.x * ac.y - ab.y * ac.x).abs() * 0.5;
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TextureRef;

    fn seg() -> WallSegment {
        WallSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            0.0,
            8.0,
            TextureRef::none(),
        )
    }

    #[test]
    fn test_segment_render_quad() {
        let (tris, split) = segment_render_triangles(&seg());
        assert_eq!(tris.len(), 6);
        assert_eq!(split, 3);

        // Both triangles share the start-top / end-bottom diagonal
        assert!((tris[0].x - tris[5].x).abs() < 0.001);
        assert!((tris[0].y - tris[5].y).abs() < 0.001);
        assert!((tris[2].x - tris[3].x).abs() < 0.001);
        assert!((tris[2].y - tris[3].y).abs() < 0.001);
    }

    #[test]
    fn test_segment_collision_quad() {
        let tris = segment_collision_triangles(&seg());
        assert_eq!(tris.len(), 6);

        // Specific vertex order: start-top, end-top, start-bottom, ...
        assert!((tris[0].y - 8.0).abs() < 0.001);
        assert!((tris[1].x - 10.0).abs() < 0.001);
        assert!((tris[2].y - 0.0).abs() < 0.001);
        assert!((tris[4].x - 10.0).abs() < 0.001);
        assert!((tris[4].y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_sector_triangles_heights_and_winding() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 0.0),
            Vec2::new(16.0, 16.0),
            Vec2::new(0.0, 16.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        let floor = sector_triangles(&vertices, &indices, 0.0, FaceWinding::Up, "sector[0]", "render").unwrap();
        assert_eq!(floor.len(), 6);
        assert!(floor.iter().all(|v| v.y.abs() < 0.001));
        // Up winding reverses each triple
        assert!((floor[0].x - 16.0).abs() < 0.001);
        assert!((floor[2].x - 0.0).abs() < 0.001);

        let ceiling = sector_triangles(&vertices, &indices, 10.0, FaceWinding::Down, "sector[0]", "render").unwrap();
        assert!(ceiling.iter().all(|v| (v.y - 10.0).abs() < 0.001));
        assert!((ceiling[0].x - 0.0).abs() < 0.001);

        let up = crate::mesh::face_normal(floor[0], floor[1], floor[2]);
        assert!((up.y - 1.0).abs() < 0.001);
        let down = crate::mesh::face_normal(ceiling[0], ceiling[1], ceiling[2]);
        assert!((down.y - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_sector_triangles_rejects_bad_index() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let indices = vec![0, 1, 7];

        let err = sector_triangles(&vertices, &indices, 0.0, FaceWinding::Up, "sector[3]", "collision").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sector[3]"));
        assert!(message.contains("7"));
    }

    #[test]
    fn test_footprint_area_matches_polygon() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 0.0),
            Vec2::new(16.0, 16.0),
            Vec2::new(0.0, 16.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        let floor = sector_triangles(&vertices, &indices, 5.0, FaceWinding::Up, "s", "render").unwrap();
        assert!((footprint_area(&floor) - 256.0).abs() < 0.01);
    }
}
