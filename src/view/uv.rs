//! UV parameterization
//!
//! Texture coordinates come from world positions divided by the texture
//! scale. Walls longer than one tile repeat their texture roughly every
//! `tex_scale` world units, rounded to the nearest whole tile so the seam
//! lands on a texel boundary; shorter walls stretch sub-tile instead.

use crate::mesh::{Vec2, Vec3};

/// Horizontal repeat length for a wall of the given world length
pub fn repeat_length(distance: f32, tex_scale: f32) -> f32 {
    if distance > tex_scale {
        ((distance / (tex_scale * tex_scale)) * tex_scale).round()
    } else {
        distance / tex_scale
    }
}

/// Per-face UVs for a wall's render triangles.
///
/// `split` is the flat vertex index where the first triangle pair ends;
/// the horizontal orientation flips there so the texture runs the same
/// direction across the whole quad. V is always worldY / tex_scale.
pub fn wall_face_uvs(triangles: &[Vec3], split: usize, length: f32, tex_scale: f32) -> Vec<[Vec2; 3]> {
    let mut uvs = Vec::with_capacity(triangles.len() / 3);

    for base in (0..triangles.len()).step_by(3) {
        let v = |corner: usize| triangles[base + corner].y / tex_scale;
        if base < split {
            uvs.push([
                Vec2::new(0.0, v(0)),
                Vec2::new(length, v(1)),
                Vec2::new(length, v(2)),
            ]);
        } else {
            uvs.push([
                Vec2::new(length, v(0)),
                Vec2::new(0.0, v(1)),
                Vec2::new(0.0, v(2)),
            ]);
        }
    }

    uvs
}

/// Per-face UVs from the direct world XZ projection (floors, ceilings,
/// moving-sector caps). Sector footprints are authored texture-aligned, so
/// no repeat-length adjustment applies.
pub fn planar_uvs(triangles: &[Vec3], tex_scale: f32) -> Vec<[Vec2; 3]> {
    let mut uvs = Vec::with_capacity(triangles.len() / 3);

    for base in (0..triangles.len()).step_by(3) {
        let uv = |corner: usize| {
            let v = triangles[base + corner];
            Vec2::new(v.x / tex_scale, v.z / tex_scale)
        };
        uvs.push([uv(0), uv(1), uv(2)]);
    }

    uvs
}

/// UVs for one side-skirt quad: U is 0 at the start corner and `length` at
/// the end corner, V is worldY / tex_scale
pub fn skirt_face_uvs(length: f32, top_y: f32, bottom_y: f32, tex_scale: f32) -> [[Vec2; 3]; 2] {
    let top = top_y / tex_scale;
    let bottom = bottom_y / tex_scale;
    [
        [
            Vec2::new(0.0, top),
            Vec2::new(length, top),
            Vec2::new(0.0, bottom),
        ],
        [
            Vec2::new(length, top),
            Vec2::new(length, bottom),
            Vec2::new(0.0, bottom),
        ],
    ]
}

/// Fixed unit UVs for screen/switch quads (the whole texture maps onto the
/// quad regardless of its world size)
pub fn panel_quad_uvs() -> [[Vec2; 3]; 2] {
    [
        [
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
        ],
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ],
    ]
}
