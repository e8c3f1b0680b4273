//! Triangle-list mesh representation filled by the view builders

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3};

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// A triangle face (indices into the vertex array)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Renderable triangle-list geometry.
///
/// Vertices are stored unshared, three per face, so face `i` owns vertices
/// `3i..3i+3`. `light_map_uvs` is the per-face second UV channel; it stays
/// empty until the light-map injection pass runs and is always either empty
/// or exactly `faces.len()` entries long.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    #[serde(default)]
    pub light_map_uvs: Vec<[Vec2; 3]>,
}

impl MeshData {
    /// Build a mesh from a flat triangle list and matching per-face UVs.
    ///
    /// `triangles.len()` must be a multiple of 3 and `uvs` must hold one
    /// entry per triangle. Face normals come from the winding order.
    pub fn from_triangle_list(triangles: &[Vec3], uvs: &[[Vec2; 3]]) -> Self {
        debug_assert_eq!(triangles.len() % 3, 0);
        debug_assert_eq!(uvs.len(), triangles.len() / 3);

        let face_count = triangles.len() / 3;
        let mut vertices = vec![Vertex::default(); triangles.len()];
        let mut faces = vec![Face::new(0, 0, 0); face_count];

        for face in 0..face_count {
            let base = face * 3;
            let normal = face_normal(
                triangles[base],
                triangles[base + 1],
                triangles[base + 2],
            );
            for corner in 0..3 {
                vertices[base + corner] = Vertex::new(
                    triangles[base + corner],
                    uvs[face][corner],
                    normal,
                );
            }
            faces[face] = Face::new(base, base + 1, base + 2);
        }

        Self {
            vertices,
            faces,
            light_map_uvs: Vec::new(),
        }
    }

    /// Number of triangle faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Translate every vertex position by `offset`.
    /// Used to re-express world-space geometry relative to an anchor.
    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            vertex.pos = vertex.pos + offset;
        }
    }
}

/// Normal of a triangle from its winding order (counter-clockwise = front)
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize()
}
