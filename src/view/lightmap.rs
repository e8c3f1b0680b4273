//! Light-map UV injection
//!
//! Baked lighting ships as a flat plain-text stream of UV pairs, one per
//! line after a leading tag field. A single pass distributes the stream
//! across already-built views: three pairs per render face, views in
//! caller order, composite parts and faces in their stored order. The
//! pass is purely sequential; reordering views or faces produces silently
//! wrong output, so integrators must supply the same traversal order the
//! stream was baked against.

use crate::mesh::Vec2;
use super::factory::GridObjectView;

/// Errors from parsing or injecting a light-map stream
#[derive(Debug)]
pub enum LightMapError {
    /// A non-empty line did not contain two numeric fields after the tag
    Malformed { line: usize },
    /// Stream too short for the faces being injected; fatal for the pass
    LengthMismatch { required: usize, available: usize },
}

impl std::fmt::Display for LightMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightMapError::Malformed { line } => {
                write!(f, "malformed light-map line {}", line)
            }
            LightMapError::LengthMismatch { required, available } => {
                write!(
                    f,
                    "light-map stream too short: {} UV pairs required, {} available",
                    required, available
                )
            }
        }
    }
}

impl std::error::Error for LightMapError {}

/// Parse a plain-text UV stream: one pair per non-empty line, two
/// whitespace-separated floats after a leading tag field (ignored)
pub fn parse_light_map(text: &str) -> Result<Vec<Vec2>, LightMapError> {
    let mut uvs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let _tag = fields.next();
        let u = fields.next().and_then(|f| f.parse::<f32>().ok());
        let v = fields.next().and_then(|f| f.parse::<f32>().ok());
        match (u, v) {
            (Some(u), Some(v)) => uvs.push(Vec2::new(u, v)),
            _ => return Err(LightMapError::Malformed { line: index + 1 }),
        }
    }

    Ok(uvs)
}

/// Explicit read position into a flat UV stream.
///
/// The cursor is the only cross-call state of an injection pass and is
/// local to one invocation; it must not be shared across concurrent
/// passes.
#[derive(Debug)]
pub struct UvCursor<'a> {
    uvs: &'a [Vec2],
    position: usize,
}

impl<'a> UvCursor<'a> {
    pub fn new(uvs: &'a [Vec2]) -> Self {
        Self { uvs, position: 0 }
    }

    /// Pairs consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.uvs.len() - self.position
    }

    /// Consume the next three pairs as one face's light-map UVs
    pub fn take_face(&mut self) -> Result<[Vec2; 3], LightMapError> {
        if self.remaining() < 3 {
            return Err(LightMapError::LengthMismatch {
                required: self.position + 3,
                available: self.uvs.len(),
            });
        }
        let face = [
            self.uvs[self.position],
            self.uvs[self.position + 1],
            self.uvs[self.position + 2],
        ];
        self.position += 3;
        Ok(face)
    }
}

/// Distribute a flat UV stream across the views' render faces, in order.
///
/// Consumes exactly 3 pairs per face. A stream shorter than required
/// aborts before any view is touched; extra trailing pairs are ignored.
/// Only the second UV channel is written; vertex positions, first-channel
/// UVs, and face counts are untouched. Returns the number of pairs
/// consumed.
pub fn apply_light_map(uvs: &[Vec2], views: &mut [GridObjectView]) -> Result<usize, LightMapError> {
    let required: usize = views.iter().map(|view| view.mesh.face_count() * 3).sum();
    if uvs.len() < required {
        return Err(LightMapError::LengthMismatch {
            required,
            available: uvs.len(),
        });
    }

    let mut cursor = UvCursor::new(uvs);
    for view in views.iter_mut() {
        for part in view.mesh.parts_mut() {
            let face_count = part.data.face_count();
            let mut channel = Vec::with_capacity(face_count);
            for _ in 0..face_count {
                channel.push(cursor.take_face()?);
            }
            part.data.light_map_uvs = channel;
        }
    }

    Ok(cursor.position())
}
