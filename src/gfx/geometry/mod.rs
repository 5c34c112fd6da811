//! # Mesh Geometry
//!
//! The CPU-side mesh model shared by the asset loader, the parametric
//! generator and the renderer.
//!
//! ## Usage
//!
//! ```
//! use trilite::gfx::geometry::{generate, Surface};
//!
//! let sphere = generate(8, 4, Surface::Sphere.evaluator());
//! assert_eq!(sphere.vertex_count(), 9 * 5);
//! assert_eq!(sphere.triangle_count(), 2 * 8 * 4);
//! ```

pub mod parametric;

pub use parametric::*;

use crate::errors::MeshError;
use crate::gfx::scene::vertex::Vertex3D;

/// Indexed triangle mesh.
///
/// Every index is smaller than the vertex count and triangles are wound
/// counter-clockwise when seen from the side the vertex normals point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex3D>,
    pub triangles: Vec<[u32; 3]>,
    pub has_normals: bool,
    pub has_tex_coords: bool,
}

impl Mesh {
    /// Builds a mesh from already interleaved vertices, checking that every
    /// triangle index is in range.
    pub fn new(
        vertices: Vec<Vertex3D>,
        triangles: Vec<[u32; 3]>,
        has_normals: bool,
        has_tex_coords: bool,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            vertices,
            triangles,
            has_normals,
            has_tex_coords,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Builds a mesh from flat attribute arrays as produced by OBJ loaders.
    ///
    /// `normals` and `tex_coords` may be empty, in which case the attribute is
    /// zero-filled and the matching flag is cleared.
    pub fn from_flat(
        positions: &[f32],
        normals: &[f32],
        tex_coords: &[f32],
        indices: &[u32],
    ) -> Result<Self, MeshError> {
        check_stride("position", positions, 3)?;
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexLength(indices.len()));
        }

        let vertex_count = positions.len() / 3;
        let has_normals = normals.len() == positions.len();
        let has_tex_coords = tex_coords.len() == vertex_count * 2;
        if !has_normals && !normals.is_empty() {
            check_stride("normal", normals, 3)?;
        }
        if !has_tex_coords && !tex_coords.is_empty() {
            check_stride("texcoord", tex_coords, 2)?;
        }

        let vertices = (0..vertex_count)
            .map(|i| {
                let normal = if has_normals {
                    [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
                } else {
                    [0.0; 3]
                };
                let tex = if has_tex_coords {
                    [tex_coords[i * 2], tex_coords[i * 2 + 1]]
                } else {
                    [0.0; 2]
                };
                Vertex3D::new(
                    [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                    normal,
                    tex,
                )
            })
            .collect();

        let triangles = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();

        Self::new(vertices, triangles, has_normals, has_tex_coords)
    }

    /// Checks the index invariant.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        for (triangle, indices) in self.triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Get the number of vertices in this mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this mesh
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of indices issued by an indexed draw of this mesh.
    pub fn index_count(&self) -> u32 {
        (self.triangles.len() * 3) as u32
    }
}

fn check_stride(attribute: &'static str, data: &[f32], stride: usize) -> Result<(), MeshError> {
    if data.len() % stride != 0 {
        return Err(MeshError::AttributeLength {
            attribute,
            len: data.len(),
            stride,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_without_optional_attributes() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = Mesh::from_flat(&positions, &[], &[], &[0, 1, 2]).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals);
        assert!(!mesh.has_tex_coords);
        assert_eq!(mesh.vertices[1].normal, [0.0; 3]);
    }

    #[test]
    fn test_from_flat_keeps_attributes() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let tex = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let mesh = Mesh::from_flat(&positions, &normals, &tex, &[0, 1, 2]).unwrap();

        assert!(mesh.has_normals);
        assert!(mesh.has_tex_coords);
        assert_eq!(mesh.vertices[2].tex_coords, [0.0, 1.0]);
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let positions = [0.0; 6];
        let err = Mesh::from_flat(&positions, &[], &[], &[0, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                triangle: 0,
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn test_ragged_arrays_are_rejected() {
        assert!(matches!(
            Mesh::from_flat(&[0.0; 4], &[], &[], &[]),
            Err(MeshError::AttributeLength { attribute: "position", .. })
        ));
        assert_eq!(
            Mesh::from_flat(&[0.0; 9], &[], &[], &[0, 1]),
            Err(MeshError::IndexLength(2))
        );
    }
}
