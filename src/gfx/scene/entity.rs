use cgmath::{Deg, InnerSpace, Matrix4, SquareMatrix, Vector3};

use crate::gfx::resources::material::MaterialId;

/// Handle to a mesh owned by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A drawable: which mesh, with which material, placed where.
///
/// Entities only hold handles; the [`Scene`](super::Scene) that issued them
/// owns the mesh and material storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    mesh: MeshId,
    material: MaterialId,
    transform: Matrix4<f32>, // model -> scene
}

impl Entity {
    pub(crate) fn new(mesh: MeshId, material: MaterialId, transform: Matrix4<f32>) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Model-to-scene transform
    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }
}

/// Right-multiplies `m` by a rotation of `angle` about `axis`.
///
/// The axis does not need to be unit length.
pub fn rotate(m: Matrix4<f32>, angle: Deg<f32>, axis: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_axis_angle(axis.normalize(), angle)
}

/// Right-multiplies `m` by a non-uniform scale.
pub fn scale(m: Matrix4<f32>, factors: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_nonuniform_scale(factors.x, factors.y, factors.z)
}

/// Right-multiplies `m` by a translation.
pub fn translate(m: Matrix4<f32>, offset: Vector3<f32>) -> Matrix4<f32> {
    m * Matrix4::from_translation(offset)
}

/// Identity transform, for loaded meshes.
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}
