//! Mesh loading from external files.

use std::path::Path;

use crate::{errors::AssetError, gfx::geometry::Mesh};

/// Source of meshes for scene assembly.
///
/// A failed load is not fatal: the assembler logs the reason and continues
/// with whatever else loaded.
pub trait AssetLoader {
    fn load(&self, path: &Path) -> Result<Vec<Mesh>, AssetError>;
}

/// Wavefront OBJ loader backed by `tobj`.
///
/// Every model in the file becomes one mesh. Faces are triangulated and
/// positions, normals and texture coordinates share one index stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl AssetLoader for ObjLoader {
    fn load(&self, path: &Path) -> Result<Vec<Mesh>, AssetError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let meshes = models
            .iter()
            .filter(|m| !m.mesh.indices.is_empty())
            .map(|m| {
                let mesh = &m.mesh;
                Mesh::from_flat(&mesh.positions, &mesh.normals, &mesh.texcoords, &mesh.indices)
                    .map_err(|source| AssetError::InvalidMesh {
                        path: path.to_path_buf(),
                        model: m.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if meshes.is_empty() {
            return Err(AssetError::Empty(path.to_path_buf()));
        }

        for mesh in &meshes {
            if !mesh.has_normals {
                log::warn!(
                    "'{}' has a mesh without normals; it will render unlit",
                    path.display()
                );
            }
        }

        Ok(meshes)
    }
}
