use std::path::Path;

use cgmath::Matrix4;

use super::{
    entity::{identity, Entity, MeshId},
    gizmo::{self, ReferenceShapes},
    loader::AssetLoader,
};
use crate::gfx::{
    geometry::{Mesh, Surface},
    resources::material::{Material, MaterialId},
};

/// Grid resolutions for the procedural reference shapes, as `(u, v)`.
pub const PLANE_RESOLUTION: (u32, u32) = (25, 50);
pub const SPHERE_RESOLUTION: (u32, u32) = (50, 25);
pub const CYLINDER_RESOLUTION: (u32, u32) = (100, 100);
pub const CONE_RESOLUTION: (u32, u32) = (100, 100);

/// Setup-phase scene storage.
///
/// Handles returned by `add_mesh` and `add_material` index into this builder
/// and stay valid in the [`Scene`] it produces.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    entities: Vec<Entity>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Appends an entity. Entities are drawn in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if either handle was not issued by this builder.
    pub fn add_entity(&mut self, mesh: MeshId, material: MaterialId, transform: Matrix4<f32>) {
        assert!(mesh.0 < self.meshes.len(), "{mesh:?} was not issued by this scene");
        assert!(
            material.0 < self.materials.len(),
            "{material:?} was not issued by this scene"
        );
        self.entities.push(Entity::new(mesh, material, transform));
    }

    pub fn build(self) -> Scene {
        Scene {
            meshes: self.meshes,
            materials: self.materials,
            entities: self.entities,
        }
    }
}

/// Counts of resources released by [`Scene::teardown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    pub meshes: usize,
    pub materials: usize,
}

/// Ordered entities plus the meshes and materials they refer to.
///
/// A scene is built once and is read-only afterwards.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    entities: Vec<Entity>,
}

impl Scene {
    /// Loads every path through `loader` and surrounds the result with the
    /// ground plane and the axes gizmo.
    ///
    /// A path that fails to load is logged and skipped.
    pub fn assemble<L, P>(loader: &L, paths: &[P]) -> Scene
    where
        L: AssetLoader + ?Sized,
        P: AsRef<Path>,
    {
        let mut builder = SceneBuilder::new();
        let default_material = builder.add_material(Material::default());

        for path in paths {
            let path = path.as_ref();
            match loader.load(path) {
                Ok(meshes) => {
                    log::info!("loaded {} mesh(es) from '{}'", meshes.len(), path.display());
                    for mesh in meshes {
                        let id = builder.add_mesh(mesh);
                        builder.add_entity(id, default_material, identity());
                    }
                }
                Err(e) => log::warn!("skipping '{}': {}", path.display(), e),
            }
        }

        let shapes = ReferenceShapes {
            plane: add_surface(&mut builder, Surface::Plane, PLANE_RESOLUTION),
            sphere: add_surface(&mut builder, Surface::Sphere, SPHERE_RESOLUTION),
            cylinder: add_surface(&mut builder, Surface::Cylinder, CYLINDER_RESOLUTION),
            cone: add_surface(&mut builder, Surface::Cone, CONE_RESOLUTION),
        };
        gizmo::add_ground_plane(&mut builder, &shapes, default_material);
        gizmo::add_axes_gizmo(&mut builder, &shapes);

        builder.build()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Meshes in upload order, paired with their handles.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Consumes the scene, dropping every mesh and material exactly once.
    pub fn teardown(self) -> TeardownReport {
        let Scene {
            meshes,
            materials,
            entities,
        } = self;
        drop(entities);

        let report = TeardownReport {
            meshes: meshes.into_iter().count(),
            materials: materials.into_iter().count(),
        };
        log::debug!(
            "released {} meshes and {} materials",
            report.meshes,
            report.materials
        );
        report
    }
}

fn add_surface(builder: &mut SceneBuilder, surface: Surface, (res_u, res_v): (u32, u32)) -> MeshId {
    let mesh = surface.tessellate(res_u, res_v);
    log::debug!(
        "{:?}: {} vertices, {} triangles",
        surface,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    builder.add_mesh(mesh)
}
