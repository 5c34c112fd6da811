//! # Scene Module
//!
//! Scene storage and assembly. A [`Scene`] owns every mesh and material;
//! [`Entity`] values refer to them through [`MeshId`] and
//! [`MaterialId`](crate::gfx::resources::material::MaterialId) handles.
//!
//! ## Key Components
//!
//! - [`Scene`] - ordered entities plus owned meshes and materials
//! - [`SceneBuilder`] - setup-phase storage that issues handles
//! - [`AssetLoader`] / [`ObjLoader`] - external mesh sources
//! - [`Vertex3D`] - vertex layout shared with the GPU
//!
//! ## Usage
//!
//! ```no_run
//! use trilite::gfx::scene::{ObjLoader, Scene};
//!
//! let scene = Scene::assemble(&ObjLoader, &["teapot.obj"]);
//! println!("{} entities", scene.entities().len());
//! ```

pub mod entity;
pub mod gizmo;
pub mod loader;
pub mod scene;
pub mod vertex;

pub use entity::{Entity, MeshId};
pub use loader::{AssetLoader, ObjLoader};
pub use scene::{Scene, SceneBuilder, TeardownReport};
pub use vertex::Vertex3D;
