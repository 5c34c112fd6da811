//! # Graphics Module
//!
//! Everything between loaded triangles and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - mesh model and parametric surface tessellation
//! - **Scene** ([`scene`]) - entity storage, asset loading and reference geometry
//! - **Camera** ([`camera`]) - pointer-driven view matrix controller
//! - **Rendering** ([`rendering`]) - per-frame transforms, lighting and the wgpu backend
//! - **Resources** ([`resources`]) - materials and depth buffers
//!
//! ## Usage
//!
//! ```no_run
//! use trilite::gfx::scene::{ObjLoader, Scene};
//!
//! // The renderer is normally created by TriliteApp once a window exists
//! let scene = Scene::assemble(&ObjLoader, &["bunny.obj"]);
//! assert!(scene.entities().len() >= 8);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::CameraController;
pub use rendering::{Renderer, WgpuBackend};
pub use scene::Scene;
