//! Error Types
//!
//! Recoverable failures surfaced by the library. Asset failures are expected
//! at runtime and are logged by the scene assembler; backend failures only
//! happen while the wgpu device and surface are being acquired.
//!
//! Violated preconditions of the parametric generator are programming errors
//! and panic instead of producing one of these values.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading meshes through an [`AssetLoader`](crate::gfx::scene::AssetLoader).
#[derive(Error, Debug)]
pub enum AssetError {
    /// The OBJ file could not be read or parsed.
    #[error("failed to load '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// The file parsed but contained no geometry.
    #[error("'{0}' contains no meshes")]
    Empty(PathBuf),

    /// A model in the file produced an inconsistent mesh.
    #[error("model '{model}' in '{path}' is invalid: {source}")]
    InvalidMesh {
        path: PathBuf,
        model: String,
        #[source]
        source: MeshError,
    },
}

/// Structural problems detected when building a [`Mesh`](crate::gfx::geometry::Mesh)
/// from raw arrays.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("{attribute} array has {len} floats, expected a multiple of {stride}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("index array has {0} entries, expected a multiple of 3")]
    IndexLength(usize),
}

/// Rejected viewport dimensions. Raised before any pointer event reaches the
/// camera controller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("viewport must have a positive size, got {width}x{height}")]
pub struct ViewportError {
    pub width: u32,
    pub height: u32,
}

/// Failure while bringing up the wgpu backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request a wgpu adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}
