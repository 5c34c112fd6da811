//! The seam between the frame renderer and a graphics API.
//!
//! The renderer drives a [`GraphicsBackend`] with a fixed call sequence per
//! frame: `begin_frame`, frame-wide uniforms, then `set_uniform`/`draw` for
//! each entity, then `end_frame`. Uniform values persist until overwritten,
//! so a draw sees every uniform set since the frame began.

use cgmath::{Matrix4, Vector3};

use crate::gfx::{camera::Viewport, geometry::Mesh};

/// Uniforms understood by the three-point lighting program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformName {
    ModelView,
    Projection,
    Normal,
    Mvp,
    MaterialKd,
    MaterialKs,
    MaterialNs,
    KeyLightPosition,
    FillLightPosition,
    BackLightPosition,
    KeyLightColor,
    FillLightColor,
    BackLightColor,
}

impl UniformName {
    pub const ALL: [UniformName; 13] = [
        UniformName::ModelView,
        UniformName::Projection,
        UniformName::Normal,
        UniformName::Mvp,
        UniformName::MaterialKd,
        UniformName::MaterialKs,
        UniformName::MaterialNs,
        UniformName::KeyLightPosition,
        UniformName::FillLightPosition,
        UniformName::BackLightPosition,
        UniformName::KeyLightColor,
        UniformName::FillLightColor,
        UniformName::BackLightColor,
    ];

    /// Name of the uniform as it appears in shader source.
    pub fn as_str(self) -> &'static str {
        match self {
            UniformName::ModelView => "modelViewMatrix",
            UniformName::Projection => "projectionMatrix",
            UniformName::Normal => "normalMatrix",
            UniformName::Mvp => "MVP",
            UniformName::MaterialKd => "materialKd",
            UniformName::MaterialKs => "materialKs",
            UniformName::MaterialNs => "materialNs",
            UniformName::KeyLightPosition => "keyLightPosition",
            UniformName::FillLightPosition => "fillLightPosition",
            UniformName::BackLightPosition => "backLightPosition",
            UniformName::KeyLightColor => "keyLightColor",
            UniformName::FillLightColor => "fillLightColor",
            UniformName::BackLightColor => "backLightColor",
        }
    }
}

impl std::fmt::Display for UniformName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec3(Vector3<f32>),
    Float(f32),
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(m: Matrix4<f32>) -> Self {
        UniformValue::Mat4(m)
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(v: Vector3<f32>) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v.into())
    }
}

impl From<f32> for UniformValue {
    fn from(x: f32) -> Self {
        UniformValue::Float(x)
    }
}

/// How triangles are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Filled,
    Wireframe,
}

/// Graphics API used by [`Renderer`](super::renderer::Renderer).
///
/// Handles are opaque to the renderer. Every handle returned by
/// `compile_program` or `upload_mesh` is passed back to the matching
/// `release_*` call exactly once.
pub trait GraphicsBackend {
    type Program;
    type MeshBuffers;

    /// Builds the three-point lighting program. Compile and link failures
    /// are logged by the backend; a handle is returned regardless.
    fn compile_program(&mut self) -> Self::Program;

    fn upload_mesh(&mut self, mesh: &Mesh) -> Self::MeshBuffers;

    fn set_viewport(&mut self, viewport: Viewport);

    fn set_display_mode(&mut self, mode: DisplayMode);

    /// Starts a frame with `program` bound and the target cleared to `clear`.
    ///
    /// Returns `false` when there is nothing to draw into this frame; the
    /// renderer then skips the rest of the frame.
    fn begin_frame(&mut self, program: &Self::Program, clear: [f32; 4]) -> bool;

    fn set_uniform(&mut self, name: UniformName, value: UniformValue);

    /// Indexed triangle draw of one uploaded mesh.
    fn draw(&mut self, mesh: &Self::MeshBuffers);

    fn end_frame(&mut self);

    fn release_mesh(&mut self, mesh: Self::MeshBuffers);

    fn release_program(&mut self, program: Self::Program);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uniform_names_are_unique() {
        let names: HashSet<_> = UniformName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(names.len(), UniformName::ALL.len());
        assert_eq!(UniformName::Mvp.to_string(), "MVP");
        assert_eq!(UniformName::BackLightColor.as_str(), "backLightColor");
    }
}
