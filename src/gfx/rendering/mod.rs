// src/gfx/rendering/mod.rs
//! Frame rendering
//!
//! [`Renderer`] issues one draw per scene entity through a [`GraphicsBackend`].
//! [`WgpuBackend`] is the backend used by the viewer binary.

pub mod backend;
pub mod frame;
pub mod pipeline_manager;
pub mod render_engine;
pub mod renderer;

// Re-export main types
pub use backend::{DisplayMode, GraphicsBackend, UniformName, UniformValue};
pub use frame::{EntityTransforms, LightRig};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::WgpuBackend;
pub use renderer::Renderer;
