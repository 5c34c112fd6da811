// src/gfx/resources/mod.rs
//! Shading and GPU resources
//!
//! Materials referenced by scene entities, and the depth buffer used by the
//! wgpu backend.

pub mod material;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, MaterialId};
pub use texture_resource::TextureResource;
