// src/lib.rs
//! Trilite
//!
//! A small triangle-mesh viewer: OBJ models and procedural reference
//! geometry drawn with three-point lighting through wgpu, with a
//! matrix-accumulating orbit/pan/dolly camera.

pub mod app;
pub mod config;
pub mod errors;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TriliteApp;
pub use config::ViewerConfig;
