//! Viewer configuration.
//!
//! Every tunable constant of the viewer lives here with its default. Library
//! components take the sub-structs by value; the binary fills a
//! [`ViewerConfig`] from the command line.

use std::path::PathBuf;

use cgmath::{Deg, Point3, Vector3};

/// Camera start pose and input response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    pub up: Vector3<f32>,
    /// Scene units moved by a pan or dolly drag across the full viewport.
    pub sensitivity: f32,
    /// Degrees of orbit for a drag across the full viewport.
    pub orbit_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Point3::new(1.0, 0.25, 1.0),
            center: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            sensitivity: 10.0,
            orbit_degrees: 360.0,
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub fovy: Deg<f32>,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fovy: Deg(90.0),
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_paths: Vec<PathBuf>,
    pub clear_color: [f32; 4],
    pub camera: CameraSettings,
    pub projection: ProjectionSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "trilite".to_string(),
            width: 1280,
            height: 720,
            asset_paths: Vec::new(),
            clear_color: [0.0, 0.3, 0.3, 0.0],
            camera: CameraSettings::default(),
            projection: ProjectionSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_asset_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.asset_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_projection(mut self, projection: ProjectionSettings) -> Self {
        self.projection = projection;
        self
    }
}
