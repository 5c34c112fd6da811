pub mod camera_controller;
pub mod camera_utils;

// Re-export main types
pub use camera_controller::{CameraController, DragState};
pub use camera_utils::{Modifiers, MouseButton, PointerEvent, Viewport};
