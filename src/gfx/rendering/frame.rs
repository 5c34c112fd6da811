//! Per-frame transform and lighting math.
//!
//! Everything here is pure: given the view, the viewport and an entity's
//! model matrix it produces the matrices and light values a backend needs.
//! Projections follow the OpenGL clip-space convention; backends with a
//! different depth range correct it themselves.

use cgmath::{perspective, Matrix, Matrix4, SquareMatrix, Vector3};

use crate::{config::ProjectionSettings, gfx::camera::Viewport};

pub fn projection(settings: &ProjectionSettings, viewport: Viewport) -> Matrix4<f32> {
    perspective(settings.fovy, viewport.aspect(), settings.near, settings.far)
}

/// The three matrices uploaded for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTransforms {
    pub model_view: Matrix4<f32>,
    /// Transpose of the inverse model-view. Stays correct under
    /// non-uniform scale.
    pub normal: Matrix4<f32>,
    pub mvp: Matrix4<f32>,
}

impl EntityTransforms {
    pub fn new(view: Matrix4<f32>, model: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        let model_view = view * model;
        let normal = match model_view.invert() {
            Some(inverse) => inverse.transpose(),
            None => {
                log::debug!("singular model-view matrix, using identity normal matrix");
                Matrix4::identity()
            }
        };
        Self {
            model_view,
            normal,
            mvp: projection * model_view,
        }
    }
}

/// A light rigidly attached to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Offset in camera-relative object space.
    pub offset: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Light {
    /// Position for this frame: the offset pushed through the view matrix.
    pub fn position(&self, view: Matrix4<f32>) -> Vector3<f32> {
        (view * self.offset.extend(1.0)).truncate()
    }
}

/// Key, fill and back lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub key: Light,
    pub fill: Light,
    pub back: Light,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            key: Light {
                offset: Vector3::new(0.5, 0.5, 1.0),
                color: Vector3::new(0.8, 0.2, 0.2),
            },
            fill: Light {
                offset: Vector3::new(1.0, 0.0, 0.0),
                color: Vector3::new(0.2, 0.8, 0.2),
            },
            back: Light {
                offset: Vector3::new(-0.5, 0.5, -1.0),
                color: Vector3::new(0.2, 0.2, 0.8),
            },
        }
    }
}

/// Light positions and colours resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLights {
    pub positions: [Vector3<f32>; 3],
    pub colors: [Vector3<f32>; 3],
}

impl LightRig {
    pub fn resolve(&self, view: Matrix4<f32>) -> FrameLights {
        let lights = [self.key, self.fill, self.back];
        FrameLights {
            positions: lights.map(|l| l.position(view)),
            colors: lights.map(|l| l.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace, Point3, Transform, Vector4};

    #[test]
    fn test_projection_uses_aspect() {
        let settings = ProjectionSettings::default();
        let wide = projection(&settings, Viewport::new(200, 100).unwrap());
        let square = projection(&settings, Viewport::new(100, 100).unwrap());

        // fovy 90 gives a unit focal length vertically
        assert!((wide.y.y - 1.0).abs() < 1e-6);
        assert!((wide.x.x - 0.5).abs() < 1e-6);
        assert!((square.x.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_under_non_uniform_scale() {
        let model = Matrix4::from_nonuniform_scale(4.0, 1.0, 1.0);
        let t = EntityTransforms::new(Matrix4::identity(), model, Matrix4::identity());

        // surface x + y = 0 has normal (1, 1, 0); after scaling x by 4 the
        // surface is x/4 + y = 0 with normal (1/4, 1, 0)
        let n = (t.normal * Vector4::new(1.0, 1.0, 0.0, 0.0)).truncate().normalize();
        let expected = Vector3::new(0.25, 1.0, 0.0).normalize();
        assert!((n - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_mvp_composition_order() {
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0));
        let model = Matrix4::from_angle_y(Deg(90.0));
        let proj = projection(&ProjectionSettings::default(), Viewport::new(4, 3).unwrap());
        let t = EntityTransforms::new(view, model, proj);

        assert_eq!(t.model_view, view * model);
        assert_eq!(t.mvp, proj * (view * model));
        let p = t.model_view.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -4.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_singular_model_falls_back_to_identity_normal() {
        let model = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
        let t = EntityTransforms::new(Matrix4::identity(), model, Matrix4::identity());
        assert_eq!(t.normal, Matrix4::identity());
    }

    #[test]
    fn test_lights_follow_the_view() {
        let rig = LightRig::default();
        let identity = rig.resolve(Matrix4::identity());
        assert_eq!(identity.positions[0], Vector3::new(0.5, 0.5, 1.0));
        assert_eq!(identity.colors[2], Vector3::new(0.2, 0.2, 0.8));

        let view = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let moved = rig.resolve(view);
        assert_eq!(moved.positions[1], Vector3::new(2.0, 2.0, 3.0));
        assert_eq!(moved.colors, identity.colors);
    }
}
