//! Material system for Blinn-Phong shading
//!
//! Materials are immutable after construction and stored centrally in the
//! [`Scene`](crate::gfx::scene::Scene); entities reference them by [`MaterialId`].

/// Handle to a material owned by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shading parameters: diffuse colour, specular colour and shininess exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    diffuse: [f32; 3],
    specular: [f32; 3],
    shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.8, 0.8, 0.8], [1.0, 1.0, 1.0], 25.0)
    }
}

impl Material {
    /// Creates a new material
    ///
    /// # Arguments
    /// * `diffuse` - RGB diffuse reflectance (Kd)
    /// * `specular` - RGB specular reflectance (Ks)
    /// * `shininess` - Specular exponent (Ns)
    pub const fn new(diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// A material with a white specular highlight, as used by the axis gizmo.
    pub const fn with_white_highlight(diffuse: [f32; 3], shininess: f32) -> Self {
        Self::new(diffuse, [1.0, 1.0, 1.0], shininess)
    }

    pub fn diffuse(&self) -> [f32; 3] {
        self.diffuse
    }

    pub fn specular(&self) -> [f32; 3] {
        self.specular
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }
}
