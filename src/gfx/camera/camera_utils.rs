use cgmath::{InnerSpace, Matrix4, Vector3};

use crate::errors::ViewportError;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pointer button carried by a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Wheel,
    /// Motion report, not a physical button.
    Move,
    /// Any other code. Accepted but ignored.
    Other(u32),
}

impl MouseButton {
    pub const LEFT: u32 = 0x01;
    pub const MIDDLE: u32 = 0x02;
    pub const RIGHT: u32 = 0x04;
    pub const WHEEL: u32 = 0x08;
    pub const MOVE: u32 = 0x10;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::LEFT => MouseButton::Left,
            Self::MIDDLE => MouseButton::Middle,
            Self::RIGHT => MouseButton::Right,
            Self::WHEEL => MouseButton::Wheel,
            Self::MOVE => MouseButton::Move,
            other => MouseButton::Other(other),
        }
    }
}

/// Keyboard modifier bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0x00);
    pub const CONTROL: Modifiers = Modifiers(0x01);
    pub const SHIFT: Modifiers = Modifiers(0x02);
    pub const ALT: Modifiers = Modifiers(0x04);

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

/// Toolkit-independent pointer event.
///
/// `click` is true for a press and false for everything else; a
/// `click == false` event whose button is neither [`MouseButton::Move`] nor
/// [`MouseButton::Wheel`] is a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub click: bool,
    pub modifiers: Modifiers,
    pub x: i32,
    pub y: i32,
    /// Wheel steps, zero for other events.
    pub delta: i32,
}

impl PointerEvent {
    pub fn press(button: MouseButton, modifiers: Modifiers, x: i32, y: i32) -> Self {
        Self {
            button,
            click: true,
            modifiers,
            x,
            y,
            delta: 0,
        }
    }

    pub fn release(button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            button,
            click: false,
            modifiers: Modifiers::NONE,
            x,
            y,
            delta: 0,
        }
    }

    pub fn motion(x: i32, y: i32) -> Self {
        Self {
            button: MouseButton::Move,
            click: false,
            modifiers: Modifiers::NONE,
            x,
            y,
            delta: 0,
        }
    }

    pub fn wheel(delta: i32, x: i32, y: i32) -> Self {
        Self {
            button: MouseButton::Wheel,
            click: false,
            modifiers: Modifiers::NONE,
            x,
            y,
            delta,
        }
    }
}

/// Validated drawable size in pixels. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportError> {
        if width == 0 || height == 0 {
            return Err(ViewportError { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Re-orthonormalizes the rotation block of `m` (Gram-Schmidt over its
/// rows, which are the camera axes expressed in scene space). The
/// translation column is left as is.
pub fn orthonormalize_rotation(m: Matrix4<f32>) -> Matrix4<f32> {
    let row = |i: usize| Vector3::new(m.x[i], m.y[i], m.z[i]);

    let x = row(0).normalize();
    let y = (row(1) - x * x.dot(row(1))).normalize();
    let z = x.cross(y);

    let mut out = m;
    for (i, axis) in [x, y, z].into_iter().enumerate() {
        out.x[i] = axis.x;
        out.y[i] = axis.y;
        out.z[i] = axis.z;
    }
    out
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix, SquareMatrix};

    #[test]
    fn test_button_codes() {
        assert_eq!(MouseButton::from_code(0x01), MouseButton::Left);
        assert_eq!(MouseButton::from_code(0x04), MouseButton::Right);
        assert_eq!(MouseButton::from_code(0x10), MouseButton::Move);
        assert_eq!(MouseButton::from_code(0x40), MouseButton::Other(0x40));
    }

    #[test]
    fn test_modifier_set() {
        let mods = Modifiers::CONTROL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CONTROL));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn test_viewport_rejects_zero() {
        assert!(Viewport::new(0, 10).is_err());
        assert_eq!(
            Viewport::new(10, 0),
            Err(ViewportError {
                width: 10,
                height: 0
            })
        );
        assert_eq!(Viewport::new(200, 100).map(Viewport::aspect), Ok(2.0));
    }

    #[test]
    fn test_orthonormalize_restores_rotation() {
        let mut m = Matrix4::from_axis_angle(Vector3::new(1.0, 2.0, 3.0).normalize(), Deg(40.0))
            * Matrix4::from_translation(Vector3::new(1.0, -2.0, 0.5));
        // skew the rotation block slightly
        m.x.y += 0.01;
        m.z.x -= 0.02;
        let translation = m.w;

        let fixed = orthonormalize_rotation(m);
        let block = cgmath::Matrix3::new(
            fixed.x.x, fixed.x.y, fixed.x.z, fixed.y.x, fixed.y.y, fixed.y.z, fixed.z.x,
            fixed.z.y, fixed.z.z,
        );
        let should_be_identity = block * block.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((should_be_identity[i][j] - expected).abs() < 1e-5);
            }
        }
        assert!((block.determinant() - 1.0).abs() < 1e-5);
        assert_eq!(fixed.w, translation);
    }

    #[test]
    fn test_orthonormalize_keeps_exact_rotation() {
        let m = Matrix4::from_angle_y(Deg(30.0)) * Matrix4::from_angle_x(Deg(-20.0));
        let fixed = orthonormalize_rotation(m);
        for c in 0..4 {
            for r in 0..4 {
                assert!((fixed[c][r] - m[c][r]).abs() < 1e-5);
            }
        }
        assert!(Matrix4::<f32>::identity() == orthonormalize_rotation(Matrix4::identity()));
    }
}
