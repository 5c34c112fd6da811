use cgmath::{Deg, Matrix, Matrix4, Point3, Vector3};

use super::camera_utils::{orthonormalize_rotation, Modifiers, MouseButton, PointerEvent, Viewport};
use crate::{
    config::CameraSettings,
    gfx::scene::entity::{rotate, translate},
};

/// Pointer interaction state of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        button: MouseButton,
        modifiers: Modifiers,
        last_x: i32,
        last_y: i32,
    },
}

/// Owns the view matrix and updates it from pointer drags.
///
/// The view is a single accumulated matrix: drags compose rotations and
/// translations directly onto it. Left drag orbits, right drag pans and
/// middle drag dollies.
#[derive(Debug, Clone)]
pub struct CameraController {
    view: Matrix4<f32>,
    state: DragState,
    settings: CameraSettings,
}

impl CameraController {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            view: Self::look_at(settings.eye, settings.center, settings.up),
            state: DragState::Idle,
            settings,
        }
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    pub fn look_at(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, center, up)
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Feeds one pointer event through the drag state machine.
    ///
    /// Always returns `true`: every pointer event counts as handled, even
    /// when it has no effect.
    pub fn process_pointer(&mut self, event: &PointerEvent, viewport: Viewport) -> bool {
        if event.click {
            self.state = DragState::Dragging {
                button: event.button,
                modifiers: event.modifiers,
                last_x: event.x,
                last_y: event.y,
            };
            return true;
        }

        match event.button {
            MouseButton::Move => {
                if let DragState::Dragging {
                    button,
                    last_x,
                    last_y,
                    ..
                } = self.state
                {
                    let dx = (event.x - last_x) as f32 / viewport.width() as f32;
                    let dy = (event.y - last_y) as f32 / viewport.height() as f32;
                    match button {
                        MouseButton::Left => self.orbit(dx, dy),
                        MouseButton::Right => self.pan(dx, dy),
                        MouseButton::Middle => self.dolly(dy),
                        _ => {}
                    }
                    if let DragState::Dragging { last_x, last_y, .. } = &mut self.state {
                        *last_x = event.x;
                        *last_y = event.y;
                    }
                }
            }
            // reserved for zoom
            MouseButton::Wheel => {}
            _ => self.state = DragState::Idle,
        }
        true
    }

    /// Rotates about the camera's own X axis by `dy` of a full turn, then
    /// about its Y axis by `dx`. Both axes are taken from the view before
    /// either rotation.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let x_axis = self.view.row(0).truncate();
        let y_axis = self.view.row(1).truncate();
        let degrees = self.settings.orbit_degrees;

        let view = rotate(self.view, Deg(dy * degrees), x_axis);
        let view = rotate(view, Deg(dx * degrees), y_axis);
        self.view = orthonormalize_rotation(view);
    }

    /// Translates within the camera's image plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let x_axis = self.view.row(0).truncate();
        let y_axis = self.view.row(1).truncate();
        let offset = (x_axis * dx + y_axis * dy) * self.settings.sensitivity;
        self.view = translate(self.view, offset);
    }

    /// Translates along the camera's viewing axis.
    pub fn dolly(&mut self, dy: f32) {
        let z_axis = self.view.row(2).truncate();
        self.view = translate(self.view, z_axis * dy * self.settings.sensitivity);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Transform};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn viewport() -> Viewport {
        Viewport::new(800, 600).unwrap()
    }

    fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>, eps: f32) {
        for c in 0..4 {
            for r in 0..4 {
                assert!(
                    (a[c][r] - b[c][r]).abs() < eps,
                    "matrices differ at [{c}][{r}]: {a:?} vs {b:?}"
                );
            }
        }
    }

    fn drag(
        controller: &mut CameraController,
        button: MouseButton,
        from: (i32, i32),
        to: (i32, i32),
    ) {
        let vp = viewport();
        controller.process_pointer(&PointerEvent::press(button, Modifiers::NONE, from.0, from.1), vp);
        controller.process_pointer(&PointerEvent::motion(to.0, to.1), vp);
        controller.process_pointer(&PointerEvent::release(button, to.0, to.1), vp);
    }

    #[test]
    fn test_initial_view_looks_at_origin() {
        let controller = CameraController::default();
        let eye = Point3::new(1.0, 0.25, 1.0);
        let eye_in_view = controller.view().transform_point(eye);
        assert!(eye_in_view.x.abs() < 1e-6 && eye_in_view.y.abs() < 1e-6 && eye_in_view.z.abs() < 1e-6);

        // the origin is straight ahead, down -Z
        let origin = controller.view().transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!(origin.x.abs() < 1e-6 && origin.y.abs() < 1e-6);
        assert!(origin.z < 0.0);
    }

    #[test]
    fn test_zero_orbit_keeps_view() {
        let mut controller = CameraController::default();
        let before = controller.view();
        controller.orbit(0.0, 0.0);
        assert_matrix_eq(controller.view(), before, 1e-6);
    }

    #[test]
    fn test_orbit_and_inverse_restore_view() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let mut controller = CameraController::default();
            let before = controller.view();
            let d: f32 = rng.random_range(-0.5..0.5);

            controller.orbit(0.0, d);
            controller.orbit(0.0, -d);
            assert_matrix_eq(controller.view(), before, 1e-4);

            controller.orbit(d, 0.0);
            controller.orbit(-d, 0.0);
            assert_matrix_eq(controller.view(), before, 1e-4);
        }
    }

    #[test]
    fn test_orbit_uses_axes_from_before_rotation() {
        let mut controller = CameraController::default();
        let v0 = controller.view();
        let x0 = v0.row(0).truncate();
        let y0 = v0.row(1).truncate();
        let (dx, dy) = (0.1, 0.07);

        controller.orbit(dx, dy);

        let expected = orthonormalize_rotation(rotate(
            rotate(v0, Deg(dy * 360.0), x0),
            Deg(dx * 360.0),
            y0,
        ));
        assert_matrix_eq(controller.view(), expected, 1e-5);
    }

    #[test]
    fn test_orbit_keeps_rotation_orthonormal() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut controller = CameraController::default();
        for _ in 0..1000 {
            controller.orbit(rng.random_range(-0.1..0.1), rng.random_range(-0.1..0.1));
        }
        let view = controller.view();
        for i in 0..3 {
            let row = view.row(i).truncate();
            assert!((row.magnitude() - 1.0).abs() < 1e-4);
        }
        assert!(view.row(0).truncate().dot(view.row(1).truncate()).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_keeps_distance_to_pivot() {
        let mut controller = CameraController::default();
        let dist = |c: &CameraController| {
            c.view()
                .transform_point(Point3::new(0.0, 0.0, 0.0))
                .to_homogeneous()
                .truncate()
                .magnitude()
        };
        let before = dist(&controller);
        drag(&mut controller, MouseButton::Left, (100, 100), (180, 60));
        assert!((dist(&controller) - before).abs() < 1e-4);
    }

    #[test]
    fn test_pan_and_dolly_move_in_view_space() {
        let mut controller = CameraController::default();
        let origin_before = controller.view().transform_point(Point3::new(0.0, 0.0, 0.0));

        // full-width right drag moves by the sensitivity along the view X axis
        drag(&mut controller, MouseButton::Right, (0, 0), (800, 0));
        let origin = controller.view().transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((origin.x - origin_before.x - 10.0).abs() < 1e-4);
        assert!((origin.y - origin_before.y).abs() < 1e-4);
        assert!((origin.z - origin_before.z).abs() < 1e-4);

        let mut controller = CameraController::default();
        drag(&mut controller, MouseButton::Middle, (0, 0), (0, 60));
        let origin = controller.view().transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((origin.z - origin_before.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_press_move_release_state() {
        let vp = viewport();
        let mut controller = CameraController::default();
        let press = PointerEvent::press(MouseButton::Left, Modifiers::SHIFT, 10, 20);

        assert!(controller.process_pointer(&press, vp));
        assert_eq!(
            controller.state(),
            DragState::Dragging {
                button: MouseButton::Left,
                modifiers: Modifiers::SHIFT,
                last_x: 10,
                last_y: 20
            }
        );

        assert!(controller.process_pointer(&PointerEvent::motion(15, 25), vp));
        assert!(matches!(
            controller.state(),
            DragState::Dragging {
                last_x: 15,
                last_y: 25,
                ..
            }
        ));

        assert!(controller.process_pointer(&PointerEvent::release(MouseButton::Left, 15, 25), vp));
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_motion_while_idle_is_ignored() {
        let mut controller = CameraController::default();
        let before = controller.view();
        assert!(controller.process_pointer(&PointerEvent::motion(300, 300), viewport()));
        assert_eq!(controller.view(), before);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_wheel_is_handled_without_effect() {
        let vp = viewport();
        let mut controller = CameraController::default();
        controller.process_pointer(&PointerEvent::press(MouseButton::Right, Modifiers::NONE, 1, 1), vp);
        let (view, state) = (controller.view(), controller.state());

        assert!(controller.process_pointer(&PointerEvent::wheel(3, 40, 40), vp));
        assert_eq!(controller.view(), view);
        assert_eq!(controller.state(), state);
    }

    #[test]
    fn test_unknown_button_drag_has_no_effect() {
        let mut controller = CameraController::default();
        let before = controller.view();
        drag(&mut controller, MouseButton::from_code(0x20), (0, 0), (400, 300));
        assert_eq!(controller.view(), before);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_controllers_are_independent() {
        let vp = viewport();
        let mut a = CameraController::default();
        let b = CameraController::default();
        a.process_pointer(&PointerEvent::press(MouseButton::Left, Modifiers::NONE, 0, 0), vp);
        a.process_pointer(&PointerEvent::motion(50, 0), vp);

        assert_ne!(a.view(), b.view());
        assert_eq!(b.state(), DragState::Idle);
    }
}
