//! # Frame Renderer
//!
//! [`Renderer`] ties the scene, the camera controller and a graphics backend
//! together. It uploads every scene mesh once at construction, issues one
//! draw per entity each frame and gives all backend resources back, in
//! reverse order, when dropped.

use super::{
    backend::{DisplayMode, GraphicsBackend, UniformName, UniformValue},
    frame::{projection, EntityTransforms, LightRig},
};
use crate::{
    config::{ProjectionSettings, ViewerConfig},
    gfx::{
        camera::{CameraController, PointerEvent, Viewport},
        scene::Scene,
    },
};

pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    program: Option<B::Program>,
    mesh_buffers: Vec<B::MeshBuffers>, // indexed by MeshId
    scene: Scene,
    camera: CameraController,
    viewport: Viewport,
    display_mode: DisplayMode,
    projection: ProjectionSettings,
    lights: LightRig,
    clear_color: [f32; 4],
}

impl<B: GraphicsBackend> Renderer<B> {
    /// Compiles the program and uploads every mesh of `scene`, in scene
    /// order.
    pub fn new(mut backend: B, scene: Scene, config: &ViewerConfig, viewport: Viewport) -> Self {
        let program = backend.compile_program();
        let mesh_buffers: Vec<_> = scene.meshes().map(|(_, mesh)| backend.upload_mesh(mesh)).collect();
        backend.set_viewport(viewport);
        backend.set_display_mode(DisplayMode::Filled);

        log::info!(
            "renderer ready: {} entities, {} meshes uploaded",
            scene.entities().len(),
            mesh_buffers.len()
        );

        Self {
            backend,
            program: Some(program),
            mesh_buffers,
            scene,
            camera: CameraController::new(config.camera),
            viewport,
            display_mode: DisplayMode::Filled,
            projection: config.projection,
            lights: LightRig::default(),
            clear_color: config.clear_color,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.backend.set_viewport(viewport);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draws one frame.
    pub fn render(&mut self) {
        let Some(program) = self.program.as_ref() else {
            return;
        };
        if !self.backend.begin_frame(program, self.clear_color) {
            return;
        }

        let view = self.camera.view();
        let proj = projection(&self.projection, self.viewport);
        let lights = self.lights.resolve(view);

        let backend = &mut self.backend;
        backend.set_uniform(UniformName::Projection, proj.into());
        let light_uniforms = [
            (UniformName::KeyLightPosition, UniformName::KeyLightColor),
            (UniformName::FillLightPosition, UniformName::FillLightColor),
            (UniformName::BackLightPosition, UniformName::BackLightColor),
        ];
        for (i, (position, color)) in light_uniforms.into_iter().enumerate() {
            backend.set_uniform(position, lights.positions[i].into());
            backend.set_uniform(color, lights.colors[i].into());
        }

        for entity in self.scene.entities() {
            let transforms = EntityTransforms::new(view, entity.transform(), proj);
            let material = self.scene.material(entity.material());

            backend.set_uniform(UniformName::ModelView, transforms.model_view.into());
            backend.set_uniform(UniformName::Normal, transforms.normal.into());
            backend.set_uniform(UniformName::Mvp, transforms.mvp.into());
            backend.set_uniform(UniformName::MaterialKd, material.diffuse().into());
            backend.set_uniform(UniformName::MaterialKs, material.specular().into());
            backend.set_uniform(UniformName::MaterialNs, UniformValue::Float(material.shininess()));
            backend.draw(&self.mesh_buffers[entity.mesh().index()]);
        }

        backend.end_frame();
    }

    /// Forwards a pointer event to the camera controller.
    pub fn handle_mouse_event(&mut self, event: &PointerEvent) -> bool {
        self.camera.process_pointer(event, self.viewport)
    }

    /// `'w'` switches to wireframe and `'f'` back to filled. Returns whether
    /// the key was recognized.
    pub fn handle_key_event(&mut self, key: char) -> bool {
        let mode = match key {
            'w' => DisplayMode::Wireframe,
            'f' => DisplayMode::Filled,
            _ => return false,
        };
        if mode != self.display_mode {
            log::info!("display mode: {:?}", mode);
        }
        self.display_mode = mode;
        self.backend.set_display_mode(mode);
        true
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: GraphicsBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        while let Some(mesh) = self.mesh_buffers.pop() {
            self.backend.release_mesh(mesh);
        }
        if let Some(program) = self.program.take() {
            self.backend.release_program(program);
        }
        std::mem::take(&mut self.scene).teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{Modifiers, MouseButton},
        geometry::{Mesh, Surface},
        scene::{AssetLoader, Scene},
    };
    use crate::errors::AssetError;
    use std::{cell::RefCell, path::Path, rc::Rc};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Compile,
        Upload(usize),
        Viewport(u32, u32),
        Mode(DisplayMode),
        Begin,
        Uniform(UniformName),
        Draw(usize),
        End,
        ReleaseMesh(usize),
        ReleaseProgram,
    }

    #[derive(Default, Clone)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        uploads: usize,
        frame_available: bool,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                frame_available: true,
                ..Default::default()
            }
        }

        fn push(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.borrow().iter().filter(|c| pred(c)).count()
        }
    }

    impl GraphicsBackend for Recorder {
        type Program = ();
        type MeshBuffers = usize;

        fn compile_program(&mut self) -> Self::Program {
            self.push(Call::Compile);
        }

        fn upload_mesh(&mut self, _mesh: &Mesh) -> usize {
            let id = self.uploads;
            self.uploads += 1;
            self.push(Call::Upload(id));
            id
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.push(Call::Viewport(viewport.width(), viewport.height()));
        }

        fn set_display_mode(&mut self, mode: DisplayMode) {
            self.push(Call::Mode(mode));
        }

        fn begin_frame(&mut self, _program: &(), _clear: [f32; 4]) -> bool {
            self.push(Call::Begin);
            self.frame_available
        }

        fn set_uniform(&mut self, name: UniformName, _value: UniformValue) {
            self.push(Call::Uniform(name));
        }

        fn draw(&mut self, mesh: &usize) {
            self.push(Call::Draw(*mesh));
        }

        fn end_frame(&mut self) {
            self.push(Call::End);
        }

        fn release_mesh(&mut self, mesh: usize) {
            self.push(Call::ReleaseMesh(mesh));
        }

        fn release_program(&mut self, _program: ()) {
            self.push(Call::ReleaseProgram);
        }
    }

    struct Quads(usize);

    impl AssetLoader for Quads {
        fn load(&self, _path: &Path) -> Result<Vec<Mesh>, AssetError> {
            Ok((0..self.0).map(|_| Surface::Plane.tessellate(1, 1)).collect())
        }
    }

    fn renderer(loaded: usize) -> (Renderer<Recorder>, Recorder) {
        let recorder = Recorder::new();
        let scene = Scene::assemble(&Quads(loaded), &["quads.obj"]);
        let viewport = Viewport::new(640, 480).unwrap();
        let renderer = Renderer::new(recorder.clone(), scene, &ViewerConfig::default(), viewport);
        (renderer, recorder)
    }

    #[test]
    fn test_setup_uploads_every_mesh_once() {
        let (renderer, recorder) = renderer(2);
        assert_eq!(recorder.count(|c| matches!(c, Call::Upload(_))), 6);
        assert_eq!(recorder.calls.borrow()[0], Call::Compile);
        assert!(recorder.calls.borrow().contains(&Call::Viewport(640, 480)));
        drop(renderer);
    }

    #[test]
    fn test_one_draw_per_entity() {
        let (mut renderer, recorder) = renderer(3);
        recorder.calls.borrow_mut().clear();

        renderer.render();
        assert_eq!(recorder.count(|c| matches!(c, Call::Draw(_))), 3 + 8);
        assert_eq!(recorder.count(|c| *c == Call::Begin), 1);
        assert_eq!(recorder.calls.borrow().last(), Some(&Call::End));

        // loaded meshes are drawn first, with their own buffers
        let draws: Vec<_> = recorder
            .calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Draw(id) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(&draws[..3], &[0, 1, 2]);
    }

    #[test]
    fn test_every_uniform_is_set_each_frame() {
        let (mut renderer, recorder) = renderer(1);
        recorder.calls.borrow_mut().clear();
        renderer.render();

        for name in UniformName::ALL {
            assert!(
                recorder.count(|c| *c == Call::Uniform(name)) > 0,
                "{name} was never set"
            );
        }
        // per-entity uniforms precede each draw
        let entities = renderer.scene().entities().len();
        assert_eq!(recorder.count(|c| *c == Call::Uniform(UniformName::Mvp)), entities);
        assert_eq!(recorder.count(|c| *c == Call::Uniform(UniformName::Projection)), 1);
    }

    #[test]
    fn test_unavailable_frame_is_skipped() {
        let (mut renderer, recorder) = renderer(1);
        renderer.backend.frame_available = false;
        recorder.calls.borrow_mut().clear();

        renderer.render();
        assert_eq!(*recorder.calls.borrow(), vec![Call::Begin]);
    }

    #[test]
    fn test_key_commands() {
        let (mut renderer, recorder) = renderer(0);
        recorder.calls.borrow_mut().clear();

        assert!(renderer.handle_key_event('w'));
        assert_eq!(renderer.display_mode(), DisplayMode::Wireframe);
        assert!(renderer.handle_key_event('w'));
        assert_eq!(renderer.display_mode(), DisplayMode::Wireframe);

        assert!(!renderer.handle_key_event('x'));
        assert_eq!(renderer.display_mode(), DisplayMode::Wireframe);

        assert!(renderer.handle_key_event('f'));
        assert!(renderer.handle_key_event('f'));
        assert_eq!(renderer.display_mode(), DisplayMode::Filled);
        assert_eq!(
            *recorder.calls.borrow(),
            vec![
                Call::Mode(DisplayMode::Wireframe),
                Call::Mode(DisplayMode::Wireframe),
                Call::Mode(DisplayMode::Filled),
                Call::Mode(DisplayMode::Filled),
            ]
        );
    }

    #[test]
    fn test_mouse_events_reach_the_camera() {
        let (mut renderer, _recorder) = renderer(0);
        let before = renderer.camera().view();

        assert!(renderer.handle_mouse_event(&PointerEvent::press(
            MouseButton::Left,
            Modifiers::NONE,
            100,
            100
        )));
        assert!(renderer.handle_mouse_event(&PointerEvent::motion(164, 100)));
        assert_ne!(renderer.camera().view(), before);
    }

    #[test]
    fn test_viewport_change_is_forwarded() {
        let (mut renderer, recorder) = renderer(0);
        renderer.set_viewport(Viewport::new(320, 200).unwrap());
        assert_eq!(renderer.viewport().aspect(), 1.6);
        assert_eq!(recorder.calls.borrow().last(), Some(&Call::Viewport(320, 200)));
    }

    #[test]
    fn test_drop_releases_in_reverse_order() {
        let (renderer, recorder) = renderer(2);
        recorder.calls.borrow_mut().clear();
        drop(renderer);

        let expected: Vec<_> = (0..6)
            .rev()
            .map(Call::ReleaseMesh)
            .chain(std::iter::once(Call::ReleaseProgram))
            .collect();
        assert_eq!(*recorder.calls.borrow(), expected);
    }
}
