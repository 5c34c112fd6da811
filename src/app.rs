//! Windowed viewer shell.
//!
//! [`TriliteApp`] owns the winit event loop. It translates native window
//! events into [`PointerEvent`]s and key commands for the [`Renderer`].

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, ModifiersState, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    errors::BackendError,
    gfx::{
        camera::{Modifiers, MouseButton, PointerEvent, Viewport},
        rendering::{Renderer, WgpuBackend},
        scene::{ObjLoader, Scene},
    },
};

pub struct TriliteApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    renderer: Option<Renderer<WgpuBackend>>,
    cursor: (i32, i32),
    modifiers: Modifiers,
    error: Option<BackendError>,
}

impl TriliteApp {
    /// Creates the event loop and assembles the scene from the configured
    /// asset paths.
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let scene = Scene::assemble(&ObjLoader, &config.asset_paths);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                scene: Some(scene),
                renderer: None,
                cursor: (0, 0),
                modifiers: Modifiers::NONE,
                error: None,
            },
        })
    }

    /// Runs until the window is closed or Escape is pressed.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        // drop the renderer before the window it draws into
        self.app_state.renderer = None;
        match self.app_state.error.take() {
            Some(e) => Err(e).context("failed to initialise the graphics backend"),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn viewport_for(&self, size: PhysicalSize<u32>) -> Option<Viewport> {
        Viewport::new(size.width, size.height)
            .or_else(|_| Viewport::new(self.config.width, self.config.height))
            .ok()
    }

    fn pointer(&mut self, event: PointerEvent) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.handle_mouse_event(&event);
        }
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character(text) => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                for c in text.chars() {
                    if !renderer.handle_key_event(c) {
                        log::debug!("ignored key '{}'", c);
                    }
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let Some(viewport) = self.viewport_for(size) else {
            log::error!("configured window size {}x{} is empty", self.config.width, self.config.height);
            event_loop.exit();
            return;
        };

        let backend = match pollster::block_on(WgpuBackend::new(
            window.clone(),
            viewport.width(),
            viewport.height(),
        )) {
            Ok(backend) => backend,
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        };

        let scene = self.scene.take().unwrap_or_default();
        self.renderer = Some(Renderer::new(backend, scene, &self.config, viewport));
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => match Viewport::new(size.width, size.height) {
                Ok(viewport) => {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.set_viewport(viewport);
                    }
                }
                Err(e) => log::debug!("ignoring resize: {}", e),
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = map_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = cursor_position(position);
                self.pointer(PointerEvent::motion(self.cursor.0, self.cursor.1));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(button);
                let (x, y) = self.cursor;
                let event = match state {
                    ElementState::Pressed => PointerEvent::press(button, self.modifiers, x, y),
                    ElementState::Released => PointerEvent::release(button, x, y),
                };
                self.pointer(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = self.cursor;
                self.pointer(PointerEvent::wheel(wheel_steps(delta), x, y));
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(event_loop, &event),
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.render();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

fn map_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as Native;
    match button {
        Native::Left => MouseButton::Left,
        Native::Middle => MouseButton::Middle,
        Native::Right => MouseButton::Right,
        Native::Back => MouseButton::Other(0x20),
        Native::Forward => MouseButton::Other(0x40),
        Native::Other(code) => MouseButton::Other(0x100 + u32::from(code)),
    }
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    if state.control_key() {
        modifiers |= Modifiers::CONTROL;
    }
    if state.shift_key() {
        modifiers |= Modifiers::SHIFT;
    }
    if state.alt_key() {
        modifiers |= Modifiers::ALT;
    }
    modifiers
}

fn wheel_steps(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) if y != 0.0 => y.signum() as i32,
        MouseScrollDelta::PixelDelta(_) => 0,
    }
}

fn cursor_position(position: PhysicalPosition<f64>) -> (i32, i32) {
    (position.x.round() as i32, position.y.round() as i32)
}
