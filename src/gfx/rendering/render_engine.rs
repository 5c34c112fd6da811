//! wgpu implementation of [`GraphicsBackend`]
//!
//! Owns the surface, device and depth buffer. Uniforms set between draws are
//! snapshotted per draw into a dynamic-offset uniform buffer, and the whole
//! frame is encoded into a single render pass at `end_frame`.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use super::{
    backend::{DisplayMode, GraphicsBackend, UniformName, UniformValue},
    pipeline_manager::{PipelineConfig, PipelineManager},
};
use crate::{
    errors::BackendError,
    gfx::{
        camera::{
            camera_utils::{convert_matrix4_to_array, OPENGL_TO_WGPU_MATRIX},
            Viewport,
        },
        geometry::Mesh,
        resources::texture_resource::TextureResource,
    },
    wgpu_utils::{dynamic_uniform, DynamicUniformBuffer},
};

const SHADER_NAME: &str = "three_point";
const FILLED_PIPELINE: &str = "three_point.filled";
const WIREFRAME_PIPELINE: &str = "three_point.wireframe";

/// Uniform block of `three_point.wgsl`, one per draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    pub material_kd: [f32; 4],
    /// xyz = Ks, w = Ns
    pub material_ks: [f32; 4],
    pub light_positions: [[f32; 4]; 3],
    pub light_colors: [[f32; 4]; 3],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        let identity = convert_matrix4_to_array(Matrix4::identity());
        Self {
            model_view: identity,
            projection: identity,
            normal: identity,
            mvp: identity,
            material_kd: [0.0; 4],
            material_ks: [0.0; 4],
            light_positions: [[0.0; 4]; 3],
            light_colors: [[0.0; 4]; 3],
        }
    }
}

impl DrawUniforms {
    /// Stores one named value. Clip-space matrices are converted from the
    /// OpenGL depth range to wgpu's.
    pub fn set(&mut self, name: UniformName, value: UniformValue) {
        use UniformName::*;
        use UniformValue::*;

        match (name, value) {
            (ModelView, Mat4(m)) => self.model_view = convert_matrix4_to_array(m),
            (Projection, Mat4(m)) => {
                self.projection = convert_matrix4_to_array(OPENGL_TO_WGPU_MATRIX * m)
            }
            (Normal, Mat4(m)) => self.normal = convert_matrix4_to_array(m),
            (Mvp, Mat4(m)) => self.mvp = convert_matrix4_to_array(OPENGL_TO_WGPU_MATRIX * m),
            (MaterialKd, Vec3(v)) => self.material_kd = v.extend(0.0).into(),
            (MaterialKs, Vec3(v)) => {
                self.material_ks = v.extend(self.material_ks[3]).into();
            }
            (MaterialNs, Float(ns)) => self.material_ks[3] = ns,
            (KeyLightPosition, Vec3(v)) => self.light_positions[0] = v.extend(1.0).into(),
            (FillLightPosition, Vec3(v)) => self.light_positions[1] = v.extend(1.0).into(),
            (BackLightPosition, Vec3(v)) => self.light_positions[2] = v.extend(1.0).into(),
            (KeyLightColor, Vec3(v)) => self.light_colors[0] = v.extend(0.0).into(),
            (FillLightColor, Vec3(v)) => self.light_colors[1] = v.extend(0.0).into(),
            (BackLightColor, Vec3(v)) => self.light_colors[2] = v.extend(0.0).into(),
            (name, value) => log::warn!("uniform '{}' cannot hold {:?}", name, value),
        }
    }
}

/// Names of the pipelines making up the lighting program.
#[derive(Debug, Clone)]
pub struct WgpuProgram {
    shader: String,
    filled: String,
    wireframe: Option<String>,
}

/// Device buffers of one uploaded mesh.
#[derive(Debug, Clone)]
pub struct WgpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    program: WgpuProgram,
    clear: wgpu::Color,
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    uniform_layout: wgpu::BindGroupLayout,
    uniforms: DynamicUniformBuffer<DrawUniforms>,
    uniform_bind_group: wgpu::BindGroup,
    supports_wireframe: bool,
    display_mode: DisplayMode,
    pending: DrawUniforms,
    draws: Vec<(DrawUniforms, WgpuMesh)>,
    frame: Option<Frame>,
    reported_missing_pipeline: bool,
}

impl WgpuBackend {
    /// Creates a backend rendering into `window`.
    ///
    /// Wireframe display needs `POLYGON_MODE_LINE`; it is requested when the
    /// adapter offers it, and wireframe falls back to filled otherwise.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<WgpuBackend, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let supports_wireframe = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if supports_wireframe {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features,
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(BackendError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: dynamic_uniform(std::mem::size_of::<DrawUniforms>() as u64),
                count: None,
            }],
        });
        let uniforms = DynamicUniformBuffer::new(&device, 64);
        let uniform_bind_group = create_uniform_bind_group(&device, &uniform_layout, &uniforms);

        Ok(Self {
            surface,
            pipeline_manager: PipelineManager::new(device.clone()),
            device,
            queue,
            config,
            depth_texture,
            uniform_layout,
            uniforms,
            uniform_bind_group,
            supports_wireframe,
            display_mode: DisplayMode::Filled,
            pending: DrawUniforms::default(),
            draws: Vec::new(),
            frame: None,
            reported_missing_pipeline: false,
        })
    }

    fn pipeline_config(&self, label: &str) -> PipelineConfig {
        PipelineConfig::default_with_shader(SHADER_NAME)
            .with_label(label)
            .with_bind_group_layouts(vec![self.uniform_layout.clone()])
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_color_format(self.config.format)
    }
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &DynamicUniformBuffer<DrawUniforms>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Uniforms"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.binding_resource(),
        }],
    })
}

impl GraphicsBackend for WgpuBackend {
    type Program = WgpuProgram;
    type MeshBuffers = WgpuMesh;

    fn compile_program(&mut self) -> WgpuProgram {
        if let Err(e) = self
            .pipeline_manager
            .load_shader(SHADER_NAME, include_str!("three_point.wgsl"))
        {
            log::error!("{}", e);
        }

        let filled_config = self.pipeline_config("Filled Pipeline");
        if let Err(e) = self
            .pipeline_manager
            .create_pipeline(FILLED_PIPELINE, filled_config)
        {
            log::error!("{}", e);
        }

        let wireframe = if self.supports_wireframe {
            let config = self
                .pipeline_config("Wireframe Pipeline")
                .with_polygon_mode(wgpu::PolygonMode::Line);
            match self.pipeline_manager.create_pipeline(WIREFRAME_PIPELINE, config) {
                Ok(()) => Some(WIREFRAME_PIPELINE.to_string()),
                Err(e) => {
                    log::error!("{}", e);
                    None
                }
            }
        } else {
            log::warn!("adapter lacks POLYGON_MODE_LINE; wireframe mode will draw filled");
            None
        };

        WgpuProgram {
            shader: SHADER_NAME.to_string(),
            filled: FILLED_PIPELINE.to_string(),
            wireframe,
        }
    }

    fn upload_mesh(&mut self, mesh: &Mesh) -> WgpuMesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.triangles),
                usage: wgpu::BufferUsages::INDEX,
            });

        WgpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.config.width = viewport.width();
        self.config.height = viewport.height();
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    fn begin_frame(&mut self, program: &WgpuProgram, clear: [f32; 4]) -> bool {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return false;
            }
            Err(e) => {
                log::error!("failed to acquire surface texture: {}", e);
                return false;
            }
        };

        self.pending = DrawUniforms::default();
        self.draws.clear();
        self.frame = Some(Frame {
            surface_texture,
            program: program.clone(),
            clear: wgpu::Color {
                r: f64::from(clear[0]),
                g: f64::from(clear[1]),
                b: f64::from(clear[2]),
                a: f64::from(clear[3]),
            },
        });
        true
    }

    fn set_uniform(&mut self, name: UniformName, value: UniformValue) {
        self.pending.set(name, value);
    }

    fn draw(&mut self, mesh: &WgpuMesh) {
        self.draws.push((self.pending, mesh.clone()));
    }

    fn end_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };

        if self.uniforms.reserve(&self.device, self.draws.len()) {
            self.uniform_bind_group =
                create_uniform_bind_group(&self.device, &self.uniform_layout, &self.uniforms);
        }
        let contents: Vec<DrawUniforms> = self.draws.iter().map(|(u, _)| *u).collect();
        self.uniforms.write(&self.queue, &contents);

        let surface_view = frame
            .surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipeline_name = match self.display_mode {
                DisplayMode::Wireframe => frame
                    .program
                    .wireframe
                    .as_deref()
                    .unwrap_or(&frame.program.filled),
                DisplayMode::Filled => &frame.program.filled,
            };

            match self.pipeline_manager.get_pipeline(pipeline_name) {
                Some(pipeline) => {
                    render_pass.set_pipeline(pipeline);
                    for (i, (_, mesh)) in self.draws.iter().enumerate() {
                        render_pass.set_bind_group(
                            0,
                            &self.uniform_bind_group,
                            &[self.uniforms.offset(i)],
                        );
                        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                        render_pass
                            .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                }
                None if !self.reported_missing_pipeline => {
                    log::error!("pipeline '{}' is unavailable; drawing nothing", pipeline_name);
                    self.reported_missing_pipeline = true;
                }
                None => {}
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.surface_texture.present();
        self.draws.clear();
    }

    fn release_mesh(&mut self, mesh: WgpuMesh) {
        mesh.vertex_buffer.destroy();
        mesh.index_buffer.destroy();
    }

    fn release_program(&mut self, program: WgpuProgram) {
        self.pipeline_manager.remove_pipeline(&program.filled);
        if let Some(wireframe) = &program.wireframe {
            self.pipeline_manager.remove_pipeline(wireframe);
        }
        self.pipeline_manager.remove_shader(&program.shader);
        log::debug!("released program '{}'", program.shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector3};

    #[test]
    fn test_uniform_block_layout() {
        // matches the WGSL struct: four mat4x4 and eight vec4
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 4 * 64 + 8 * 16);
    }

    #[test]
    fn test_clip_matrices_are_depth_corrected() {
        let proj = cgmath::perspective(Deg(90.0), 1.0, 0.1, 100.0);
        let mut uniforms = DrawUniforms::default();
        uniforms.set(UniformName::Mvp, proj.into());
        uniforms.set(UniformName::ModelView, proj.into());

        assert_eq!(uniforms.mvp, convert_matrix4_to_array(OPENGL_TO_WGPU_MATRIX * proj));
        assert_eq!(uniforms.model_view, convert_matrix4_to_array(proj));

        // near plane maps to depth 0, far plane to depth 1
        let mvp = OPENGL_TO_WGPU_MATRIX * proj;
        let near = mvp * cgmath::Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = mvp * cgmath::Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_material_and_lights_packing() {
        let mut uniforms = DrawUniforms::default();
        uniforms.set(UniformName::MaterialNs, UniformValue::Float(25.0));
        uniforms.set(UniformName::MaterialKs, Vector3::new(1.0, 1.0, 1.0).into());
        uniforms.set(UniformName::MaterialKd, Vector3::new(0.8, 0.8, 0.8).into());
        uniforms.set(UniformName::FillLightPosition, Vector3::new(1.0, 2.0, 3.0).into());
        uniforms.set(UniformName::BackLightColor, Vector3::new(0.2, 0.2, 0.8).into());

        assert_eq!(uniforms.material_ks, [1.0, 1.0, 1.0, 25.0]);
        assert_eq!(uniforms.material_kd, [0.8, 0.8, 0.8, 0.0]);
        assert_eq!(uniforms.light_positions[1], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.light_colors[2], [0.2, 0.2, 0.8, 0.0]);
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let mut uniforms = DrawUniforms::default();
        uniforms.set(UniformName::Mvp, UniformValue::Float(1.0));
        assert_eq!(uniforms, DrawUniforms::default());
    }
}
