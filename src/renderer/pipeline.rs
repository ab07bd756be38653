//! WebGPU render pipeline setup

use super::scene::Scene;
use super::vertex::{Vertex, colors};
use super::RenderTarget;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::error::{AppError, RenderError};

/// Maps the fixed playfield into a viewport, preserving aspect ratio.
/// The unused axis is split evenly into bars on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Fraction of NDC width/height the playfield covers
    scale_x: f32,
    scale_y: f32,
}

impl Letterbox {
    pub fn new(width: u32, height: u32) -> Self {
        let viewport_aspect = width.max(1) as f32 / height.max(1) as f32;
        let field_aspect = PLAYFIELD_WIDTH / PLAYFIELD_HEIGHT;

        if viewport_aspect > field_aspect {
            // Wider than the playfield: bars left and right
            Self {
                scale_x: field_aspect / viewport_aspect,
                scale_y: 1.0,
            }
        } else {
            // Taller: bars top and bottom
            Self {
                scale_x: 1.0,
                scale_y: viewport_aspect / field_aspect,
            }
        }
    }

    /// Playfield units (+y down) to normalized device coordinates (+y up)
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let nx = (x / PLAYFIELD_WIDTH) * 2.0 - 1.0;
        let ny = 1.0 - (y / PLAYFIELD_HEIGHT) * 2.0;
        (nx * self.scale_x, ny * self.scale_y)
    }
}

/// Initial vertex capacity; grows by powers of two
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Main render state
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the buffer can hold
    vertex_capacity: usize,
    /// Scratch space reused for NDC conversion
    staging: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    letterbox: Letterbox,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, AppError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neon-vader-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| AppError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(adapter);
        // Prefer sRGB so the palette matches the DOM overlays
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or(AppError::NoSurfaceFormat)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        log::info!("Surface configured: {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            staging: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            size: (width, height),
            letterbox: Letterbox::new(width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.size = (new_width, new_height);
        self.config.width = new_width;
        self.config.height = new_height;
        self.letterbox = Letterbox::new(new_width, new_height);
        self.surface.configure(&self.device, &self.config);
    }

    /// Convert to NDC and copy into the vertex buffer, growing it if needed
    fn upload(&mut self, vertices: &[Vertex]) -> u32 {
        let letterbox = self.letterbox;
        self.staging.clear();
        self.staging.extend(vertices.iter().map(|v| {
            let (x, y) = letterbox.to_ndc(v.position[0], v.position[1]);
            Vertex::new(x, y, v.color)
        }));

        if self.staging.len() > self.vertex_capacity {
            self.vertex_capacity = self.staging.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if !self.staging.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
        self.staging.len() as u32
    }

    /// Upload vertices and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let vertex_count = self.upload(vertices);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
    wgpu::Color { r, g, b, a }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Flat-colored, alpha-blended triangle list
fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Shapes wind both ways, so no culling
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

impl RenderTarget for RenderState {
    fn present(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let result = self.render(&scene.vertices).map_err(RenderError::from);
        if matches!(&result, Err(e) if e.needs_reconfigure()) {
            let (w, h) = self.size;
            self.resize(w, h);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn test_exact_aspect_fills_viewport() {
        let lb = Letterbox::new(850, 1000);
        assert!(close(lb.to_ndc(0.0, 0.0), (-1.0, 1.0)));
        assert!(close(lb.to_ndc(850.0, 1000.0), (1.0, -1.0)));
        assert!(close(lb.to_ndc(425.0, 500.0), (0.0, 0.0)));
    }

    #[test]
    fn test_wide_viewport_pillarboxes() {
        let lb = Letterbox::new(1700, 1000);
        let (left, top) = lb.to_ndc(0.0, 0.0);
        assert!((top - 1.0).abs() < 1e-5);
        assert!((left + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_tall_viewport_letterboxes() {
        let lb = Letterbox::new(850, 2000);
        let (left, top) = lb.to_ndc(0.0, 0.0);
        assert!((left + 1.0).abs() < 1e-5);
        assert!((top - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_size_does_not_divide_by_zero() {
        let lb = Letterbox::new(0, 0);
        let (x, y) = lb.to_ndc(425.0, 500.0);
        assert!(x.is_finite() && y.is_finite());
    }
}
