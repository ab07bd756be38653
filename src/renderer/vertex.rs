//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for UI elements that are not owned by an entity
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.008, 0.008, 0.02, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const COCKPIT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const INVADER_EYES: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const SHIELD_RING: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const HUD_TRACK: [f32; 4] = [1.0, 1.0, 1.0, 0.05];
    pub const HUD_TRACK_EDGE: [f32; 4] = [1.0, 1.0, 1.0, 0.15];
    pub const HUD_SHIELD_TRACK: [f32; 4] = [1.0, 1.0, 0.0, 0.1];
    pub const HUD_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Return `color` with its alpha multiplied by `alpha`
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
