//! Rendering module
//!
//! The scene builder turns session state into coloured triangles on the CPU;
//! the wgpu pipeline only uploads and draws them.

pub mod anim;
pub mod glyphs;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{Letterbox, RenderState};
pub use scene::{Scene, SceneOptions, build_scene, build_scene_with};
pub use vertex::Vertex;

use crate::error::RenderError;

/// Something a finished scene can be presented to
pub trait RenderTarget {
    fn present(&mut self, scene: &Scene) -> Result<(), RenderError>;
}

/// Discards scenes, keeping counters. Used headless.
#[derive(Debug, Default)]
pub struct NullTarget {
    pub frames_presented: u64,
    pub last_triangle_count: usize,
}

impl RenderTarget for NullTarget {
    fn present(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.frames_presented += 1;
        self.last_triangle_count = scene.triangle_count();
        Ok(())
    }
}
