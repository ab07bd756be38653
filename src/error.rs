//! Error types for bootstrap and rendering

use thiserror::Error;

/// Failures while bringing up the page, canvas or GPU
#[derive(Debug, Error)]
pub enum AppError {
    #[error("canvas element `{0}` not found")]
    MissingCanvas(String),

    #[error("browser environment unavailable: {0}")]
    Environment(String),

    #[error("failed to create surface: {0}")]
    Surface(String),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to create device: {0}")]
    Device(String),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Failures while presenting a frame
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    /// The surface must be reconfigured before the next frame
    pub fn needs_reconfigure(&self) -> bool {
        matches!(
            self,
            RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}
