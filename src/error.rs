//! Error types for setup paths (config, textures, GPU resources).
//!
//! The projection core never returns these: anything it cannot project is
//! simply culled for the frame.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Mode7Error {
    /// Horizon row must sit inside the viewport
    #[error("horizon row {horizon} must be below viewport height {viewport_height}")]
    HorizonOutsideViewport { horizon: f32, viewport_height: f32 },

    /// A camera field was NaN or infinite
    #[error("camera field `{0}` is not finite")]
    NonFiniteCamera(&'static str),

    /// Viewport smaller than one pixel
    #[error("viewport {width}x{height} must be at least 1x1")]
    ViewportTooSmall { width: f32, height: f32 },

    /// Level file failed validation
    #[error("invalid level config: {0}")]
    InvalidLevel(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),

    /// Floor texture load or snapshot save failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Shader compilation or program link failed
    #[error("shader compilation failed: {0}")]
    Shader(String),

    /// Any other GL object creation failure
    #[error("GPU resource error: {0}")]
    Gpu(String),
}

pub type Result<T> = std::result::Result<T, Mode7Error>;
