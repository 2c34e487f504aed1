//! Floor projection constants.

/// How far above the horizon row a projected sprite may still land before it
/// is clipped (matches where the sky art ends)
pub const HORIZON_CLIP_MARGIN: f32 = 32.0;

/// Default horizon row for levels that don't set one
pub const DEFAULT_HORIZON_PIXEL: f32 = 48.0;

/// Logical render resolution; the window scales this up
pub const VIEWPORT_WIDTH: f32 = 320.0;
pub const VIEWPORT_HEIGHT: f32 = 270.0;

/// Edge length of the generated floor texture when a level has no image
pub const PROCEDURAL_TEXTURE_SIZE: u32 = 512;
/// Checker cell size of the generated floor texture
pub const PROCEDURAL_TILE_SIZE: u32 = 32;
