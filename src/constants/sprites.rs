//! Billboard sprite constants.

/// Number of billboards scattered by the demo level
pub const SPRITE_SCATTER_COUNT: usize = 48;
/// Radius around the start position to scatter within
pub const SPRITE_SCATTER_RADIUS: f32 = 200.0;
/// Base sprite size in pixels at distance scale 1.0
pub const SHIP_SPRITE_SIZE: f32 = 48.0;
pub const ENEMY_SPRITE_SIZE: f32 = 40.0;
pub const PARTICLE_SPRITE_SIZE: f32 = 12.0;
/// Elevation range for flying billboards
pub const MAX_SPRITE_ELEVATION: f32 = 60.0;
/// Drift speed for moving billboards (floor units per second)
pub const MAX_DRIFT_SPEED: f32 = 30.0;
/// Quads narrower than this (pixels) are not worth drawing
pub const MIN_SPRITE_EXTENT: f32 = 0.25;
