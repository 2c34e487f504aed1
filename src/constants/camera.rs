//! Camera and player-pose constants.

/// Default camera elevation above the floor plane
pub const CAMERA_DEFAULT_HEIGHT: f32 = 15.0;
/// Lowest the camera may sink
pub const CAMERA_MIN_HEIGHT: f32 = 4.0;
/// Highest the camera may climb
pub const CAMERA_MAX_HEIGHT: f32 = 64.0;
/// Default field of view (half-angle, degrees)
pub const CAMERA_DEFAULT_FOV: f32 = 45.0;
/// Default yaw (degrees)
pub const CAMERA_DEFAULT_FACING: f32 = 90.0;
/// Turn rate (degrees per second)
pub const CAMERA_TURN_SPEED: f32 = 120.0;
/// Forward/backward speed (floor units per second)
pub const CAMERA_MOVE_SPEED: f32 = 80.0;
/// Climb/descend speed (height units per second)
pub const CAMERA_CLIMB_SPEED: f32 = 20.0;
