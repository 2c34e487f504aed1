//! UI and window constants.

/// Default window width (3x the logical viewport)
pub const WINDOW_DEFAULT_WIDTH: u32 = 960;
/// Default window height
pub const WINDOW_DEFAULT_HEIGHT: u32 = 810;

/// Maximum delta time per frame (prevents teleporting after a stall)
pub const MAX_FRAME_DT: f32 = 0.05;
