//! Camera state shared by the floor rasterizer and the sprite placer.
//!
//! `CameraState` is rebuilt from the player's pose at the start of every
//! frame and then treated as read-only until the frame is drawn. Both
//! projection directions read the same record, which is what keeps sprites
//! glued to the floor.

use crate::constants::*;
use crate::error::{Mode7Error, Result};
use crate::level::LevelConfig;
use glam::Vec2;

/// Per-frame camera parameters (all in floor units / screen pixels / degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub origin: Vec2,
    pub height: f32,
    pub facing_degrees: f32,
    /// Half-angle field of view. Also folded into the rotation basis.
    pub fov_degrees: f32,
    /// First screen row that shows floor; everything above is sky.
    pub horizon_pixel: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

/// Sine/cosine of `facing - fov`, the rotation used by both mappings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationBasis {
    pub sin: f32,
    pub cos: f32,
}

impl CameraState {
    pub fn new(
        origin: Vec2,
        height: f32,
        facing_degrees: f32,
        fov_degrees: f32,
        horizon_pixel: f32,
        viewport: Vec2,
    ) -> Result<Self> {
        let camera = Self {
            origin,
            height,
            facing_degrees,
            fov_degrees,
            horizon_pixel,
            viewport_width: viewport.x,
            viewport_height: viewport.y,
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Build this frame's camera from the player's pose and the level's
    /// fixed projection settings.
    pub fn from_player(player: &PlayerCamera, level: &LevelConfig, viewport: Vec2) -> Result<Self> {
        Self::new(
            player.position,
            player.height,
            player.facing_degrees,
            level.fov_degrees,
            level.horizon_pixel,
            viewport,
        )
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("origin.x", self.origin.x),
            ("origin.y", self.origin.y),
            ("height", self.height),
            ("facing_degrees", self.facing_degrees),
            ("fov_degrees", self.fov_degrees),
            ("horizon_pixel", self.horizon_pixel),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ];
        if let Some((name, _)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(Mode7Error::NonFiniteCamera(name));
        }
        if self.viewport_width < 1.0 || self.viewport_height < 1.0 {
            return Err(Mode7Error::ViewportTooSmall {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if self.horizon_pixel >= self.viewport_height {
            return Err(Mode7Error::HorizonOutsideViewport {
                horizon: self.horizon_pixel,
                viewport_height: self.viewport_height,
            });
        }
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Rotation basis for `facing - fov`. The fov offset is intentional:
    /// the forward and inverse mappings both use it, so they stay inverse.
    pub fn rotation(&self) -> RotationBasis {
        let (sin, cos) = (self.facing_degrees - self.fov_degrees).to_radians().sin_cos();
        RotationBasis { sin, cos }
    }

    /// Rows of floor between the horizon and the bottom edge.
    pub fn floor_rows(&self) -> f32 {
        self.viewport_height - self.horizon_pixel
    }
}

/// The player-owned pose the camera follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerCamera {
    pub position: Vec2,
    pub height: f32,
    pub facing_degrees: f32,
    min_height: f32,
    max_height: f32,
}

impl PlayerCamera {
    pub fn new(position: Vec2, height: f32, facing_degrees: f32) -> Self {
        Self {
            position,
            height,
            facing_degrees,
            min_height: CAMERA_MIN_HEIGHT,
            max_height: CAMERA_MAX_HEIGHT,
        }
    }

    pub fn from_level(level: &LevelConfig) -> Self {
        let start = &level.camera;
        Self::new(
            Vec2::from(start.start_position),
            start.height,
            start.facing_degrees,
        )
        .with_height_limits(start.min_height, start.max_height)
    }

    pub fn with_height_limits(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self.height = self.height.clamp(min_height, max_height);
        self
    }

    /// Unit vector pointing into the screen. A point straight ahead sits at
    /// `atan2(origin - point) == facing`, so forward is the negated heading.
    pub fn forward(&self) -> Vec2 {
        let (sin, cos) = self.facing_degrees.to_radians().sin_cos();
        -Vec2::new(cos, sin)
    }

    /// Positive `degrees` turns right on screen.
    pub fn turn(&mut self, degrees: f32) {
        self.facing_degrees = (self.facing_degrees + degrees).rem_euclid(360.0);
    }

    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn climb(&mut self, amount: f32) {
        self.height = (self.height + amount).clamp(self.min_height, self.max_height);
    }

    /// Apply one frame of input axes (each in -1..=1).
    pub fn update(&mut self, turn_axis: f32, move_axis: f32, climb_axis: f32, dt: f32) {
        self.turn(turn_axis * CAMERA_TURN_SPEED * dt);
        self.advance(move_axis * CAMERA_MOVE_SPEED * dt);
        self.climb(climb_axis * CAMERA_CLIMB_SPEED * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Vec2 {
        Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }

    #[test]
    fn test_horizon_must_be_inside_viewport() {
        let result = CameraState::new(Vec2::ZERO, 15.0, 90.0, 45.0, 270.0, viewport());
        assert!(matches!(result, Err(Mode7Error::HorizonOutsideViewport { .. })));

        let result = CameraState::new(Vec2::ZERO, 15.0, 90.0, 45.0, 269.0, viewport());
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_non_finite_fields() {
        let result = CameraState::new(Vec2::new(f32::NAN, 0.0), 15.0, 90.0, 45.0, 48.0, viewport());
        assert!(matches!(result, Err(Mode7Error::NonFiniteCamera("origin.x"))));
    }

    #[test]
    fn test_rejects_sub_pixel_viewport() {
        let result = CameraState::new(Vec2::ZERO, 15.0, 90.0, 45.0, 48.0, Vec2::new(0.5, 270.0));
        assert!(matches!(result, Err(Mode7Error::ViewportTooSmall { .. })));
    }

    #[test]
    fn test_rotation_folds_in_fov() {
        let camera = CameraState::new(Vec2::ZERO, 15.0, 90.0, 45.0, 48.0, viewport()).unwrap();
        let basis = camera.rotation();
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert!((basis.sin - half_sqrt2).abs() < 1e-6);
        assert!((basis.cos - half_sqrt2).abs() < 1e-6);
    }

    #[test]
    fn test_forward_matches_view_direction() {
        let player = PlayerCamera::new(Vec2::new(256.0, 256.0), 15.0, 90.0);
        let forward = player.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!((forward.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_climb_is_clamped() {
        let mut player = PlayerCamera::new(Vec2::ZERO, 15.0, 0.0).with_height_limits(10.0, 20.0);
        player.climb(100.0);
        assert_eq!(player.height, 20.0);
        player.climb(-100.0);
        assert_eq!(player.height, 10.0);
    }

    #[test]
    fn test_turn_wraps() {
        let mut player = PlayerCamera::new(Vec2::ZERO, 15.0, 350.0);
        player.turn(20.0);
        assert!((player.facing_degrees - 10.0).abs() < 1e-4);
    }
}
