use glam::{Vec2, Vec3};

/// Position on the floor plane (same units as the camera origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPosition {
    pub x: f32,
    pub y: f32,
}

impl FloorPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for FloorPosition {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Height above the floor; only shifts the sprite up on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elevation(pub f32);

/// What kind of billboard this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillboardKind {
    Ship,
    Enemy,
    Projectile,
    Particle,
}

/// Sprite component - screen-facing quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub kind: BillboardKind,
    /// Size in pixels at distance scale 1.0 (bottom row)
    pub size: Vec2,
    pub color: Vec3,
}

impl Billboard {
    pub fn new(kind: BillboardKind, size: Vec2, color: Vec3) -> Self {
        Self { kind, size, color }
    }
}

/// Constant floor-plane motion (demo movers)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub velocity: Vec2,
}
