//! Mode-7 floor projection in both directions.
//!
//! The forward mapping takes a screen pixel to a floor-texture coordinate and
//! drives the floor rasterizer (CPU here, GLSL in `renderer`). The inverse
//! mapping takes a floor-world point back to the screen so billboards land
//! exactly where the floor under them was drawn.
//!
//! With `d = horizon - screen_y`, `L = width - screen_x` and the rotation
//! basis `(s, c)` of `facing - fov`, the forward mapping is
//!
//! ```text
//! floor_x = origin_x + (L*c - screen_x*s) / d * height
//! floor_y = origin_y + (L*s + screen_x*c) / d * height
//! ```
//!
//! Nothing in here fails loudly: a pixel above the horizon, a point outside
//! the view cone or a degenerate alignment all come back as `None` and the
//! caller just skips it this frame.

use crate::camera::{CameraState, RotationBasis};
use crate::constants::HORIZON_CLIP_MARGIN;
use crate::floor_texture::FloorSampler;
use glam::Vec2;
use image::Rgba;

/// Where a floor point lands on screen, and how big things there appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub screen_x: f32,
    pub screen_y: f32,
    /// 0.0 at the horizon row, 1.0 at the bottom row
    pub distance_scale: f32,
}

/// Forward mapping for one pixel (pixel units, origin top-left).
///
/// The horizon row itself counts as sky, which also keeps `d` non-zero.
pub fn screen_to_floor(camera: &CameraState, screen_x: f32, screen_y: f32) -> Option<Vec2> {
    if screen_y <= camera.horizon_pixel {
        return None;
    }

    let RotationBasis { sin, cos } = camera.rotation();
    let depth_z = camera.horizon_pixel - screen_y;
    let lateral = camera.viewport_width - screen_x;

    let offset = Vec2::new(
        (lateral * cos - screen_x * sin) / depth_z,
        (lateral * sin + screen_x * cos) / depth_z,
    ) * camera.height;
    let floor = camera.origin + offset;

    floor.is_finite().then_some(floor)
}

/// Shade one floor pixel. `uv` is normalized viewport position; `None` means
/// transparent (the sky layer shows through).
pub fn project_floor_pixel(camera: &CameraState, uv: Vec2, sampler: &impl FloorSampler) -> Option<Rgba<u8>> {
    let screen = uv * camera.viewport();
    let floor = screen_to_floor(camera, screen.x, screen.y)?;

    let (width, height) = sampler.size();
    let mut texel = sampler.sample(floor.x / width as f32, floor.y / height as f32);
    texel[3] = u8::MAX;
    Some(texel)
}

/// Signed angle (degrees, in `[-180, 180)`) between the camera facing and the
/// direction from the floor point to the camera.
pub fn view_angle_difference(camera: &CameraState, floor_x: f32, floor_y: f32) -> f32 {
    let angle = (camera.origin.y - floor_y)
        .atan2(camera.origin.x - floor_x)
        .to_degrees();
    let diff = (camera.facing_degrees - angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to 360.0
    if diff >= 180.0 { diff - 360.0 } else { diff }
}

/// Inclusive cone test: `|angle diff| <= fov`.
pub fn in_view_cone(camera: &CameraState, floor_x: f32, floor_y: f32) -> bool {
    view_angle_difference(camera, floor_x, floor_y).abs() <= camera.fov_degrees
}

/// Linear depth factor for a screen row; negative inside the clip margin.
pub fn distance_scale(camera: &CameraState, screen_y: f32) -> f32 {
    (screen_y - camera.horizon_pixel) / camera.floor_rows()
}

/// Inverse mapping: place a floor-world point on screen.
pub fn project_world_to_screen(camera: &CameraState, floor_x: f32, floor_y: f32) -> Option<ScreenProjection> {
    if !in_view_cone(camera, floor_x, floor_y) {
        return None;
    }

    let RotationBasis { sin, cos } = camera.rotation();
    let dx = floor_x - camera.origin.x;
    let dy = floor_y - camera.origin.y;
    let width = camera.viewport_width;

    // With k = depth_z / height the forward mapping reads
    //   k*dx = W*c - screen_x*(c + s)
    //   k*dy = W*s + screen_x*(c - s)
    // Eliminating k gives screen_x; substituting back gives k = W / D.
    // Both axes end up over the same D.
    let denominator = dx * (cos - sin) + dy * (cos + sin);
    if denominator == 0.0 {
        return None;
    }

    let screen_x = width * (dy * cos - dx * sin) / denominator;
    let depth_ratio = width / denominator;
    let screen_y = camera.horizon_pixel - depth_ratio * camera.height;

    if !screen_x.is_finite() || !screen_y.is_finite() {
        return None;
    }
    if screen_y < camera.horizon_pixel - HORIZON_CLIP_MARGIN {
        return None;
    }

    Some(ScreenProjection {
        screen_x,
        screen_y,
        distance_scale: distance_scale(camera, screen_y),
    })
}
