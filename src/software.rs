//! CPU floor rasterizer.
//!
//! Same per-pixel kernel as the GLSL floor shader, spread across rows with
//! rayon. Used for headless snapshots and to check the shader math in tests.

use crate::camera::{CameraState, PlayerCamera};
use crate::error::Result;
use crate::floor_texture::FloorSampler;
use crate::level::Level;
use crate::projection::project_floor_pixel;
use crate::systems::{collect_sprites, SpriteQuad};
use glam::Vec2;
use hecs::World;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::info;

/// Rasterize the floor into a viewport-sized image. Transparent (sky) pixels
/// are filled with `sky`.
pub fn rasterize_floor<S>(camera: &CameraState, sampler: &S, sky: Rgba<u8>) -> RgbaImage
where
    S: FloorSampler + Sync,
{
    puffin::profile_function!();

    let width = camera.viewport_width as u32;
    let height = camera.viewport_height as u32;
    let mut buffer = vec![0u8; (width * height * 4) as usize];
    let viewport = camera.viewport();

    buffer
        .par_chunks_mut((width * 4) as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            for (column, pixel) in pixels.chunks_exact_mut(4).enumerate() {
                // Sample at pixel centres, like the fragment shader does
                let uv = Vec2::new(column as f32 + 0.5, row as f32 + 0.5) / viewport;
                let color = project_floor_pixel(camera, uv, sampler).unwrap_or(sky);
                pixel.copy_from_slice(&color.0);
            }
        });

    // Buffer length is exactly width * height * 4
    RgbaImage::from_raw(width, height, buffer).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Paint billboards in the given order as filled ellipses, like the sprite
/// shader does.
pub fn draw_sprites(image: &mut RgbaImage, quads: &[SpriteQuad]) {
    let (width, height) = image.dimensions();
    for quad in quads {
        let min = quad.position.max(Vec2::ZERO).floor();
        let max = (quad.position + quad.size).min(Vec2::new(width as f32, height as f32)).ceil();
        let color = Rgba([
            (quad.color.x * 255.0) as u8,
            (quad.color.y * 255.0) as u8,
            (quad.color.z * 255.0) as u8,
            255,
        ]);

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let local = (centre - quad.position) / quad.size * 2.0 - Vec2::ONE;
                if local.length() <= 1.0 {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Render one full frame (floor and billboards) without a GPU.
pub fn render_snapshot(level: &Level, player: &PlayerCamera, world: &World) -> Result<RgbaImage> {
    let camera = CameraState::from_player(player, &level.config, level.config.viewport())?;
    let [r, g, b] = level.config.sky_color;

    let mut image = rasterize_floor(&camera, &level.floor, Rgba([r, g, b, 255]));
    let quads = collect_sprites(world, &camera);
    draw_sprites(&mut image, &quads);

    info!(sprites = quads.len(), "rendered software snapshot");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::BillboardKind;
    use crate::floor_texture::FloorTexture;
    use crate::level::LevelConfig;
    use glam::Vec3;

    const SKY: Rgba<u8> = Rgba([10, 20, 90, 255]);

    fn camera() -> CameraState {
        CameraState::new(Vec2::new(256.0, 256.0), 15.0, 90.0, 45.0, 48.0, Vec2::new(320.0, 270.0)).unwrap()
    }

    #[test]
    fn test_rows_above_horizon_are_sky() {
        let texture = FloorTexture::procedural(64, 1);
        let image = rasterize_floor(&camera(), &texture, SKY);

        assert_eq!(image.dimensions(), (320, 270));
        for y in 0..48 {
            assert!(image.pixels().skip((y * 320) as usize).take(320).all(|p| *p == SKY));
        }
    }

    #[test]
    fn test_matches_per_pixel_kernel() {
        let camera = camera();
        let texture = FloorTexture::procedural(64, 3);
        let image = rasterize_floor(&camera, &texture, SKY);

        for &(x, y) in &[(0u32, 49u32), (160, 100), (319, 269), (40, 200)] {
            let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / camera.viewport();
            let expected = project_floor_pixel(&camera, uv, &texture).unwrap_or(SKY);
            assert_eq!(*image.get_pixel(x, y), expected);
        }
    }

    #[test]
    fn test_draw_sprites_fills_ellipse_and_clips() {
        let mut image = RgbaImage::new(32, 32);
        let quad = SpriteQuad {
            position: Vec2::new(-4.0, 8.0),
            size: Vec2::new(16.0, 16.0),
            color: Vec3::new(1.0, 0.0, 0.0),
            kind: BillboardKind::Particle,
            depth: 24.0,
        };
        draw_sprites(&mut image, &[quad]);

        // Centre is filled, bounding-box corner is not
        assert_eq!(*image.get_pixel(4, 16), Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 8)[3], 0);
        assert_eq!(image.get_pixel(20, 16)[3], 0);
    }

    #[test]
    fn test_snapshot_of_sub_pixel_viewport_errors() {
        let config = LevelConfig { texture_size: 64, ..LevelConfig::default() };
        let mut level = Level::from_config(config, std::path::Path::new(".")).unwrap();
        level.config.viewport = [0.5, 270.0];
        let player = PlayerCamera::from_level(&level.config);

        let result = render_snapshot(&level, &player, &World::new());
        assert!(matches!(result, Err(crate::error::Mode7Error::ViewportTooSmall { .. })));
    }

    #[test]
    fn test_snapshot_has_viewport_size() {
        let config = LevelConfig { texture_size: 64, ..LevelConfig::default() };
        let level = Level::from_config(config, std::path::Path::new(".")).unwrap();
        let player = PlayerCamera::from_level(&level.config);

        let image = render_snapshot(&level, &player, &World::new()).unwrap();
        assert_eq!(image.dimensions(), (320, 270));
        let [r, g, b] = level.config.sky_color;
        assert_eq!(*image.get_pixel(0, 0), Rgba([r, g, b, 255]));
    }
}
