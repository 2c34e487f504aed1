//! Floor texture sampling with wraparound addressing.
//!
//! The floor tiles infinitely, so texture coordinates are wrapped rather than
//! clamped, and sampling is nearest-neighbour to keep texels crisp.

use crate::constants::PROCEDURAL_TILE_SIZE;
use crate::error::Result;
use image::{Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};
use std::path::Path;
use tracing::debug;

/// Anything the floor rasterizer can read texels from.
pub trait FloorSampler {
    /// Texture size in texels
    fn size(&self) -> (u32, u32);

    /// Sample at normalized coordinates; any value wraps.
    fn sample(&self, u: f32, v: f32) -> Rgba<u8>;
}

pub struct FloorTexture {
    image: RgbaImage,
}

impl FloorTexture {
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)?.into_rgba8();
        debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded floor texture");
        Ok(Self::from_image(image))
    }

    /// Checkerboard "racetrack" tiles perturbed by Perlin noise.
    pub fn procedural(size: u32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let image = RgbaImage::from_fn(size, size, |x, y| {
            let checker = ((x / PROCEDURAL_TILE_SIZE) + (y / PROCEDURAL_TILE_SIZE)) % 2 == 0;
            let grain = perlin.get([x as f64 / 24.0, y as f64 / 24.0]) as f32;
            let border = x % PROCEDURAL_TILE_SIZE == 0 || y % PROCEDURAL_TILE_SIZE == 0;

            let base: [f32; 3] = if border {
                [220.0, 220.0, 200.0]
            } else if checker {
                [70.0, 140.0, 60.0]
            } else {
                [50.0, 110.0, 45.0]
            };
            let shade = 1.0 + grain * 0.25;
            Rgba([
                (base[0] * shade).clamp(0.0, 255.0) as u8,
                (base[1] * shade).clamp(0.0, 255.0) as u8,
                (base[2] * shade).clamp(0.0, 255.0) as u8,
                255,
            ])
        });
        Self::from_image(image)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Map a normalized coordinate onto a texel index with wraparound.
#[inline]
fn wrap_texel(coord: f32, extent: u32) -> u32 {
    let wrapped = coord.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    ((wrapped * extent as f32) as u32).min(extent - 1)
}

impl FloorSampler for FloorTexture {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn sample(&self, u: f32, v: f32) -> Rgba<u8> {
        let (width, height) = self.image.dimensions();
        *self.image.get_pixel(wrap_texel(u, width), wrap_texel(v, height))
    }
}
