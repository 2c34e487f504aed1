//! Level configuration and the floor texture that goes with it.
//!
//! A level is loaded once and handed explicitly to whoever needs it; there is
//! no global "current floor" to swap.

use crate::constants::*;
use crate::error::{Mode7Error, Result};
use crate::floor_texture::FloorTexture;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Raw level file format (JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    /// Floor image, relative to the level file. Generated when absent.
    pub floor_texture: Option<PathBuf>,
    pub procedural_seed: u32,
    pub texture_size: u32,
    /// Screen row where the floor starts (fixed per level)
    pub horizon_pixel: f32,
    pub fov_degrees: f32,
    /// Logical render resolution
    pub viewport: [f32; 2],
    pub sky_color: [u8; 3],
    pub camera: CameraStart,
    pub sprites: SpriteScatter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraStart {
    pub start_position: [f32; 2],
    pub height: f32,
    pub facing_degrees: f32,
    pub min_height: f32,
    pub max_height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteScatter {
    pub count: usize,
    pub radius: f32,
    pub seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "Procedural Circuit".to_string(),
            floor_texture: None,
            procedural_seed: 7,
            texture_size: PROCEDURAL_TEXTURE_SIZE,
            horizon_pixel: DEFAULT_HORIZON_PIXEL,
            fov_degrees: CAMERA_DEFAULT_FOV,
            viewport: [VIEWPORT_WIDTH, VIEWPORT_HEIGHT],
            sky_color: [40, 70, 160],
            camera: CameraStart::default(),
            sprites: SpriteScatter::default(),
        }
    }
}

impl Default for CameraStart {
    fn default() -> Self {
        Self {
            start_position: [256.0, 256.0],
            height: CAMERA_DEFAULT_HEIGHT,
            facing_degrees: CAMERA_DEFAULT_FACING,
            min_height: CAMERA_MIN_HEIGHT,
            max_height: CAMERA_MAX_HEIGHT,
        }
    }
}

impl Default for SpriteScatter {
    fn default() -> Self {
        Self {
            count: SPRITE_SCATTER_COUNT,
            radius: SPRITE_SCATTER_RADIUS,
            seed: 1,
        }
    }
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Mode7Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.viewport;
        if !(width >= 1.0 && height >= 1.0) {
            return Err(Mode7Error::InvalidLevel(format!("viewport {width}x{height} must be at least 1x1")));
        }
        if !(0.0..height).contains(&self.horizon_pixel) {
            return Err(Mode7Error::InvalidLevel(format!(
                "horizon_pixel {} must be in 0..{height}",
                self.horizon_pixel
            )));
        }
        if self.camera.min_height > self.camera.max_height {
            return Err(Mode7Error::InvalidLevel("camera.min_height exceeds camera.max_height".into()));
        }
        if self.floor_texture.is_none() && self.texture_size == 0 {
            return Err(Mode7Error::InvalidLevel("texture_size must be non-zero".into()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::from(self.viewport)
    }
}

/// A loaded level: its config plus the floor it tiles.
pub struct Level {
    pub config: LevelConfig,
    pub floor: FloorTexture,
}

impl Level {
    /// Load a level file; a relative `floor_texture` resolves next to it.
    pub fn load(path: &Path) -> Result<Self> {
        let config = LevelConfig::load(path)?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_config(config, base_dir)
    }

    pub fn from_config(config: LevelConfig, base_dir: &Path) -> Result<Self> {
        let floor = match &config.floor_texture {
            Some(texture) => FloorTexture::load(&base_dir.join(texture))?,
            None => FloorTexture::procedural(config.texture_size, config.procedural_seed),
        };
        info!(level = %config.name, horizon = config.horizon_pixel, fov = config.fov_degrees, "level ready");
        Ok(Self { config, floor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor_texture::FloorSampler;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(LevelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = LevelConfig::from_json(r#"{ "name": "Mute City", "horizon_pixel": 60 }"#).unwrap();
        assert_eq!(config.name, "Mute City");
        assert_eq!(config.horizon_pixel, 60.0);
        assert_eq!(config.fov_degrees, CAMERA_DEFAULT_FOV);
        assert_eq!(config.camera.height, CAMERA_DEFAULT_HEIGHT);
    }

    #[test]
    fn test_horizon_below_viewport_is_rejected() {
        let result = LevelConfig::from_json(r#"{ "horizon_pixel": 300, "viewport": [320, 270] }"#);
        assert!(matches!(result, Err(Mode7Error::InvalidLevel(_))));
    }

    #[test]
    fn test_sub_pixel_viewport_is_rejected() {
        let result = LevelConfig::from_json(r#"{ "viewport": [0.5, 270], "texture_size": 64 }"#);
        assert!(matches!(result, Err(Mode7Error::InvalidLevel(_))));

        let result = LevelConfig::from_json(r#"{ "viewport": [1, 1], "horizon_pixel": 0, "texture_size": 64 }"#);
        assert!(result.is_ok());
    }

    #[test]
    fn test_inverted_height_range_is_rejected() {
        let result = LevelConfig::from_json(r#"{ "camera": { "min_height": 40, "max_height": 10 } }"#);
        assert!(matches!(result, Err(Mode7Error::InvalidLevel(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(LevelConfig::from_json("{ nope"), Err(Mode7Error::Parse(_))));
    }

    #[test]
    fn test_load_generates_floor_without_texture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "texture_size": 64, "procedural_seed": 3 }}"#).unwrap();

        let level = Level::load(file.path()).unwrap();
        assert_eq!(level.floor.size(), (64, 64));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = LevelConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
