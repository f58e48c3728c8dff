//! Viewer configuration
//!
//! Uses RON (Rusty Object Notation) so the file stays hand-editable.

use serde::{Deserialize, Serialize};
use softrender::ChannelOrder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file, looked up in the working directory
pub const CONFIG_FILE: &str = "softrender.ron";

/// Error type for config loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    /// Surface size in pixels (before zoom)
    pub width: usize,
    pub height: usize,
    /// TGA file shown on startup
    pub image: Option<PathBuf>,
    /// Factor applied by the grow/shrink keys
    pub resize_factor: f32,
    /// Line demo background, 0-255 RGB
    pub background: [u8; 3],
    /// Channel order of the display texture
    pub channel_order: ChannelOrder,
    /// Integer display scale, 1-8
    pub zoom: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "SoftRenderer".to_string(),
            width: 800,
            height: 600,
            image: None,
            resize_factor: 1.5,
            background: [0, 0, 0],
            channel_order: ChannelOrder::Rgb,
            zoom: 1,
        }
    }
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ViewerConfig = ron::from_str(&contents)?;
        Ok(config.sanitized())
    }

    /// Load `path`, falling back to defaults when it is missing or broken
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Clamp values the viewer can't work with
    fn sanitized(mut self) -> Self {
        // display textures are addressed with u16 sides
        let max_side = u16::MAX as usize;
        self.width = self.width.clamp(1, max_side);
        self.height = self.height.clamp(1, max_side);
        self.zoom = self.zoom.clamp(1, 8);
        if self.resize_factor.is_nan() || self.resize_factor <= 1.0 {
            self.resize_factor = 1.5;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        let config = ViewerConfig {
            title: "test".to_string(),
            width: 320,
            height: 240,
            image: Some(PathBuf::from("assets/test.tga")),
            resize_factor: 2.0,
            background: [10, 20, 30],
            channel_order: ChannelOrder::Bgr,
            zoom: 3,
        };
        config.save(&path).unwrap();
        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        fs::write(&path, "(width: 64, zoom: 40)").unwrap();
        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 600);
        assert_eq!(config.zoom, 8);
    }

    #[test]
    fn surface_size_fits_a_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        fs::write(&path, "(width: 70000, height: 0)").unwrap();
        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.width, 65535);
        assert_eq!(config.height, 1);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ViewerConfig::load_or_default(dir.path().join("absent.ron")),
            ViewerConfig::default()
        );

        let broken = dir.path().join("broken.ron");
        fs::write(&broken, "(width: ").unwrap();
        assert!(matches!(ViewerConfig::load(&broken), Err(ConfigError::Parse(_))));
        assert_eq!(ViewerConfig::load_or_default(&broken), ViewerConfig::default());
    }
}
