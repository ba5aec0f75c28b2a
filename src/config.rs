//! Demo configuration.
//!
//! Everything that used to be a compile-time constant (window size and title, camera,
//! culling strategy, asset locations) lives in [`DemoConfig`]. Every field has a
//! default, so a configuration file only needs to name what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{abs::PixelFormat, cube::CullMode, projection::Projection};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "projection-demo.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Animating mesh using matrix transformations".to_string(),
            width: 820,
            height: 820,
            fullscreen: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance between the eye and the cube center.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 50.0,
            distance: 3.0,
        }
    }
}

impl CameraConfig {
    /// Builds the projection for a viewport with the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Result<Projection, crate::projection::ProjectionError> {
        Projection::new(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: PixelFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub cull_mode: CullMode,
    pub clear_color: [f32; 4],
    /// Directory the shader and texture paths are relative to.
    pub asset_dir: PathBuf,
    /// Shader base name, `.vert` and `.frag` are appended.
    pub shader: PathBuf,
    /// Bound to texture units 0 and 1 in order.
    pub textures: [TextureConfig; 2],
    pub log_level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            cull_mode: CullMode::default(),
            clear_color: [0.2, 0.5, 0.2, 1.0],
            asset_dir: PathBuf::from("."),
            shader: PathBuf::from("shaders/cube"),
            textures: [
                TextureConfig {
                    path: PathBuf::from("assets/wall.png"),
                    format: PixelFormat::Rgb,
                },
                TextureConfig {
                    path: PathBuf::from("assets/awesomeface.png"),
                    format: PixelFormat::Rgba,
                },
            ],
            log_level: "info".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Candidate config files in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("projection-demo").join("config.json"));
        }
        paths
    }

    /// Loads the first existing config file from [`DemoConfig::search_paths`].
    ///
    /// A broken file is reported and skipped; when nothing usable is found the
    /// defaults are returned.
    pub fn discover() -> Self {
        for path in Self::search_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Using config {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring config: {e}"),
            }
        }
        log::info!("No config file found, using defaults");
        Self::default()
    }

    /// Parsed log level, `info` if the configured name is not recognised.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Resolves an asset path against [`DemoConfig::asset_dir`].
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(path)
    }
}
