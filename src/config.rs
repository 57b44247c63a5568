//! Renderer configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SOFTSCENE_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colors;

/// Main renderer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output surface
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Render and update cadence
    #[serde(default)]
    pub timing: TimingConfig,
    /// Default camera
    #[serde(default)]
    pub camera: CameraConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
    /// Headless demo run
    #[serde(default)]
    pub demo: DemoConfig,
}

impl RenderConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SOFTSCENE_SURFACE__WIDTH=640 -> surface.width = 640
        figment = figment.merge(Env::prefixed("SOFTSCENE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Output surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Clear colour [r, g, b, a]
    pub background: [u8; 4],
}

impl SurfaceConfig {
    /// Clear colour packed as `0xAARRGGBB`.
    pub fn background_color(&self) -> u32 {
        let [r, g, b, a] = self.background;
        colors::argb(a, r, g, b)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: [255, 255, 255, 255],
        }
    }
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Target renders per second
    pub frames_per_second: u32,
    /// Target logic updates per second
    pub updates_per_second: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            updates_per_second: 60,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera starts looking at [x, y, z]
    pub target: [f32; 3],
    /// Horizontal field of view in degrees
    pub fov_x: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Pan speed (units per second)
    pub pan_speed: f32,
    /// Rotation speed (degrees per second)
    pub tilt_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [100.0, 50.0, 150.0],
            target: [0.0, 0.0, 0.0],
            fov_x: 90.0,
            fov_y: 73.74,
            near: 1.0,
            far: 750.0,
            pan_speed: 25.0,
            tilt_speed: 90.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Draw the world axes
    pub show_axes: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_axes: true,
        }
    }
}

/// Headless demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to render before writing the output
    pub frames: u32,
    /// Where the last frame is written
    pub output: PathBuf,
    /// Optional OBJ file added to the scene
    pub obj: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            output: PathBuf::from("softscene.png"),
            obj: None,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
