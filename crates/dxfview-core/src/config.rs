//! Viewer configuration loaded from TOML.

use peniko::Color;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entity::EntityColor;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "DXFVIEW_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ViewerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })
    }

    /// Load configuration from an explicit path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Use `DXFVIEW_CONFIG` if set, else `./config/default.toml` if present,
    /// else built-in defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(PathBuf::from(path));
        }
        let default_path = Path::new("config").join("default.toml");
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Canvas size and fit margin, in screen pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "CanvasConfig::default_width")]
    pub width: f64,
    #[serde(default = "CanvasConfig::default_height")]
    pub height: f64,
    /// Total margin reserved on each axis by fit-to-content.
    #[serde(default = "CanvasConfig::default_padding")]
    pub padding: f64,
}

impl CanvasConfig {
    fn default_width() -> f64 {
        1000.0
    }

    fn default_height() -> f64 {
        600.0
    }

    fn default_padding() -> f64 {
        50.0
    }

    pub fn size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width, self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            padding: Self::default_padding(),
        }
    }
}

/// Pointer tolerances and zoom behaviour.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "InteractionConfig::default_snap_radius")]
    pub snap_radius_px: f64,
    #[serde(default = "InteractionConfig::default_hit_tolerance")]
    pub hit_tolerance_px: f64,
    #[serde(default = "InteractionConfig::default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default = "InteractionConfig::default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "InteractionConfig::default_max_scale")]
    pub max_scale: f64,
}

impl InteractionConfig {
    fn default_snap_radius() -> f64 {
        10.0
    }

    fn default_hit_tolerance() -> f64 {
        5.0
    }

    fn default_zoom_factor() -> f64 {
        1.1
    }

    fn default_min_scale() -> f64 {
        1e-6
    }

    fn default_max_scale() -> f64 {
        1e6
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            snap_radius_px: Self::default_snap_radius(),
            hit_tolerance_px: Self::default_hit_tolerance(),
            zoom_factor: Self::default_zoom_factor(),
            min_scale: Self::default_min_scale(),
            max_scale: Self::default_max_scale(),
        }
    }
}

/// Frame-building options.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RenderConfig {
    /// Levels of block-insert indirection expanded when drawing.
    #[serde(default = "RenderConfig::default_max_block_depth")]
    pub max_block_depth: usize,
    #[serde(default = "RenderConfig::default_handle_size")]
    pub handle_size_px: f64,
    #[serde(default = "RenderConfig::default_selection_color")]
    pub selection_color: EntityColor,
    #[serde(default = "RenderConfig::default_hover_color")]
    pub hover_color: EntityColor,
    #[serde(default = "RenderConfig::default_preview_color")]
    pub preview_color: EntityColor,
}

impl RenderConfig {
    fn default_max_block_depth() -> usize {
        1
    }

    fn default_handle_size() -> f64 {
        8.0
    }

    fn default_selection_color() -> EntityColor {
        EntityColor::from(Color::from_rgba8(59, 130, 246, 255))
    }

    fn default_hover_color() -> EntityColor {
        EntityColor::from(Color::from_rgba8(249, 115, 22, 255))
    }

    fn default_preview_color() -> EntityColor {
        EntityColor::from(Color::from_rgba8(6, 182, 212, 255))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_block_depth: Self::default_max_block_depth(),
            handle_size_px: Self::default_handle_size(),
            selection_color: Self::default_selection_color(),
            hover_color: Self::default_hover_color(),
            preview_color: Self::default_preview_color(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },
}
