//! Viewer configuration
//!
//! Loaded from `~/.config/action-path/config.toml`; missing or unreadable
//! files fall back to defaults.

use crate::error::{PathError, Result};
use crate::path::{LayoutConfig, NodeStyle, PathSettings, ZoomConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// "dark" or "light"
    pub theme: String,

    /// Record store file; the platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// How long notifications stay visible
    pub notification_ms: u64,

    pub layout: LayoutSection,
    pub zoom: ZoomSection,
}

/// Node placement and label settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    /// Distance between node centres
    pub pitch: f32,
    pub node_radius: f32,
    /// Description wrap width in characters
    pub wrap_chars: usize,
    pub max_label_lines: usize,
}

/// Zoom limits and steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSection {
    pub min_scale: f32,
    pub max_scale: f32,
    pub wheel_in: f32,
    pub wheel_out: f32,
    pub button_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            storage_path: None,
            notification_ms: 3000,
            layout: LayoutSection::default(),
            zoom: ZoomSection::default(),
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        let style = NodeStyle::default();
        Self {
            pitch: LayoutConfig::default().pitch,
            node_radius: style.radius,
            wrap_chars: style.wrap_chars,
            max_label_lines: style.max_label_lines,
        }
    }
}

impl Default for ZoomSection {
    fn default() -> Self {
        let zoom = ZoomConfig::default();
        Self {
            min_scale: zoom.min_scale,
            max_scale: zoom.max_scale,
            wheel_in: zoom.wheel_in,
            wheel_out: zoom.wheel_out,
            button_step: zoom.button_step,
        }
    }
}

impl ViewerConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("action-path/config.toml"))
            .unwrap_or_else(|| PathBuf::from("action-path.toml"))
    }

    /// Load configuration from the default file, falling back to defaults
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let zoom = &self.zoom;
        if !(zoom.min_scale > 0.0 && zoom.min_scale <= zoom.max_scale) {
            return Err(PathError::Config(format!(
                "invalid zoom range {}..{}",
                zoom.min_scale, zoom.max_scale
            )));
        }
        if zoom.wheel_in <= 1.0 || zoom.wheel_out >= 1.0 || zoom.wheel_out <= 0.0 {
            return Err(PathError::Config(
                "wheel_in must be > 1 and wheel_out within (0, 1)".to_string(),
            ));
        }
        if zoom.button_step <= 1.0 {
            return Err(PathError::Config("button_step must be > 1".to_string()));
        }
        if self.layout.pitch <= 0.0 || self.layout.node_radius <= 0.0 {
            return Err(PathError::Config(
                "pitch and node_radius must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Record store file to use
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(crate::records::LocalStore::default_path)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Settings for the path view
    pub fn path_settings(&self) -> PathSettings {
        let style = NodeStyle {
            radius: self.layout.node_radius,
            wrap_chars: self.layout.wrap_chars,
            max_label_lines: self.layout.max_label_lines,
            ..NodeStyle::default()
        };
        PathSettings {
            layout: LayoutConfig {
                pitch: self.layout.pitch,
            },
            style,
            zoom: ZoomConfig {
                min_scale: self.zoom.min_scale,
                max_scale: self.zoom.max_scale,
                wheel_in: self.zoom.wheel_in,
                wheel_out: self.zoom.wheel_out,
                button_step: self.zoom.button_step,
            },
        }
    }
}
