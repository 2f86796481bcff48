use crate::drag::{DragSettings, MouseButton, PanMapping};
use crate::error::{Error, Result};
use crate::interpolation::Curve;
use crate::sweep::SweepOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tilectl::GridSpec;
use tracing::warn;

/// Main configuration for tilectl
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub capture: CaptureSettings,
    #[serde(default)]
    pub pan: PanSettings,
}

/// Grid shape, pan distance and overlap, all in pixels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GridSettings {
    pub cols: u32,
    pub rows: u32,
    pub pan_x: u32,
    pub pan_y: u32,
    pub overlap_x: u32,
    pub overlap_y: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cols: 3,
            rows: 3,
            pan_x: 800,
            pan_y: 600,
            overlap_x: 100,
            overlap_y: 100,
        }
    }
}

/// Sweep timing and where results go
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Pause after each pan so the application can redraw
    pub settle_ms: u64,
    pub tiles_dir: PathBuf,
    pub output: PathBuf,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            settle_ms: 800,
            tiles_dir: PathBuf::from("tiles"),
            output: PathBuf::from("blueprint_full_graph.png"),
        }
    }
}

/// Drag gesture used to pan the target application
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanSettings {
    pub invert_x: bool,
    pub invert_y: bool,
    pub button: MouseButton,
    pub duration_ms: u64,
    pub rewind_duration_ms: u64,
    pub curve: Curve,
}

impl Default for PanSettings {
    fn default() -> Self {
        let mapping = PanMapping::default();
        let drag = DragSettings::default();
        Self {
            invert_x: mapping.invert_x,
            invert_y: mapping.invert_y,
            button: drag.button,
            duration_ms: drag.duration.as_millis() as u64,
            rewind_duration_ms: drag.rewind_duration.as_millis() as u64,
            curve: drag.curve,
        }
    }
}

impl PanSettings {
    pub fn mapping(&self) -> PanMapping {
        PanMapping {
            invert_x: self.invert_x,
            invert_y: self.invert_y,
        }
    }

    pub fn drag(&self) -> DragSettings {
        DragSettings {
            button: self.button,
            duration: Duration::from_millis(self.duration_ms),
            rewind_duration: Duration::from_millis(self.rewind_duration_ms),
            curve: self.curve,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/tilectl/config.toml")
    }

    /// Load config from the default path, returning defaults if it is
    /// missing or unreadable
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`, failing on read or parse errors
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn grid_spec(&self) -> GridSpec {
        let g = &self.grid;
        GridSpec::new(g.cols, g.rows)
            .with_pan(g.pan_x, g.pan_y)
            .with_overlap(g.overlap_x, g.overlap_y)
    }

    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            settle: Duration::from_millis(self.capture.settle_ms),
            resume_from: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_three_by_three_grid() {
        let config = Config::default();
        assert_eq!(
            config.grid_spec(),
            GridSpec::new(3, 3).with_pan(800, 600).with_overlap(100, 100)
        );
        assert_eq!(config.pan.mapping(), PanMapping::default());
        assert_eq!(config.pan.drag().button, MouseButton::Middle);
        assert_eq!(config.pan.drag().rewind_duration, Duration::from_secs(1));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [grid]
            cols = 5
            overlap_x = 40

            [pan]
            invert_y = false
            curve = "ease-in-out"
            button = "left"
            "#,
        )
        .expect("parse");

        assert_eq!(config.grid.cols, 5);
        assert_eq!(config.grid.rows, 3);
        assert_eq!(config.grid.overlap_x, 40);
        assert!(config.pan.invert_x);
        assert!(!config.pan.invert_y);
        assert_eq!(config.pan.curve, Curve::EaseInOut);
        assert_eq!(config.pan.button, MouseButton::Left);
        assert_eq!(config.capture, CaptureSettings::default());
    }

    #[test]
    fn sweep_options_use_settle_delay() {
        let mut config = Config::default();
        config.capture.settle_ms = 250;
        assert_eq!(config.sweep_options().settle, Duration::from_millis(250));
    }
}
