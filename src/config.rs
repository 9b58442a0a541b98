use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use eframe::egui::Color32;
use serde::Deserialize;

use crate::idle::TaskPriority;
use crate::scene::DEFAULT_LINK_DISTANCE;
use crate::util::parse_color;

#[derive(Clone, Debug, PartialEq)]
pub struct BackdropConfig {
    pub node_count: usize,
    pub primary_color: Color32,
    pub secondary_color: Color32,
    pub connection_color: Color32,
    pub link_distance: f32,
    pub rain_columns: usize,
    pub grid_spacing: f32,
    pub max_fps: Option<f32>,
    pub show_fps: bool,
    pub preload: Vec<PathBuf>,
    pub preload_priority: TaskPriority,
}

/// Below this the grid turns into a solid fill of line calls.
pub const MIN_GRID_SPACING: f32 = 1.0;

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            node_count: 50,
            primary_color: Color32::from_rgba_unmultiplied(56, 189, 248, 153),
            secondary_color: Color32::from_rgba_unmultiplied(139, 92, 246, 102),
            connection_color: Color32::from_rgba_unmultiplied(56, 189, 248, 51),
            link_distance: DEFAULT_LINK_DISTANCE,
            rain_columns: 50,
            grid_spacing: 100.0,
            max_fps: None,
            show_fps: false,
            preload: Vec::new(),
            preload_priority: TaskPriority::Normal,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColorValue(pub Color32);

impl TryFrom<String> for ColorValue {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        parse_color(&value).map(Self)
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Config file layout; every field is optional and falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ConfigFile {
    pub node_count: Option<usize>,
    pub primary_color: Option<ColorValue>,
    pub secondary_color: Option<ColorValue>,
    pub connection_color: Option<ColorValue>,
    pub link_distance: Option<f32>,
    pub rain_columns: Option<usize>,
    pub grid_spacing: Option<f32>,
    pub max_fps: Option<f32>,
    pub show_fps: Option<bool>,
    pub preload: Option<Vec<PathBuf>>,
    pub preload_priority: Option<TaskPriority>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid backdrop config in {}", path.display()))
    }

    /// Overlays every field present in `self` onto `config`.
    pub fn apply(self, config: &mut BackdropConfig) {
        let Self {
            node_count,
            primary_color,
            secondary_color,
            connection_color,
            link_distance,
            rain_columns,
            grid_spacing,
            max_fps,
            show_fps,
            preload,
            preload_priority,
        } = self;

        if let Some(value) = node_count {
            config.node_count = value;
        }
        if let Some(ColorValue(value)) = primary_color {
            config.primary_color = value;
        }
        if let Some(ColorValue(value)) = secondary_color {
            config.secondary_color = value;
        }
        if let Some(ColorValue(value)) = connection_color {
            config.connection_color = value;
        }
        if let Some(value) = link_distance {
            config.link_distance = value;
        }
        if let Some(value) = rain_columns {
            config.rain_columns = value;
        }
        if let Some(value) = grid_spacing {
            config.grid_spacing = value;
        }
        if max_fps.is_some() {
            config.max_fps = max_fps;
        }
        if let Some(value) = show_fps {
            config.show_fps = value;
        }
        if let Some(value) = preload {
            config.preload = value;
        }
        if let Some(value) = preload_priority {
            config.preload_priority = value;
        }
    }
}

impl BackdropConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.link_distance.is_finite() && self.link_distance > 0.0,
            "link distance must be a positive number, got {}",
            self.link_distance
        );
        ensure!(
            self.grid_spacing.is_finite() && self.grid_spacing >= MIN_GRID_SPACING,
            "grid spacing must be at least {MIN_GRID_SPACING}, got {}",
            self.grid_spacing
        );
        if let Some(max_fps) = self.max_fps {
            ensure!(
                max_fps.is_finite() && max_fps >= 1.0,
                "max fps must be at least 1, got {max_fps}"
            );
        }
        Ok(())
    }
}
