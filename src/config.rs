use std::path::Path;

use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for a drawing surface.
///
/// Every field has a default so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub width: u32,
    pub height: u32,
    pub background: Color32,
    /// Neither dimension is ever allowed below this
    pub min_dimension: u32,
    /// Maximum retained undo entries; unbounded when `None`
    pub history_limit: Option<usize>,
    /// Fill iteration cap as a multiple of the pixel count
    pub fill_iteration_factor: f32,
    /// Caption stamped under framed exports
    pub caption: String,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color32::WHITE,
            min_dimension: Self::DEFAULT_MIN_DIMENSION,
            history_limit: None,
            fill_iteration_factor: 1.5,
            caption: "Hey! I made a doodle on Doodlepad!".to_owned(),
        }
    }
}

impl SurfaceSettings {
    pub const DEFAULT_MIN_DIMENSION: u32 = 100;

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_dimension == 0 {
            return Err(ConfigError::Invalid("min_dimension must be at least 1".to_owned()));
        }
        if !self.fill_iteration_factor.is_finite() || self.fill_iteration_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fill_iteration_factor must be positive, got {}",
                self.fill_iteration_factor
            )));
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid("history_limit must keep at least one entry".to_owned()));
        }
        Ok(())
    }
}

/// Preset surface sizes relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeMode {
    Small,
    #[default]
    Medium,
    Full,
}

impl SizeMode {
    /// Viewports narrower than this use the narrow-screen proportions
    pub const NARROW_VIEWPORT: f32 = 768.0;

    pub fn cycle(self) -> Self {
        match self {
            Self::Small => Self::Medium,
            Self::Medium => Self::Full,
            Self::Full => Self::Small,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Full => "Full",
        }
    }

    /// Surface dimensions for a viewport, floored at `min_dimension`.
    pub fn dimensions(self, viewport: Vec2, min_dimension: u32) -> (u32, u32) {
        let narrow = viewport.x < Self::NARROW_VIEWPORT;
        let (w, h) = match self {
            Self::Small if narrow => (0.9, 0.3),
            Self::Small => (0.5, 0.4),
            Self::Medium if narrow => (0.9, 0.35),
            Self::Medium => (0.5, 0.55),
            Self::Full => (0.95, 0.75),
        };
        let width = (viewport.x * w).max(0.0).round() as u32;
        let height = (viewport.y * h).max(0.0).round() as u32;
        (width.max(min_dimension), height.max(min_dimension))
    }
}
