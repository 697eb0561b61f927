//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable editor. Values that would break an invariant (inverted
//! zoom bounds, a split ratio outside `0..=1`) are repaired by the consumers
//! rather than rejected here.

use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::garden::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PlantColor};
use crate::{GardenError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub layout: LayoutConfig,
    pub style: ViewStyle,
    /// Create a "Test Plant" at the origin when the garden starts empty.
    pub seed_plant: bool,
    /// `tracing` env-filter directive handed to Bevy's `LogPlugin`.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            interaction: InteractionConfig::default(),
            layout: LayoutConfig::default(),
            style: ViewStyle::default(),
            seed_plant: true,
            log_filter: "info,wgpu=error,naga=warn".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .change_context(GardenError::Config)
            .attach("editor configuration is not valid JSON for EditorConfig")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .change_context(GardenError::Io)
            .attach(format!("path: {}", path.display()))?;

        Self::from_json_str(&text).attach(format!("path: {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).change_context(GardenError::Config)
    }

    /// Load from `path` when given, otherwise defaults. Load failures are
    /// returned alongside the defaults so the caller can log them.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<Report<GardenError>>) {
        match path {
            None => (Self::default(), None),
            Some(p) => match Self::from_path(p) {
                Ok(config) => (config, None),
                Err(report) => (Self::default(), Some(report)),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom: f32,
    /// Initial look-at point on the ground, `[x, z]`.
    pub target: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom: DEFAULT_ZOOM,
            target: [0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Fraction of the current zoom applied per wheel notch.
    pub zoom_speed: f32,
    /// Pointer travel (px) after which a press in the plan view becomes a pan.
    pub drag_threshold_px: f32,
    /// Grab radius of the move gizmo, relative to the plant's plan radius.
    pub gizmo_grab_factor: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zoom_speed: 0.1,
            drag_threshold_px: 3.0,
            gizmo_grab_factor: 1.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub split_ratio: f32,
    pub min_top_px: f32,
    pub min_bottom_px: f32,
    pub divider_px: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_ratio: 0.5,
            min_top_px: 150.0,
            min_bottom_px: 150.0,
            divider_px: 8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStyle {
    pub elevation_background: PlantColor,
    pub plan_background: PlantColor,
    pub outline_color: PlantColor,
    pub outline_scale: f32,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            elevation_background: PlantColor(0xffc0cb),
            plan_background: PlantColor(0xc8e6c9),
            outline_color: PlantColor(0xffff00),
            outline_scale: 1.2,
        }
    }
}
