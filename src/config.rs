//! Editor configuration.
//!
//! Every field has a default matching the stock impact map, so an empty JSON
//! object (`{}`) is a valid configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default column labels, in display order.
pub const DEFAULT_COLUMN_LABELS: [&str; 6] = [
    "Objective",
    "Tier",
    "Means",
    "Control",
    "Circumvention",
    "Probability",
];

/// Storage key holding the serialized node list.
pub const DEFAULT_NODES_KEY: &str = "impactmap-nodes";
/// Storage key holding the serialized view state.
pub const DEFAULT_VIEW_KEY: &str = "impactmap-view";

/// Inclusive scale range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Tunables for an editor instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Ordered column labels; the column count is their length.
    pub column_labels: Vec<String>,
    /// Range enforced by ordinary zoom.
    pub zoom: ScaleBounds,
    /// Increment used by the zoom-in / zoom-out buttons.
    pub zoom_step: f32,
    /// Range enforced by fit-to-content. Its lower bound is deliberately
    /// looser than `zoom.min`.
    pub fit: ScaleBounds,
    /// Space reserved around the content when fitting.
    pub fit_padding: f32,
    /// Vertical bend of connector curves, as a fraction of the vertical gap.
    pub curve_factor: f32,
    pub nodes_key: String,
    pub view_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            column_labels: DEFAULT_COLUMN_LABELS.iter().map(|s| s.to_string()).collect(),
            zoom: ScaleBounds::new(0.5, 2.5),
            zoom_step: 0.1,
            fit: ScaleBounds::new(0.4, 2.5),
            fit_padding: 80.0,
            curve_factor: 0.15,
            nodes_key: DEFAULT_NODES_KEY.to_string(),
            view_key: DEFAULT_VIEW_KEY.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_labels.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        for (name, bounds) in [("zoom", self.zoom), ("fit", self.fit)] {
            if !(bounds.min <= bounds.max) || bounds.min <= 0.0 {
                return Err(ConfigError::InvertedBounds {
                    name,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        for (name, value) in [
            ("zoom_step", self.zoom_step),
            ("fit_padding", self.fit_padding),
            ("curve_factor", self.curve_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.column_labels.len()
    }
}
