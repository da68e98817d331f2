//! Layout configuration.
//!
//! The config crosses the WASM boundary as a plain JS object, so it derives
//! serde with camelCase field names and per-field defaults: `{}` is a valid
//! options object.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// How finished (x, y) layout coordinates are projected for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateMode {
    /// Root at the top, depth grows downward.
    #[default]
    TopDown,
    /// Root on the left, depth grows to the right (x and y swapped).
    LeftToRight,
    /// Root at the center: x maps to an angle, y to a radius.
    Radial,
}

/// Configuration for both layout variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Minimum horizontal separation between neighbouring nodes on one level.
    /// For binary trees this is also the width of one column.
    pub min_horizontal_distance: f64,
    /// Vertical distance between consecutive levels.
    pub min_vertical_distance: f64,
    /// Shift the finished tree right so that no node has a negative x.
    pub normalize: bool,
    /// Run the evenness pass over intermediate siblings (n-ary only).
    pub equalize: bool,
    pub coordinate_mode: CoordinateMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_horizontal_distance: 1.0,
            min_vertical_distance: 1.0,
            normalize: true,
            equalize: true,
            coordinate_mode: CoordinateMode::TopDown,
        }
    }
}

impl LayoutConfig {
    /// Config with the given distances and every other field defaulted.
    pub fn with_distances(min_horizontal_distance: f64, min_vertical_distance: f64) -> Self {
        Self {
            min_horizontal_distance,
            min_vertical_distance,
            ..Self::default()
        }
    }

    pub fn coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.coordinate_mode = mode;
        self
    }

    /// Reject distances that cannot produce a valid layout.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("minHorizontalDistance", self.min_horizontal_distance),
            ("minVerticalDistance", self.min_vertical_distance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::invalid_configuration(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
