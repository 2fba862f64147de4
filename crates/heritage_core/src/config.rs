//! Map session configuration.
//!
//! # Invariants
//! - `Default` reproduces the Shaanxi overview viewport.
//! - Missing fields in serialized config fall back to defaults.

use crate::map::style::MarkerSize;
use crate::model::record::Coordinates;
use serde::{Deserialize, Serialize};

/// Viewport and marker presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: Coordinates,
    pub default_zoom: u8,
    /// Zoom used when focusing a single record.
    pub focus_zoom: u8,
    /// `[top, right, bottom, left]` pixels kept free when fitting markers.
    pub fit_padding: [u32; 4],
    pub marker_size: MarkerSize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(108.95, 34.27),
            default_zoom: 7,
            focus_zoom: 10,
            fit_padding: [30, 30, 30, 30],
            marker_size: MarkerSize::Small,
        }
    }
}
