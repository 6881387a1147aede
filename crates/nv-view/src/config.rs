//! Navigation view configuration

use crate::theme::Theme;
use nv_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Map layer the route line is drawn below
pub const ROUTE_BELOW_LAYER: &str = "admin-3-4-boundaries-bg";

/// Configuration for a navigation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationViewConfig {
    /// Styles and icons
    pub theme: Theme,

    /// Layer id the route line is inserted below
    pub route_below_layer: String,

    /// Bottom map padding in pixels. Defaults to the summary sheet height.
    pub map_padding_bottom: Option<f64>,
}

impl Default for NavigationViewConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            route_below_layer: ROUTE_BELOW_LAYER.to_string(),
            map_padding_bottom: None,
        }
    }
}

impl NavigationViewConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
