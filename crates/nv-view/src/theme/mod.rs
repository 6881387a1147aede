//! Day and night map styles for the navigation view

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

/// When the night style applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightMode {
    /// Follow the local time of day
    Auto,
    Day,
    Night,
}

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub night_mode: NightMode,
    pub day_style_url: String,
    pub night_style_url: String,
    /// Route line style handed to the route layer
    pub route_style: String,
    /// Destination marker icon
    pub marker_icon: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Navigation Day/Night".to_string(),
            night_mode: NightMode::Auto,
            day_style_url: "mapbox://styles/mapbox/navigation-guidance-day-v2".to_string(),
            night_style_url: "mapbox://styles/mapbox/navigation-guidance-night-v2".to_string(),
            route_style: "navigation-route-default".to_string(),
            marker_icon: "destination-marker".to_string(),
        }
    }
}

impl Theme {
    /// Night between 18:00 and 06:00 in auto mode
    pub fn is_night_at(&self, hour: u32) -> bool {
        match self.night_mode {
            NightMode::Day => false,
            NightMode::Night => true,
            NightMode::Auto => !(6..18).contains(&hour),
        }
    }

    pub fn map_style_at(&self, hour: u32) -> &str {
        if self.is_night_at(hour) {
            &self.night_style_url
        } else {
            &self.day_style_url
        }
    }

    /// Style for the current local time
    pub fn map_style(&self) -> &str {
        self.map_style_at(Local::now().hour())
    }
}
