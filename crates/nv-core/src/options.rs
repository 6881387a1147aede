//! Launch options handed to the navigation view

use crate::model::{Point, Route};
use serde::{Deserialize, Serialize};

/// Options forwarded to the navigation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationOptions {
    /// Set by the view when the session is driven by the drop-in UI
    pub from_navigation_ui: bool,

    /// Distance in meters after which the user is considered off-route
    pub off_route_threshold_m: f64,

    /// Whether the engine may request a new route when off-route
    pub enable_off_route_detection: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            from_navigation_ui: false,
            off_route_threshold_m: 50.0,
            enable_off_route_detection: true,
        }
    }
}

impl NavigationOptions {
    pub fn with_from_navigation_ui(mut self, from_navigation_ui: bool) -> Self {
        self.from_navigation_ui = from_navigation_ui;
        self
    }
}

/// What the session starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchData {
    /// A route computed before the view was shown
    Route { route: Route },
    /// Coordinates from which a route still has to be fetched
    Coordinates { origin: Point, destination: Point },
}

/// Everything needed to start a navigation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationViewOptions {
    pub launch: LaunchData,

    /// Replay the route with a mock location engine
    #[serde(default)]
    pub should_simulate_route: bool,

    #[serde(default)]
    pub navigation_options: NavigationOptions,
}

impl NavigationViewOptions {
    pub fn from_route(route: Route) -> Self {
        Self {
            launch: LaunchData::Route { route },
            should_simulate_route: false,
            navigation_options: NavigationOptions::default(),
        }
    }

    pub fn from_coordinates(origin: Point, destination: Point) -> Self {
        Self {
            launch: LaunchData::Coordinates { origin, destination },
            should_simulate_route: false,
            navigation_options: NavigationOptions::default(),
        }
    }

    pub fn simulate(mut self, should_simulate_route: bool) -> Self {
        self.should_simulate_route = should_simulate_route;
        self
    }

    /// Parse options from JSON, e.g. a launch intent payload
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
