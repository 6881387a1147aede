//! Domain values flowing through the observable fields

use serde::{Deserialize, Serialize};

/// A geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn from_lng_lat(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

/// A location fix, raw or fused by the navigation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Heading in degrees
    pub bearing: Option<f32>,
    /// Speed in m/s
    pub speed: Option<f32>,
    /// Horizontal accuracy in meters
    pub accuracy: Option<f32>,
    /// Fix time in milliseconds since the epoch
    pub timestamp_ms: i64,
    pub provider: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            bearing: None,
            speed: None,
            accuracy: None,
            timestamp_ms: 0,
            provider: String::new(),
        }
    }

    pub fn with_bearing(mut self, bearing: f32) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// `(0, 0)` is what location engines report before they have a real fix
    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    pub fn point(&self) -> Point {
        Point::from_lng_lat(self.longitude, self.latitude)
    }
}

/// One leg of a route between two waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub summary: String,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// A directions route as returned by the routing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: Vec<Point>,
    pub distance_m: f64,
    pub duration_s: f64,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

impl Route {
    pub fn new(geometry: Vec<Point>, distance_m: f64, duration_s: f64) -> Self {
        Self {
            geometry,
            distance_m,
            duration_s,
            legs: Vec::new(),
        }
    }

    /// First coordinate of the geometry
    pub fn origin(&self) -> Option<Point> {
        self.geometry.first().copied()
    }

    /// Last coordinate of the geometry
    pub fn destination(&self) -> Option<Point> {
        self.geometry.last().copied()
    }
}

/// Kind of location engine feeding the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationEngineKind {
    /// Platform GPS / fused provider
    Platform,
    /// Replays a route for simulation
    Mock,
}

/// Opaque reference to an acquired location engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationEngineHandle {
    pub id: String,
    pub kind: LocationEngineKind,
}

/// Next maneuver as shown by the instruction panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionModel {
    pub primary_text: String,
    pub secondary_text: Option<String>,
    pub maneuver_type: String,
    pub step_distance_remaining_m: f64,
}

/// Remaining-trip figures shown in the summary bottom sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryModel {
    pub distance_remaining_m: f64,
    pub duration_remaining_s: f64,
    /// Arrival time in milliseconds since the epoch
    pub arrival_time_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_requires_both_coordinates_zero() {
        assert!(Location::new(0.0, 0.0).is_sentinel());
        assert!(!Location::new(0.0, 12.5).is_sentinel());
        assert!(!Location::new(51.5, 0.0).is_sentinel());
    }

    #[test]
    fn test_route_endpoints() {
        let route = Route::new(
            vec![Point::from_lng_lat(1.0, 2.0), Point::from_lng_lat(3.0, 4.0)],
            120.0,
            30.0,
        );
        assert_eq!(route.origin(), Some(Point::from_lng_lat(1.0, 2.0)));
        assert_eq!(route.destination(), Some(Point::from_lng_lat(3.0, 4.0)));
        assert_eq!(Route::new(Vec::new(), 0.0, 0.0).origin(), None);
    }
}
