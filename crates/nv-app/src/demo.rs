//! Simulated view-models for the demo session
//! Replays a straight-line route instead of talking to a routing service

use chrono::Utc;
use nv_core::{
    InstructionModel, LaunchData, LifecycleEvent, LifecycleObserver, Location,
    LocationEngineHandle, LocationEngineKind, LocationViewModel, NavigationOptions,
    NavigationViewModel, NavigationViewOptions, ObservableField, Point, Route, RouteLeg,
    RouteViewModel, SummaryModel,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assumed travel speed of the simulated vehicle
const SPEED_MPS: f64 = 13.9;

/// Points per generated route
const ROUTE_POINTS: usize = 12;

fn haversine_m(a: Point, b: Point) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Straight line between two points
pub fn straight_route(origin: Point, destination: Point) -> Route {
    let geometry: Vec<Point> = (0..ROUTE_POINTS)
        .map(|i| {
            let t = i as f64 / (ROUTE_POINTS - 1) as f64;
            Point::from_lng_lat(
                origin.longitude + (destination.longitude - origin.longitude) * t,
                origin.latitude + (destination.latitude - origin.latitude) * t,
            )
        })
        .collect();
    let distance_m = haversine_m(origin, destination);
    let duration_s = distance_m / SPEED_MPS;
    let mut route = Route::new(geometry, distance_m, duration_s);
    route.legs.push(RouteLeg {
        summary: "Simulated leg".to_string(),
        distance_m,
        duration_s,
    });
    route
}

fn remaining_distance_m(route: &Route, index: usize) -> f64 {
    route.geometry[index..]
        .windows(2)
        .map(|pair| haversine_m(pair[0], pair[1]))
        .sum()
}

pub struct SimLocationViewModel {
    raw_location: ObservableField<Location>,
    location_engine: ObservableField<LocationEngineHandle>,
    simulate: bool,
}

impl SimLocationViewModel {
    pub fn new(simulate: bool) -> Self {
        Self {
            raw_location: ObservableField::new("raw_location"),
            location_engine: ObservableField::new("location_engine"),
            simulate,
        }
    }

    /// Feed a raw fix as the device location provider would
    pub fn feed(&self, location: Location) {
        self.raw_location.publish(location);
    }
}

impl LifecycleObserver for SimLocationViewModel {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        if event == LifecycleEvent::Start && self.location_engine.value().is_none() {
            let kind = if self.simulate {
                LocationEngineKind::Mock
            } else {
                LocationEngineKind::Platform
            };
            self.location_engine.publish(LocationEngineHandle {
                id: format!("{kind:?}-engine").to_lowercase(),
                kind,
            });
        }
    }
}

impl LocationViewModel for SimLocationViewModel {
    fn raw_location(&self) -> &ObservableField<Location> {
        &self.raw_location
    }

    fn location_engine(&self) -> &ObservableField<LocationEngineHandle> {
        &self.location_engine
    }

    fn update_route(&self, route: &Route) {
        debug!(points = route.geometry.len(), "mock engine loaded route");
    }
}

pub struct SimRouteViewModel {
    route: ObservableField<Route>,
    destination: ObservableField<Point>,
    last_raw: Mutex<Option<Location>>,
}

impl SimRouteViewModel {
    pub fn new() -> Self {
        Self {
            route: ObservableField::new("route"),
            destination: ObservableField::new("destination"),
            last_raw: Mutex::new(None),
        }
    }
}

impl Default for SimRouteViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteViewModel for SimRouteViewModel {
    fn route(&self) -> &ObservableField<Route> {
        &self.route
    }

    fn destination(&self) -> &ObservableField<Point> {
        &self.destination
    }

    fn update_raw_location(&self, location: &Location) {
        *self.last_raw.lock() = Some(location.clone());
    }

    fn fetch_route_new_origin(&self, origin: Point) {
        let Some(destination) = self.destination.value() else {
            debug!("no destination yet, reroute skipped");
            return;
        };
        info!(lng = origin.longitude, lat = origin.latitude, "rerouting");
        self.route.publish(straight_route(origin, destination));
    }

    fn extract_launch_data(&self, options: &NavigationViewOptions) {
        // A recreated view starts again with the launch data of the session
        // that is already running
        if self.route.has_value() {
            debug!("launch data already extracted");
            return;
        }
        match &options.launch {
            LaunchData::Route { route } => {
                if let Some(destination) = route.destination() {
                    self.destination.publish(destination);
                }
                self.route.publish(route.clone());
            }
            LaunchData::Coordinates { origin, destination } => {
                self.destination.publish(*destination);
                let origin = self
                    .last_raw
                    .lock()
                    .as_ref()
                    .map(Location::point)
                    .unwrap_or(*origin);
                self.route.publish(straight_route(origin, *destination));
            }
        }
    }
}

#[derive(Default)]
struct Progress {
    route: Option<Route>,
    index: usize,
    ticks: usize,
    rerouted: bool,
}

pub struct SimNavigationViewModel {
    is_running: ObservableField<bool>,
    navigation_location: ObservableField<Location>,
    new_origin: ObservableField<Point>,
    instruction_model: ObservableField<InstructionModel>,
    summary_model: ObservableField<SummaryModel>,
    options: Mutex<NavigationOptions>,
    progress: Mutex<Progress>,
    /// Tick at which the vehicle drifts off the route
    off_route_tick: Option<usize>,
}

impl SimNavigationViewModel {
    pub fn new(off_route_tick: Option<usize>) -> Self {
        Self {
            is_running: ObservableField::new("is_running"),
            navigation_location: ObservableField::new("navigation_location"),
            new_origin: ObservableField::new("new_origin"),
            instruction_model: ObservableField::new("instruction_model"),
            summary_model: ObservableField::new("summary_model"),
            options: Mutex::new(NavigationOptions::default()),
            progress: Mutex::new(Progress::default()),
            off_route_tick,
        }
    }

    /// Advance one position along the route. Returns `false` once arrived.
    pub fn tick(&self) -> bool {
        let (route, index, off_route) = {
            let mut progress = self.progress.lock();
            let Some(route) = progress.route.clone() else {
                return true;
            };
            let Some(last) = route.geometry.len().checked_sub(1) else {
                drop(progress);
                warn!("route without geometry, stopping simulation");
                self.is_running.publish(false);
                return false;
            };
            progress.ticks += 1;
            let off_route = !progress.rerouted
                && self.off_route_tick == Some(progress.ticks)
                && self.options.lock().enable_off_route_detection;
            if off_route {
                progress.rerouted = true;
            } else {
                progress.index = (progress.index + 1).min(last);
            }
            (route, progress.index, off_route)
        };

        let point = route.geometry[index];
        if off_route {
            let drifted = Point::from_lng_lat(point.longitude + 0.0008, point.latitude);
            self.navigation_location.publish(self.location_at(drifted));
            self.new_origin.publish(drifted);
            return true;
        }

        self.navigation_location.publish(self.location_at(point));
        let distance_remaining_m = remaining_distance_m(&route, index);
        let duration_remaining_s = distance_remaining_m / SPEED_MPS;
        self.summary_model.publish(SummaryModel {
            distance_remaining_m,
            duration_remaining_s,
            arrival_time_ms: Utc::now().timestamp_millis() + (duration_remaining_s * 1000.0) as i64,
        });

        let arrived = index + 1 >= route.geometry.len();
        self.instruction_model.publish(InstructionModel {
            primary_text: if arrived {
                "You have arrived".to_string()
            } else {
                "Continue straight".to_string()
            },
            secondary_text: None,
            maneuver_type: if arrived { "arrive" } else { "continue" }.to_string(),
            step_distance_remaining_m: distance_remaining_m,
        });

        if arrived {
            self.is_running.publish(false);
        }
        !arrived
    }

    fn location_at(&self, point: Point) -> Location {
        Location::new(point.latitude, point.longitude)
            .with_timestamp(Utc::now().timestamp_millis())
            .with_provider("simulation")
    }
}

impl LifecycleObserver for SimNavigationViewModel {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        if event == LifecycleEvent::Destroy {
            debug!("navigation view-model released");
        }
    }
}

impl NavigationViewModel for SimNavigationViewModel {
    fn is_running(&self) -> &ObservableField<bool> {
        &self.is_running
    }

    fn navigation_location(&self) -> &ObservableField<Location> {
        &self.navigation_location
    }

    fn new_origin(&self) -> &ObservableField<Point> {
        &self.new_origin
    }

    fn instruction_model(&self) -> &ObservableField<InstructionModel> {
        &self.instruction_model
    }

    fn summary_model(&self) -> &ObservableField<SummaryModel> {
        &self.summary_model
    }

    fn initialize_navigation_options(&self, options: NavigationOptions) {
        *self.options.lock() = options;
    }

    fn update_location_engine(&self, engine: &LocationEngineHandle) {
        info!(engine = %engine.id, "navigation using location engine");
    }

    fn update_route(&self, route: &Route) {
        {
            let mut progress = self.progress.lock();
            if progress.route.as_ref() == Some(route) {
                return;
            }
            progress.route = Some(route.clone());
            progress.index = 0;
        }
        if self.is_running.value() != Some(true) {
            self.is_running.publish(true);
        }
    }
}
