//! Terminal stand-ins for the map and the panels
//!
//! Every collaborator logs what a real widget would draw.

use nv_core::{
    InstructionModel, LifecycleEvent, LifecycleObserver, Location, Point, Route, SummaryModel,
};
use nv_view::{
    InstructionPanel, LocationLayer, MapEngine, MapSurface, NavigationCamera,
    NavigationViewListener, RouteLayer, RouteListener, StateBundle, SummarySheet, ViewComponents,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

const MAP_CAMERA_KEY: &str = "map_camera_zoom";

type ScrollListener = Box<dyn Fn() + Send + Sync>;

pub struct ConsoleMapSurface {
    engine: Arc<ConsoleMapEngine>,
    ready: Arc<Notify>,
}

impl ConsoleMapSurface {
    pub fn new(engine: Arc<ConsoleMapEngine>) -> Self {
        Self {
            engine,
            ready: Arc::new(Notify::new()),
        }
    }

    pub fn engine(&self) -> &Arc<ConsoleMapEngine> {
        &self.engine
    }

    /// Resolves once [`MapSurface::request_map`] was called
    pub async fn map_requested(&self) -> Arc<ConsoleMapEngine> {
        self.ready.notified().await;
        self.engine.clone()
    }
}

impl MapSurface for ConsoleMapSurface {
    fn on_create(&self, restoring: bool) {
        debug!(restoring, "map surface created");
    }

    fn on_start(&self) {
        debug!("map surface started");
    }

    fn on_resume(&self) {
        debug!("map surface resumed");
    }

    fn on_pause(&self) {
        debug!("map surface paused");
    }

    fn on_stop(&self) {
        debug!("map surface stopped");
    }

    fn on_destroy(&self) {
        debug!("map surface destroyed");
    }

    fn on_low_memory(&self) {
        warn!("map surface low on memory");
    }

    fn on_save_instance_state(&self, bundle: &mut StateBundle) {
        if let Err(err) = bundle.put(MAP_CAMERA_KEY, &15.0_f64) {
            warn!(%err, "map camera not saved");
        }
    }

    fn request_map(&self) {
        self.ready.notify_one();
    }
}

#[derive(Default)]
pub struct ConsoleMapEngine {
    scroll_listener: Mutex<Option<ScrollListener>>,
}

impl ConsoleMapEngine {
    /// Pan the map as a user would
    pub fn scroll(&self) {
        info!("user pans the map");
        if let Some(listener) = self.scroll_listener.lock().as_ref() {
            listener();
        }
    }
}

impl MapEngine for ConsoleMapEngine {
    fn set_style(&self, style_url: &str) {
        info!(style_url, "map style");
    }

    fn set_padding(&self, left: f64, top: f64, right: f64, bottom: f64) {
        debug!(left, top, right, bottom, "map padding");
    }

    fn add_marker(&self, position: Point, icon: &str) {
        info!(lng = position.longitude, lat = position.latitude, icon, "destination marker");
    }

    fn create_route_layer(&self, route_style: &str, below_layer: &str) -> Arc<dyn RouteLayer> {
        debug!(route_style, below_layer, "route layer created");
        Arc::new(ConsoleRouteLayer)
    }

    fn create_location_layer(&self) -> Arc<dyn LocationLayer> {
        Arc::new(ConsoleLocationLayer::default())
    }

    fn create_camera(&self) -> Arc<dyn NavigationCamera> {
        Arc::new(ConsoleCamera::default())
    }

    fn set_on_scroll_listener(&self, listener: ScrollListener) {
        *self.scroll_listener.lock() = Some(listener);
    }
}

struct ConsoleRouteLayer;

impl RouteLayer for ConsoleRouteLayer {
    fn add_route(&self, route: &Route) {
        info!(
            points = route.geometry.len(),
            distance_m = route.distance_m.round(),
            "route drawn"
        );
    }
}

#[derive(Default)]
struct ConsoleLocationLayer {
    started: AtomicBool,
}

impl LifecycleObserver for ConsoleLocationLayer {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Start => self.started.store(true, Ordering::SeqCst),
            LifecycleEvent::Stop => self.started.store(false, Ordering::SeqCst),
            _ => {}
        }
    }
}

impl LocationLayer for ConsoleLocationLayer {
    fn force_location_update(&self, location: &Location) {
        if !self.started.load(Ordering::SeqCst) {
            return;
        }
        debug!(lat = location.latitude, lng = location.longitude, "puck moved");
    }
}

#[derive(Default)]
struct ConsoleCamera {
    tracking: AtomicBool,
}

impl NavigationCamera for ConsoleCamera {
    fn start(&self, route: &Route) {
        self.tracking.store(true, Ordering::SeqCst);
        info!(legs = route.legs.len(), "camera framing route");
    }

    fn resume(&self, location: &Location) {
        self.tracking.store(true, Ordering::SeqCst);
        info!(lat = location.latitude, lng = location.longitude, "camera resumed");
    }

    fn set_tracking_location(&self, enabled: bool) {
        self.tracking.store(enabled, Ordering::SeqCst);
        debug!(enabled, "camera tracking");
    }

    fn reset_position(&self) {
        debug!("camera reset");
    }
}

#[derive(Default)]
pub struct ConsoleInstructionPanel {
    list_open: AtomicBool,
}

impl ConsoleInstructionPanel {
    pub fn open_instruction_list(&self) {
        self.list_open.store(true, Ordering::SeqCst);
    }
}

impl InstructionPanel for ConsoleInstructionPanel {
    fn update(&self, model: &InstructionModel) {
        info!(
            maneuver = %model.maneuver_type,
            in_m = model.step_distance_remaining_m.round(),
            "{}",
            model.primary_text
        );
    }

    fn is_showing_instruction_list(&self) -> bool {
        self.list_open.load(Ordering::SeqCst)
    }

    fn hide_instruction_list(&self) {
        self.list_open.store(false, Ordering::SeqCst);
        debug!("instruction list closed");
    }
}

pub struct ConsoleSummarySheet;

impl SummarySheet for ConsoleSummarySheet {
    fn update(&self, model: &SummaryModel) {
        let arrival = chrono::DateTime::from_timestamp_millis(model.arrival_time_ms)
            .map(|at| at.with_timezone(&chrono::Local).format("%H:%M").to_string())
            .unwrap_or_default();
        info!(
            remaining_m = model.distance_remaining_m.round(),
            remaining_s = model.duration_remaining_s.round(),
            %arrival,
            "summary"
        );
    }

    fn height(&self) -> f64 {
        160.0
    }
}

/// Components of one screen instance plus handles the driver pokes at
pub struct Screen {
    pub components: ViewComponents,
    pub surface: Arc<ConsoleMapSurface>,
    pub instruction_panel: Arc<ConsoleInstructionPanel>,
}

impl Screen {
    pub fn inflate() -> Self {
        let surface = Arc::new(ConsoleMapSurface::new(Arc::new(ConsoleMapEngine::default())));
        let instruction_panel = Arc::new(ConsoleInstructionPanel::default());
        let components = ViewComponents {
            map_surface: surface.clone(),
            instruction_panel: instruction_panel.clone(),
            summary_sheet: Arc::new(ConsoleSummarySheet),
        };
        Self {
            components,
            surface,
            instruction_panel,
        }
    }
}

/// Host side of the navigation view callbacks
#[derive(Default)]
pub struct HostListener {
    pub ready: Notify,
    pub finished: Notify,
}

impl NavigationViewListener for HostListener {
    fn on_navigation_ready(&self) {
        info!("navigation ready");
        self.ready.notify_one();
    }

    fn on_navigation_finished(&self) {
        info!("navigation finished");
        self.finished.notify_one();
    }
}

/// Accepts every reroute and logs the new route
pub struct LoggingRouteListener;

impl RouteListener for LoggingRouteListener {
    fn on_reroute_along(&self, route: Option<&Route>) {
        match route {
            Some(route) => info!(distance_m = route.distance_m.round(), "rerouted"),
            None => warn!("reroute produced no route"),
        }
    }

    fn on_reroute_from(&self, location: &Location) {
        info!(lat = location.latitude, lng = location.longitude, "off route");
    }

    fn allow_reroute_from(&self, _location: Option<&Location>) -> bool {
        true
    }
}
