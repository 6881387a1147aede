//! Recording fakes for the view's collaborators

use crate::collaborators::{
    InstructionPanel, LocationLayer, MapEngine, MapSurface, NavigationCamera, RouteLayer,
    SummarySheet, ViewComponents,
};
use crate::listener::{NavigationViewListener, RouteListener};
use crate::state::StateBundle;
use crate::view::NavigationView;
use nv_core::{
    InstructionModel, LaunchData, LifecycleEvent, LifecycleObserver, LifecycleRegistry, Location,
    LocationEngineHandle, LocationViewModel, NavigationOptions, NavigationViewModel,
    NavigationViewOptions, ObservableField, Point, Route, RouteViewModel, SummaryModel, ViewModels,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MapCreate(bool),
    MapLifecycle(LifecycleEvent),
    MapLowMemory,
    MapSaveState,
    RequestMap,
    SetStyle(String),
    SetPadding(f64),
    AddMarker(Point),
    DrawRoute(Route),
    ForceLocation(Location),
    CameraStart(Route),
    CameraResume(Location),
    CameraTracking(bool),
    CameraReset,
    InstructionUpdate(String),
    SummaryUpdate(f64),
    HideInstructionList,
    UpdateRawLocation(Location),
    UpdateLocationEngine(String),
    NavigationUpdateRoute(Route),
    LocationUpdateRoute(Route),
    FetchNewOrigin(Point),
    ExtractLaunchData,
    InitOptions(NavigationOptions),
    Ready,
    Finished,
    RerouteAlong(Option<Route>),
    RerouteFrom(Location),
    LayerLifecycle(LifecycleEvent),
    ViewModelLifecycle(&'static str, LifecycleEvent),
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|call| predicate(*call)).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

pub struct FakeLocationViewModel {
    pub raw_location: ObservableField<Location>,
    pub location_engine: ObservableField<LocationEngineHandle>,
    log: CallLog,
}

impl LifecycleObserver for FakeLocationViewModel {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        self.log.push(Call::ViewModelLifecycle("location", event));
    }
}

impl LocationViewModel for FakeLocationViewModel {
    fn raw_location(&self) -> &ObservableField<Location> {
        &self.raw_location
    }
    fn location_engine(&self) -> &ObservableField<LocationEngineHandle> {
        &self.location_engine
    }
    fn update_route(&self, route: &Route) {
        self.log.push(Call::LocationUpdateRoute(route.clone()));
    }
}

pub struct FakeRouteViewModel {
    pub route: ObservableField<Route>,
    pub destination: ObservableField<Point>,
    log: CallLog,
}

impl RouteViewModel for FakeRouteViewModel {
    fn route(&self) -> &ObservableField<Route> {
        &self.route
    }
    fn destination(&self) -> &ObservableField<Point> {
        &self.destination
    }
    fn update_raw_location(&self, location: &Location) {
        self.log.push(Call::UpdateRawLocation(location.clone()));
    }
    fn fetch_route_new_origin(&self, origin: Point) {
        self.log.push(Call::FetchNewOrigin(origin));
    }
    fn extract_launch_data(&self, options: &NavigationViewOptions) {
        self.log.push(Call::ExtractLaunchData);
        if let LaunchData::Coordinates { destination, .. } = &options.launch {
            self.destination.publish(*destination);
        }
    }
}

pub struct FakeNavigationViewModel {
    pub is_running: ObservableField<bool>,
    pub navigation_location: ObservableField<Location>,
    pub new_origin: ObservableField<Point>,
    pub instruction_model: ObservableField<InstructionModel>,
    pub summary_model: ObservableField<SummaryModel>,
    log: CallLog,
}

impl LifecycleObserver for FakeNavigationViewModel {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        self.log.push(Call::ViewModelLifecycle("navigation", event));
    }
}

impl NavigationViewModel for FakeNavigationViewModel {
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
        self.log.push(Call::InitOptions(options));
    }
    fn update_location_engine(&self, engine: &LocationEngineHandle) {
        self.log.push(Call::UpdateLocationEngine(engine.id.clone()));
    }
    fn update_route(&self, route: &Route) {
        self.log.push(Call::NavigationUpdateRoute(route.clone()));
    }
}

pub struct FakeMapSurface(CallLog);

impl MapSurface for FakeMapSurface {
    fn on_create(&self, restoring: bool) {
        self.0.push(Call::MapCreate(restoring));
    }
    fn on_start(&self) {
        self.0.push(Call::MapLifecycle(LifecycleEvent::Start));
    }
    fn on_resume(&self) {
        self.0.push(Call::MapLifecycle(LifecycleEvent::Resume));
    }
    fn on_pause(&self) {
        self.0.push(Call::MapLifecycle(LifecycleEvent::Pause));
    }
    fn on_stop(&self) {
        self.0.push(Call::MapLifecycle(LifecycleEvent::Stop));
    }
    fn on_destroy(&self) {
        self.0.push(Call::MapLifecycle(LifecycleEvent::Destroy));
    }
    fn on_low_memory(&self) {
        self.0.push(Call::MapLowMemory);
    }
    fn on_save_instance_state(&self, bundle: &mut StateBundle) {
        bundle.put_bool("map_saved", true);
        self.0.push(Call::MapSaveState);
    }
    fn request_map(&self) {
        self.0.push(Call::RequestMap);
    }
}

struct FakeRouteLayer(CallLog);

impl RouteLayer for FakeRouteLayer {
    fn add_route(&self, route: &Route) {
        self.0.push(Call::DrawRoute(route.clone()));
    }
}

struct FakeLocationLayer(CallLog);

impl LifecycleObserver for FakeLocationLayer {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        self.0.push(Call::LayerLifecycle(event));
    }
}

impl LocationLayer for FakeLocationLayer {
    fn force_location_update(&self, location: &Location) {
        self.0.push(Call::ForceLocation(location.clone()));
    }
}

struct FakeCamera(CallLog);

impl NavigationCamera for FakeCamera {
    fn start(&self, route: &Route) {
        self.0.push(Call::CameraStart(route.clone()));
    }
    fn resume(&self, location: &Location) {
        self.0.push(Call::CameraResume(location.clone()));
    }
    fn set_tracking_location(&self, enabled: bool) {
        self.0.push(Call::CameraTracking(enabled));
    }
    fn reset_position(&self) {
        self.0.push(Call::CameraReset);
    }
}

pub struct FakeMapEngine {
    log: CallLog,
    scroll_listener: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl FakeMapEngine {
    /// Simulate the user panning the map
    pub fn scroll(&self) {
        if let Some(listener) = self.scroll_listener.lock().as_ref() {
            listener();
        }
    }
}

impl MapEngine for FakeMapEngine {
    fn set_style(&self, style_url: &str) {
        self.log.push(Call::SetStyle(style_url.to_string()));
    }
    fn set_padding(&self, _left: f64, _top: f64, _right: f64, bottom: f64) {
        self.log.push(Call::SetPadding(bottom));
    }
    fn add_marker(&self, position: Point, _icon: &str) {
        self.log.push(Call::AddMarker(position));
    }
    fn create_route_layer(&self, _route_style: &str, _below_layer: &str) -> Arc<dyn RouteLayer> {
        Arc::new(FakeRouteLayer(self.log.clone()))
    }
    fn create_location_layer(&self) -> Arc<dyn LocationLayer> {
        Arc::new(FakeLocationLayer(self.log.clone()))
    }
    fn create_camera(&self) -> Arc<dyn NavigationCamera> {
        Arc::new(FakeCamera(self.log.clone()))
    }
    fn set_on_scroll_listener(&self, listener: Box<dyn Fn() + Send + Sync>) {
        *self.scroll_listener.lock() = Some(listener);
    }
}

pub struct FakeInstructionPanel {
    pub showing_list: AtomicBool,
    log: CallLog,
}

impl InstructionPanel for FakeInstructionPanel {
    fn update(&self, model: &InstructionModel) {
        self.log.push(Call::InstructionUpdate(model.primary_text.clone()));
    }
    fn is_showing_instruction_list(&self) -> bool {
        self.showing_list.load(Ordering::SeqCst)
    }
    fn hide_instruction_list(&self) {
        self.showing_list.store(false, Ordering::SeqCst);
        self.log.push(Call::HideInstructionList);
    }
}

struct FakeSummarySheet(CallLog);

impl SummarySheet for FakeSummarySheet {
    fn update(&self, model: &SummaryModel) {
        self.0.push(Call::SummaryUpdate(model.distance_remaining_m));
    }
    fn height(&self) -> f64 {
        180.0
    }
}

pub struct FakeHostListener(CallLog);

impl NavigationViewListener for FakeHostListener {
    fn on_navigation_ready(&self) {
        self.0.push(Call::Ready);
    }
    fn on_navigation_finished(&self) {
        self.0.push(Call::Finished);
    }
}

pub struct FakeRouteListener {
    pub allow: AtomicBool,
    log: CallLog,
}

impl FakeRouteListener {
    pub fn new(log: &CallLog, allow: bool) -> Arc<Self> {
        Arc::new(Self {
            allow: AtomicBool::new(allow),
            log: log.clone(),
        })
    }
}

impl RouteListener for FakeRouteListener {
    fn on_reroute_along(&self, route: Option<&Route>) {
        self.log.push(Call::RerouteAlong(route.cloned()));
    }
    fn on_reroute_from(&self, location: &Location) {
        self.log.push(Call::RerouteFrom(location.clone()));
    }
    fn allow_reroute_from(&self, _location: Option<&Location>) -> bool {
        self.allow.load(Ordering::SeqCst)
    }
}

pub fn sample_route() -> Route {
    Route::new(
        vec![
            Point::from_lng_lat(-77.0365, 38.8977),
            Point::from_lng_lat(-77.0300, 38.9000),
            Point::from_lng_lat(-77.0200, 38.9050),
        ],
        1_850.0,
        420.0,
    )
}

pub fn sample_location() -> Location {
    Location::new(38.8980, -77.0360).with_bearing(45.0)
}

/// A view wired to fakes, with the host registry already created
pub struct Harness {
    pub log: CallLog,
    pub registry: Arc<LifecycleRegistry>,
    pub location: Arc<FakeLocationViewModel>,
    pub route: Arc<FakeRouteViewModel>,
    pub navigation: Arc<FakeNavigationViewModel>,
    pub engine: Arc<FakeMapEngine>,
    pub instruction_panel: Arc<FakeInstructionPanel>,
    pub view: NavigationView,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        let registry = Arc::new(LifecycleRegistry::new());
        registry.handle_event(LifecycleEvent::Create);

        let location = Arc::new(FakeLocationViewModel {
            raw_location: ObservableField::new("raw_location"),
            location_engine: ObservableField::new("location_engine"),
            log: log.clone(),
        });
        let route = Arc::new(FakeRouteViewModel {
            route: ObservableField::new("route"),
            destination: ObservableField::new("destination"),
            log: log.clone(),
        });
        let navigation = Arc::new(FakeNavigationViewModel {
            is_running: ObservableField::new("is_running"),
            navigation_location: ObservableField::new("navigation_location"),
            new_origin: ObservableField::new("new_origin"),
            instruction_model: ObservableField::new("instruction_model"),
            summary_model: ObservableField::new("summary_model"),
            log: log.clone(),
        });
        let instruction_panel = Arc::new(FakeInstructionPanel {
            showing_list: AtomicBool::new(false),
            log: log.clone(),
        });
        let engine = Arc::new(FakeMapEngine {
            log: log.clone(),
            scroll_listener: Mutex::new(None),
        });

        let components = ViewComponents {
            map_surface: Arc::new(FakeMapSurface(log.clone())),
            instruction_panel: instruction_panel.clone(),
            summary_sheet: Arc::new(FakeSummarySheet(log.clone())),
        };
        let view = NavigationView::builder(components)
            .session(registry.clone())
            .view_models(Self::view_models_of(&location, &route, &navigation))
            .build()
            .expect("all capabilities provided");

        Self {
            log,
            registry,
            location,
            route,
            navigation,
            engine,
            instruction_panel,
            view,
        }
    }

    pub fn view_models_of(
        location: &Arc<FakeLocationViewModel>,
        route: &Arc<FakeRouteViewModel>,
        navigation: &Arc<FakeNavigationViewModel>,
    ) -> ViewModels {
        ViewModels {
            location: location.clone(),
            route: route.clone(),
            navigation: navigation.clone(),
        }
    }

    /// Run the host sequence up to the map being ready
    pub fn ready(saved_state: Option<&StateBundle>) -> Self {
        let mut harness = Self::new();
        harness.view.on_create(saved_state);
        harness
            .view
            .get_navigation_async(Arc::new(FakeHostListener(harness.log.clone())));
        harness.view.on_map_ready(harness.engine.clone());
        harness
    }

    /// Run the full host sequence and start navigation from coordinates
    pub fn started(saved_state: Option<&StateBundle>) -> Self {
        let mut harness = Self::ready(saved_state);
        let options = NavigationViewOptions::from_coordinates(
            Point::from_lng_lat(-77.0365, 38.8977),
            Point::from_lng_lat(-77.0200, 38.9050),
        );
        harness.view.start_navigation(&options).expect("map is ready");
        harness
    }
}
