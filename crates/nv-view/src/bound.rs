//! Widgets bound to the navigation view and the state they share
//!
//! [`BoundViews`] is the object the presenter talks to (it implements
//! [`NavigationContract`]) and the one the subscription handlers drive.

use crate::collaborators::{LocationLayer, MapEngine, NavigationCamera, RouteLayer, ViewComponents};
use crate::config::NavigationViewConfig;
use crate::contract::NavigationContract;
use crate::listener::{NavigationViewListener, RouteListener};
use crate::presenter::NavigationPresenter;
use crate::widgets::{BottomSheetState, RecenterButton, SummaryBehavior};
use nv_core::{LifecycleEvent, LifecycleObserver, Location, Point, Route};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Map-side components created once the map engine is ready
#[derive(Clone)]
pub(crate) struct MapLayers {
    pub engine: Arc<dyn MapEngine>,
    pub route_layer: Arc<dyn RouteLayer>,
    pub location_layer: Arc<dyn LocationLayer>,
    pub camera: Option<Arc<dyn NavigationCamera>>,
}

pub struct BoundViews {
    components: ViewComponents,
    config: NavigationViewConfig,
    summary_behavior: RwLock<SummaryBehavior>,
    recenter_btn: RwLock<RecenterButton>,
    map: RwLock<Option<MapLayers>>,
    presenter: RwLock<Weak<NavigationPresenter>>,
    navigation_listener: RwLock<Option<Arc<dyn NavigationViewListener>>>,
    route_listener: RwLock<Option<Arc<dyn RouteListener>>>,
    /// Set when the view was recreated from saved state
    resume_state: AtomicBool,
}

impl BoundViews {
    pub(crate) fn new(components: ViewComponents, config: NavigationViewConfig) -> Self {
        Self {
            components,
            config,
            summary_behavior: RwLock::new(SummaryBehavior::default()),
            recenter_btn: RwLock::new(RecenterButton::default()),
            map: RwLock::new(None),
            presenter: RwLock::new(Weak::new()),
            navigation_listener: RwLock::new(None),
            route_listener: RwLock::new(None),
            resume_state: AtomicBool::new(false),
        }
    }

    pub fn components(&self) -> &ViewComponents {
        &self.components
    }

    pub fn config(&self) -> &NavigationViewConfig {
        &self.config
    }

    pub fn summary_state(&self) -> BottomSheetState {
        self.summary_behavior.read().state()
    }

    pub fn is_summary_hideable(&self) -> bool {
        self.summary_behavior.read().is_hideable()
    }

    pub fn is_recenter_btn_visible(&self) -> bool {
        self.recenter_btn.read().is_visible()
    }

    pub fn is_resume_state(&self) -> bool {
        self.resume_state.load(Ordering::Acquire)
    }

    pub(crate) fn set_resume_state(&self, resume: bool) {
        self.resume_state.store(resume, Ordering::Release);
    }

    pub(crate) fn set_recenter_btn_visible(&self, visible: bool) {
        self.recenter_btn.write().set_visible(visible);
    }

    pub(crate) fn set_presenter(&self, presenter: &Arc<NavigationPresenter>) {
        *self.presenter.write() = Arc::downgrade(presenter);
    }

    pub(crate) fn set_map(&self, layers: MapLayers) {
        *self.map.write() = Some(layers);
    }

    pub(crate) fn map(&self) -> Option<MapLayers> {
        self.map.read().clone()
    }

    pub(crate) fn set_camera(&self, camera: Arc<dyn NavigationCamera>) -> bool {
        match self.map.write().as_mut() {
            Some(layers) => {
                layers.camera = Some(camera);
                true
            }
            None => false,
        }
    }

    fn camera(&self) -> Option<Arc<dyn NavigationCamera>> {
        self.map.read().as_ref().and_then(|layers| layers.camera.clone())
    }

    pub(crate) fn set_navigation_listener(&self, listener: Arc<dyn NavigationViewListener>) {
        *self.navigation_listener.write() = Some(listener);
    }

    pub(crate) fn navigation_listener(&self) -> Option<Arc<dyn NavigationViewListener>> {
        self.navigation_listener.read().clone()
    }

    pub(crate) fn set_route_listener(&self, listener: Option<Arc<dyn RouteListener>>) {
        *self.route_listener.write() = listener;
    }

    pub(crate) fn route_listener(&self) -> Option<Arc<dyn RouteListener>> {
        self.route_listener.read().clone()
    }

    /// Frame a freshly drawn route, unless the view is being restored
    pub fn start_camera(&self, route: &Route) {
        if self.is_resume_state() {
            trace!("restoring from saved state, camera start skipped");
            return;
        }
        match self.camera() {
            Some(camera) => camera.start(route),
            None => debug!("no camera yet, start skipped"),
        }
    }

    /// Resume following after a restore, once, unless the user panned away
    pub fn resume_camera(&self, location: &Location) {
        if !self.is_resume_state() || self.is_recenter_btn_visible() {
            return;
        }
        if let Some(camera) = self.camera() {
            camera.resume(location);
            self.set_resume_state(false);
        }
    }

    pub(crate) fn force_location_update(&self, location: &Location) {
        if let Some(layers) = self.map() {
            layers.location_layer.force_location_update(location);
        }
    }

    pub(crate) fn notify_navigation_finished(&self) {
        match self.navigation_listener() {
            Some(listener) => listener.on_navigation_finished(),
            None => debug!("navigation finished without a registered listener"),
        }
    }

    /// Restore the sheet: an expanded sheet is not hideable, anything else is
    pub(crate) fn reset_bottom_sheet_state(&self, state: BottomSheetState) {
        self.set_summary_behavior_hideable(state != BottomSheetState::Expanded);
        self.set_summary_behavior_state(state);
    }

    fn on_summary_hidden(&self) {
        let presenter = self.presenter.read().upgrade();
        if let Some(presenter) = presenter {
            presenter.on_summary_bottom_sheet_hidden();
        }
    }
}

impl NavigationContract for BoundViews {
    fn set_summary_behavior_state(&self, state: BottomSheetState) {
        let became_hidden = self.summary_behavior.write().set_state(state);
        if became_hidden {
            self.on_summary_hidden();
        }
    }

    fn set_summary_behavior_hideable(&self, hideable: bool) {
        self.summary_behavior.write().set_hideable(hideable);
    }

    fn set_camera_tracking_enabled(&self, enabled: bool) {
        if let Some(camera) = self.camera() {
            camera.set_tracking_location(enabled);
        }
    }

    fn reset_camera_position(&self) {
        if let Some(camera) = self.camera() {
            camera.reset_position();
        }
    }

    fn show_recenter_btn(&self) {
        if self.summary_state() == BottomSheetState::Hidden {
            self.recenter_btn.write().show();
        }
    }

    fn hide_recenter_btn(&self) {
        self.recenter_btn.write().hide();
    }

    fn draw_route(&self, route: &Route) {
        if let Some(layers) = self.map() {
            layers.route_layer.add_route(route);
        }
    }

    fn add_marker(&self, position: Point) {
        if let Some(layers) = self.map() {
            layers.engine.add_marker(position, &self.config.theme.marker_icon);
        }
    }

    fn finish_navigation_view(&self) {
        self.notify_navigation_finished();
    }
}

/// Forwards the host lifecycle to the map surface
impl LifecycleObserver for BoundViews {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        let map = &self.components.map_surface;
        match event {
            // Creation is driven by `NavigationView::on_create` with the saved state
            LifecycleEvent::Create => {}
            LifecycleEvent::Start => map.on_start(),
            LifecycleEvent::Resume => map.on_resume(),
            LifecycleEvent::Pause => map.on_pause(),
            LifecycleEvent::Stop => map.on_stop(),
            LifecycleEvent::Destroy => map.on_destroy(),
        }
    }
}
