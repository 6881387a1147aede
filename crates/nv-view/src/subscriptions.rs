//! View-model subscriptions
//!
//! For the lifetime of a navigation session the view keeps one listener on
//! each view-model field. The listeners filter invalid values and forward the
//! rest to the presenter, the map layers and the host listener. They are
//! registered together as a [`SubscriptionGroup`] and torn down together.

use crate::bound::BoundViews;
use crate::presenter::NavigationPresenter;
use nv_core::{
    InstructionModel, LifecycleEvent, LifecycleObserver, ListenerGuard, Location,
    LocationEngineHandle, ObservableField, Point, Route, SummaryModel, ViewModels,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// The named field bindings of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    RawLocation,
    LocationEngine,
    Route,
    Destination,
    IsRunning,
    NavigationLocation,
    NewOrigin,
    Instructions,
    Summary,
}

impl Binding {
    /// Every binding, in registration order
    pub const ALL: [Binding; 9] = [
        Binding::RawLocation,
        Binding::LocationEngine,
        Binding::Route,
        Binding::Destination,
        Binding::IsRunning,
        Binding::NavigationLocation,
        Binding::NewOrigin,
        Binding::Instructions,
        Binding::Summary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Binding::RawLocation => "raw_location",
            Binding::LocationEngine => "location_engine",
            Binding::Route => "route",
            Binding::Destination => "destination",
            Binding::IsRunning => "is_running",
            Binding::NavigationLocation => "navigation_location",
            Binding::NewOrigin => "new_origin",
            Binding::Instructions => "instructions",
            Binding::Summary => "summary",
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the handlers forward to
struct Propagation {
    live: AtomicBool,
    view_models: ViewModels,
    presenter: Arc<NavigationPresenter>,
    views: Arc<BoundViews>,
    last_running: Mutex<Option<bool>>,
}

impl Propagation {
    fn on_raw_location(&self, location: Option<&Location>) {
        match location {
            Some(location) => self.view_models.route.update_raw_location(location),
            None => trace!("empty raw location dropped"),
        }
    }

    fn on_location_engine(&self, engine: Option<&LocationEngineHandle>) {
        if let Some(engine) = engine {
            debug!(engine = %engine.id, kind = ?engine.kind, "location engine selected");
            self.view_models.navigation.update_location_engine(engine);
        }
    }

    fn on_route(&self, route: Option<&Route>) {
        // The delegate hears about every route, including a cleared one
        if let Some(listener) = self.views.route_listener() {
            listener.on_reroute_along(route);
        }

        let Some(route) = route else {
            trace!("route cleared");
            return;
        };
        self.view_models.navigation.update_route(route);
        self.view_models.location.update_route(route);
        self.presenter.on_route_update(route);
        self.views.start_camera(route);
    }

    fn on_destination(&self, destination: Option<&Point>) {
        if let Some(destination) = destination {
            self.presenter.on_destination_update(*destination);
        }
    }

    fn on_running(&self, running: Option<&bool>) {
        // Unset counts as a state of its own, so unset -> false finishes again
        let previous = std::mem::replace(&mut *self.last_running.lock(), running.copied());
        let Some(&running) = running else {
            return;
        };
        if !running && previous != Some(false) {
            info!("navigation session finished");
            self.views.notify_navigation_finished();
        }
    }

    fn on_navigation_location(&self, location: Option<&Location>) {
        let listener = self.views.route_listener();
        let allowed = listener
            .as_ref()
            .map_or(true, |listener| listener.allow_reroute_from(location));
        if !allowed {
            trace!("location update rejected by route listener");
            return;
        }

        let Some(location) = location else {
            return;
        };
        if location.is_sentinel() {
            trace!("sentinel (0, 0) location dropped");
            return;
        }

        if let Some(listener) = listener {
            listener.on_reroute_from(location);
        }
        self.views.force_location_update(location);
        self.views.resume_camera(location);
    }

    fn on_new_origin(&self, origin: Option<&Point>) {
        let Some(&origin) = origin else {
            return;
        };
        debug!(lng = origin.longitude, lat = origin.latitude, "fetching route from new origin");
        self.view_models.route.fetch_route_new_origin(origin);
        // Consume so a replay after recreation does not fetch again
        self.view_models.navigation.new_origin().clear();
    }

    fn on_instructions(&self, model: Option<&InstructionModel>) {
        if let Some(model) = model {
            self.views.components().instruction_panel.update(model);
        }
    }

    fn on_summary(&self, model: Option<&SummaryModel>) {
        if let Some(model) = model {
            self.views.components().summary_sheet.update(model);
        }
    }
}

/// The listeners of one session, attached and detached as a unit
pub struct SubscriptionGroup {
    id: Uuid,
    propagation: Arc<Propagation>,
    guards: Mutex<Vec<(Binding, ListenerGuard)>>,
}

impl SubscriptionGroup {
    /// Attach every binding. Fields that already hold a value replay it
    /// immediately.
    pub(crate) fn bind(
        view_models: ViewModels,
        presenter: Arc<NavigationPresenter>,
        views: Arc<BoundViews>,
    ) -> Self {
        let propagation = Arc::new(Propagation {
            live: AtomicBool::new(true),
            view_models: view_models.clone(),
            presenter,
            views,
            last_running: Mutex::new(None),
        });
        let group = Self {
            id: Uuid::new_v4(),
            propagation,
            guards: Mutex::new(Vec::with_capacity(Binding::ALL.len())),
        };

        let location = &view_models.location;
        let route = &view_models.route;
        let navigation = &view_models.navigation;

        group.attach(Binding::RawLocation, location.raw_location(), Propagation::on_raw_location);
        group.attach(Binding::LocationEngine, location.location_engine(), Propagation::on_location_engine);
        group.attach(Binding::Route, route.route(), Propagation::on_route);
        group.attach(Binding::Destination, route.destination(), Propagation::on_destination);
        group.attach(Binding::IsRunning, navigation.is_running(), Propagation::on_running);
        group.attach(
            Binding::NavigationLocation,
            navigation.navigation_location(),
            Propagation::on_navigation_location,
        );
        group.attach(Binding::NewOrigin, navigation.new_origin(), Propagation::on_new_origin);
        group.attach(Binding::Instructions, navigation.instruction_model(), Propagation::on_instructions);
        group.attach(Binding::Summary, navigation.summary_model(), Propagation::on_summary);

        debug!(group = %group.id, bindings = Binding::ALL.len(), "view-model subscriptions established");
        group
    }

    fn attach<T, F>(&self, binding: Binding, field: &ObservableField<T>, handler: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Propagation, Option<&T>) + Send + Sync + 'static,
    {
        let propagation = Arc::downgrade(&self.propagation);
        let guard = field.observe(move |value| {
            let Some(propagation) = propagation.upgrade() else {
                return;
            };
            if propagation.live.load(Ordering::Acquire) {
                handler(&propagation, value);
            }
        });
        self.guards.lock().push((binding, guard));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Bindings currently attached
    pub fn bindings(&self) -> Vec<Binding> {
        self.guards.lock().iter().map(|(binding, _)| *binding).collect()
    }

    pub fn is_active(&self) -> bool {
        self.propagation.live.load(Ordering::Acquire)
    }

    /// Detach every binding. No handler runs after this returns, including
    /// handlers of a publish that is still delivering.
    pub fn teardown(&self) {
        if !self.propagation.live.swap(false, Ordering::AcqRel) {
            return;
        }
        let guards = std::mem::take(&mut *self.guards.lock());
        let count = guards.len();
        drop(guards);
        debug!(group = %self.id, bindings = count, "view-model subscriptions torn down");
    }
}

impl LifecycleObserver for SubscriptionGroup {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        if event == LifecycleEvent::Destroy {
            self.teardown();
        }
    }
}

impl Drop for SubscriptionGroup {
    fn drop(&mut self) {
        self.teardown();
    }
}
