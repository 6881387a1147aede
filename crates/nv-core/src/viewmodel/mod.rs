//! Capability sets of the view-models the navigation view observes
//!
//! View-models own their observable fields and do the long-running work
//! (route fetches, location engine acquisition). Results come back through the
//! fields; the view never waits on them.

use crate::lifecycle::LifecycleObserver;
use crate::model::{
    InstructionModel, Location, LocationEngineHandle, Point, Route, SummaryModel,
};
use crate::observable::ObservableField;
use crate::options::{NavigationOptions, NavigationViewOptions};
use std::sync::Arc;

/// Raw device location and the engine producing it
pub trait LocationViewModel: LifecycleObserver {
    fn raw_location(&self) -> &ObservableField<Location>;

    fn location_engine(&self) -> &ObservableField<LocationEngineHandle>;

    /// Hand the active route to the location layer (used for route replay)
    fn update_route(&self, route: &Route);
}

/// Route fetching and the current destination
pub trait RouteViewModel: Send + Sync {
    fn route(&self) -> &ObservableField<Route>;

    fn destination(&self) -> &ObservableField<Point>;

    fn update_raw_location(&self, location: &Location);

    /// Request a fresh route starting at `origin`
    fn fetch_route_new_origin(&self, origin: Point);

    /// Publish the route (or fetch one) from the launch options
    fn extract_launch_data(&self, options: &NavigationViewOptions);
}

/// The running navigation session
pub trait NavigationViewModel: LifecycleObserver {
    fn is_running(&self) -> &ObservableField<bool>;

    fn navigation_location(&self) -> &ObservableField<Location>;

    /// Set when the user went off-route and a new route is needed.
    /// The view consumes and clears it.
    fn new_origin(&self) -> &ObservableField<Point>;

    fn instruction_model(&self) -> &ObservableField<InstructionModel>;

    fn summary_model(&self) -> &ObservableField<SummaryModel>;

    fn initialize_navigation_options(&self, options: NavigationOptions);

    fn update_location_engine(&self, engine: &LocationEngineHandle);

    fn update_route(&self, route: &Route);
}

/// The three view-models a navigation view is built from
#[derive(Clone)]
pub struct ViewModels {
    pub location: Arc<dyn LocationViewModel>,
    pub route: Arc<dyn RouteViewModel>,
    pub navigation: Arc<dyn NavigationViewModel>,
}
