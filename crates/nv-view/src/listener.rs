//! Delegates registered by the embedding application

use nv_core::{Location, Route};

/// Host callbacks for the view as a whole
pub trait NavigationViewListener: Send + Sync {
    /// Map, layers and presenter are set up; `start_navigation` may be called
    fn on_navigation_ready(&self);

    /// The session ended, by cancel or by arrival
    fn on_navigation_finished(&self);
}

/// Optional policy object for rerouting
pub trait RouteListener: Send + Sync {
    /// A new route was published. `None` marks the end of a reroute cycle
    /// that produced no route.
    fn on_reroute_along(&self, route: Option<&Route>);

    /// A location update was accepted for rerouting decisions
    fn on_reroute_from(&self, location: &Location);

    /// Whether updates from `location` may drive rerouting
    fn allow_reroute_from(&self, location: Option<&Location>) -> bool;
}
