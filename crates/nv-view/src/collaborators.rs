//! Map, camera and panel components the view drives
//!
//! These are implemented by the rendering engine and platform widgets. The
//! view only instantiates, observes and forwards to them.

use crate::state::StateBundle;
use nv_core::{InstructionModel, Location, Point, Route, SummaryModel};
use std::sync::Arc;

/// The map widget hosted by the view. Receives the host lifecycle.
pub trait MapSurface: Send + Sync {
    /// `restoring` is true when the host recreated the view from saved state
    fn on_create(&self, restoring: bool);
    fn on_start(&self);
    fn on_resume(&self);
    fn on_pause(&self);
    fn on_stop(&self);
    fn on_destroy(&self);
    fn on_low_memory(&self);

    /// Store the camera position and other map keys
    fn on_save_instance_state(&self, bundle: &mut StateBundle);

    /// Ask for the map engine. The host calls `NavigationView::on_map_ready`
    /// once it is available.
    fn request_map(&self);
}

/// The loaded map engine, available after the map is ready
pub trait MapEngine: Send + Sync {
    fn set_style(&self, style_url: &str);

    fn set_padding(&self, left: f64, top: f64, right: f64, bottom: f64);

    fn add_marker(&self, position: Point, icon: &str);

    /// Create the layer drawing the route line below `below_layer`
    fn create_route_layer(&self, route_style: &str, below_layer: &str) -> Arc<dyn RouteLayer>;

    /// Create the puck showing the current location in navigation mode
    fn create_location_layer(&self) -> Arc<dyn LocationLayer>;

    /// Create the camera following the navigation session
    fn create_camera(&self) -> Arc<dyn NavigationCamera>;

    /// Register the callback fired when the user pans the map
    fn set_on_scroll_listener(&self, listener: Box<dyn Fn() + Send + Sync>);
}

pub trait RouteLayer: Send + Sync {
    fn add_route(&self, route: &Route);
}

/// Location puck. Follows the host lifecycle to start and stop its sensors.
pub trait LocationLayer: nv_core::LifecycleObserver {
    fn force_location_update(&self, location: &Location);
}

pub trait NavigationCamera: Send + Sync {
    /// Initial framing of a freshly drawn route
    fn start(&self, route: &Route);

    /// Jump back to the last location after the view was recreated
    fn resume(&self, location: &Location);

    fn set_tracking_location(&self, enabled: bool);

    fn reset_position(&self);
}

/// Turn-by-turn banner
pub trait InstructionPanel: Send + Sync {
    fn update(&self, model: &InstructionModel);

    fn is_showing_instruction_list(&self) -> bool;

    fn hide_instruction_list(&self);
}

/// Content of the trip summary bottom sheet
pub trait SummarySheet: Send + Sync {
    fn update(&self, model: &SummaryModel);

    /// Height in pixels, used as bottom map padding
    fn height(&self) -> f64;
}

/// Widgets the host inflates before the view is built
#[derive(Clone)]
pub struct ViewComponents {
    pub map_surface: Arc<dyn MapSurface>,
    pub instruction_panel: Arc<dyn InstructionPanel>,
    pub summary_sheet: Arc<dyn SummarySheet>,
}
