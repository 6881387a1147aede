//! The view interface the presenter talks to

use crate::widgets::BottomSheetState;
use nv_core::{Point, Route};

/// Operations the presenter may perform on the navigation view
pub trait NavigationContract: Send + Sync {
    fn set_summary_behavior_state(&self, state: BottomSheetState);

    fn set_summary_behavior_hideable(&self, hideable: bool);

    fn set_camera_tracking_enabled(&self, enabled: bool);

    fn reset_camera_position(&self);

    /// Only shows the button while the summary sheet is hidden
    fn show_recenter_btn(&self);

    fn hide_recenter_btn(&self);

    fn draw_route(&self, route: &Route);

    fn add_marker(&self, position: Point);

    fn finish_navigation_view(&self);
}
