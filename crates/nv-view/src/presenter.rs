//! Presenter translating UI events into view operations

use crate::contract::NavigationContract;
use crate::widgets::BottomSheetState;
use nv_core::{Point, Route};
use std::sync::Arc;

/// Stateless command object between widgets and the view contract
pub struct NavigationPresenter {
    view: Arc<dyn NavigationContract>,
}

impl NavigationPresenter {
    pub fn new(view: Arc<dyn NavigationContract>) -> Self {
        Self { view }
    }

    pub fn on_route_update(&self, route: &Route) {
        self.view.draw_route(route);
    }

    pub fn on_destination_update(&self, destination: Point) {
        self.view.add_marker(destination);
    }

    /// The user panned the map: get out of the way and stop following
    pub fn on_map_scroll(&self) {
        self.view.set_summary_behavior_hideable(true);
        self.view.set_summary_behavior_state(BottomSheetState::Hidden);
        self.view.set_camera_tracking_enabled(false);
    }

    pub fn on_summary_bottom_sheet_hidden(&self) {
        self.view.show_recenter_btn();
    }

    pub fn on_recenter_click(&self) {
        self.view.set_summary_behavior_hideable(false);
        self.view.set_summary_behavior_state(BottomSheetState::Expanded);
        self.view.set_camera_tracking_enabled(true);
        self.view.reset_camera_position();
        self.view.hide_recenter_btn();
    }

    pub fn on_cancel_btn_click(&self) {
        self.view.finish_navigation_view();
    }
}
