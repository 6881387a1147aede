//! Drop-in navigation view
//!
//! This crate composes the map surface, instruction panel, summary sheet and
//! camera behind a [`NavigationView`], and keeps them in step with the
//! location, route and navigation view-models through a
//! [`SubscriptionGroup`].

pub mod bound;
pub mod collaborators;
pub mod config;
pub mod contract;
pub mod listener;
pub mod presenter;
pub mod state;
pub mod subscriptions;
pub mod theme;
pub mod view;
pub mod widgets;

#[cfg(test)]
mod test_support;

/// Re-export commonly used types
pub use bound::BoundViews;
pub use collaborators::{
    InstructionPanel, LocationLayer, MapEngine, MapSurface, NavigationCamera, RouteLayer,
    SummarySheet, ViewComponents,
};
pub use config::NavigationViewConfig;
pub use contract::NavigationContract;
pub use listener::{NavigationViewListener, RouteListener};
pub use presenter::NavigationPresenter;
pub use state::{SavedViewState, StateBundle};
pub use subscriptions::{Binding, SubscriptionGroup};
pub use theme::{NightMode, Theme};
pub use view::{NavigationView, NavigationViewBuilder};
pub use widgets::{BottomSheetState, RecenterButton, SummaryBehavior};
