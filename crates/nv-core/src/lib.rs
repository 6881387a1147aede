//! Core functionality for the navigation view
//!
//! This crate provides the reactive building blocks (observable fields,
//! lifecycle registry), the domain model and the view-model capability traits
//! the navigation view is wired against.

pub mod error;
pub mod lifecycle;
pub mod model;
pub mod observable;
pub mod options;
pub mod viewmodel;

// Re-export commonly used types
pub use error::{NavigationViewError, Result};
pub use lifecycle::{
    LifecycleEvent, LifecycleObserver, LifecycleRegistry, LifecycleState, ObserverId,
    SessionHandle,
};
pub use model::{
    InstructionModel, Location, LocationEngineHandle, LocationEngineKind, Point, Route, RouteLeg,
    SummaryModel,
};
pub use observable::{ListenerGuard, ListenerId, ObservableField};
pub use options::{LaunchData, NavigationOptions, NavigationViewOptions};
pub use viewmodel::{LocationViewModel, NavigationViewModel, RouteViewModel, ViewModels};
