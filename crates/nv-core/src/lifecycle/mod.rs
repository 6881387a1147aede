//! Host lifecycle and the explicit session handle
//!
//! The host owns a [`LifecycleRegistry`] and hands it to the view as an
//! `Arc<dyn SessionHandle>`. Components register [`LifecycleObserver`]s with
//! it instead of probing the host for lifecycle capabilities.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lifecycle transitions delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
}

/// Lifecycle state of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Destroyed,
    Initialized,
    Created,
    Started,
    Resumed,
}

impl LifecycleEvent {
    /// State reached once this event has been handled
    pub fn target_state(self) -> LifecycleState {
        match self {
            LifecycleEvent::Create | LifecycleEvent::Stop => LifecycleState::Created,
            LifecycleEvent::Start | LifecycleEvent::Pause => LifecycleState::Started,
            LifecycleEvent::Resume => LifecycleState::Resumed,
            LifecycleEvent::Destroy => LifecycleState::Destroyed,
        }
    }

    /// Events that move the host towards destruction are delivered in reverse
    /// registration order
    pub fn is_teardown(self) -> bool {
        matches!(self, LifecycleEvent::Pause | LifecycleEvent::Stop | LifecycleEvent::Destroy)
    }

    /// Events needed to bring a late observer up to `state`
    fn catch_up(state: LifecycleState) -> &'static [LifecycleEvent] {
        match state {
            LifecycleState::Destroyed | LifecycleState::Initialized => &[],
            LifecycleState::Created => &[LifecycleEvent::Create],
            LifecycleState::Started => &[LifecycleEvent::Create, LifecycleEvent::Start],
            LifecycleState::Resumed => &[
                LifecycleEvent::Create,
                LifecycleEvent::Start,
                LifecycleEvent::Resume,
            ],
        }
    }
}

/// Anything that needs to follow the host lifecycle
pub trait LifecycleObserver: Send + Sync {
    fn on_lifecycle_event(&self, event: LifecycleEvent);
}

/// Identifier returned on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Register/unregister hooks the host exposes to the navigation view
pub trait SessionHandle: Send + Sync {
    /// Attach an observer. It is brought up to the current state immediately.
    fn register(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId;

    /// Detach an observer. Returns `false` when the id was unknown.
    fn unregister(&self, id: ObserverId) -> bool;

    /// Current host state
    fn state(&self) -> LifecycleState;
}

/// Default [`SessionHandle`] implementation driven by the host
pub struct LifecycleRegistry {
    state: RwLock<LifecycleState>,
    observers: RwLock<IndexMap<ObserverId, Arc<dyn LifecycleObserver>>>,
    next_id: AtomicU64,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LifecycleState::Initialized),
            observers: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Move the host to the next state and notify every observer.
    ///
    /// `Destroy` releases all observers once they have been notified.
    pub fn handle_event(&self, event: LifecycleEvent) {
        if *self.state.read() == LifecycleState::Destroyed {
            tracing::warn!(?event, "lifecycle event after destroy ignored");
            return;
        }
        *self.state.write() = event.target_state();

        let mut observers: Vec<Arc<dyn LifecycleObserver>> =
            self.observers.read().values().cloned().collect();
        if event.is_teardown() {
            observers.reverse();
        }
        tracing::debug!(?event, observers = observers.len(), "dispatching lifecycle event");

        for observer in observers {
            observer.on_lifecycle_event(event);
        }

        if event == LifecycleEvent::Destroy {
            self.observers.write().clear();
        }
    }
}

impl Default for LifecycleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle for LifecycleRegistry {
    fn register(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let state = *self.state.read();
        if state == LifecycleState::Destroyed {
            tracing::warn!(?id, "observer registered after destroy is never notified");
            return id;
        }

        self.observers.write().insert(id, observer.clone());
        for event in LifecycleEvent::catch_up(state) {
            observer.on_lifecycle_event(*event);
        }
        id
    }

    fn unregister(&self, id: ObserverId) -> bool {
        let removed = self.observers.write().shift_remove(&id).is_some();
        if !removed {
            tracing::debug!(?id, "unregister of unknown lifecycle observer");
        }
        removed
    }

    fn state(&self) -> LifecycleState {
        *self.state.read()
    }
}
