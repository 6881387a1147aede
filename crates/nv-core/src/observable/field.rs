//! Observable field implementation

use super::guard::{DetachListener, ListenerGuard, ListenerId};
use super::Listener;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Current value plus the number of times it has been published
struct Slot<T> {
    value: Option<T>,
    version: u64,
}

struct ListenerEntry<T> {
    id: ListenerId,
    active: Arc<AtomicBool>,
    listener: Listener<T>,
}

impl<T> Clone for ListenerEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            listener: self.listener.clone(),
        }
    }
}

/// Values waiting to be delivered while a publish is already running
struct DispatchQueue<T> {
    dispatching: bool,
    pending: VecDeque<Option<T>>,
}

struct FieldInner<T> {
    name: &'static str,
    slot: RwLock<Slot<T>>,
    listeners: RwLock<Vec<ListenerEntry<T>>>,
    queue: Mutex<DispatchQueue<T>>,
    next_id: AtomicU64,
}

impl<T: Send + Sync + 'static> DetachListener for FieldInner<T> {
    fn detach(&self, id: ListenerId) {
        let mut listeners = self.listeners.write();
        listeners.retain(|entry| entry.id != id);
        tracing::trace!(field = self.name, ?id, remaining = listeners.len(), "listener detached");
    }
}

/// A value holder that synchronously notifies its listeners on every publish.
///
/// Cloning the field yields another handle to the same value and listener set.
pub struct ObservableField<T> {
    inner: Arc<FieldInner<T>>,
}

impl<T> Clone for ObservableField<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> ObservableField<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty field that has never been published
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Arc::new(FieldInner {
                name,
                slot: RwLock::new(Slot { value: None, version: 0 }),
                listeners: RwLock::new(Vec::new()),
                queue: Mutex::new(DispatchQueue {
                    dispatching: false,
                    pending: VecDeque::new(),
                }),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create a field already holding `value`
    pub fn with_value(name: &'static str, value: T) -> Self {
        let field = Self::new(name);
        {
            let mut slot = field.inner.slot.write();
            slot.value = Some(value);
            slot.version = 1;
        }
        field
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current value, if any
    pub fn value(&self) -> Option<T> {
        self.inner.slot.read().value.clone()
    }

    /// Whether the field has been published at least once (even with an empty value)
    pub fn has_value(&self) -> bool {
        self.inner.slot.read().version > 0
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    /// Publish a new value and notify every active listener.
    ///
    /// A publish issued from inside a listener of this same field is queued
    /// and delivered once the current value reached all listeners.
    pub fn set_value(&self, value: Option<T>) {
        {
            let mut slot = self.inner.slot.write();
            slot.value = value.clone();
            slot.version += 1;
        }

        {
            let mut queue = self.inner.queue.lock();
            queue.pending.push_back(value);
            if queue.dispatching {
                tracing::trace!(field = self.inner.name, "publish queued behind running dispatch");
                return;
            }
            queue.dispatching = true;
        }

        loop {
            let next = {
                let mut queue = self.inner.queue.lock();
                match queue.pending.pop_front() {
                    Some(value) => value,
                    None => {
                        queue.dispatching = false;
                        break;
                    }
                }
            };
            self.dispatch(next.as_ref());
        }
    }

    /// Shorthand for publishing a non-empty value
    pub fn publish(&self, value: T) {
        self.set_value(Some(value));
    }

    /// Shorthand for clearing the field
    pub fn clear(&self) {
        self.set_value(None);
    }

    /// Attach a listener.
    ///
    /// If the field was published before, the current value is delivered to
    /// the new listener right away.
    pub fn observe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let active = Arc::new(AtomicBool::new(true));
        let listener: Listener<T> = Arc::new(listener);

        self.inner.listeners.write().push(ListenerEntry {
            id,
            active: active.clone(),
            listener: listener.clone(),
        });

        let weak_inner: Weak<FieldInner<T>> = Arc::downgrade(&self.inner);
        let detach: Weak<dyn DetachListener> = weak_inner;
        let guard = ListenerGuard::new(id, self.inner.name, active, detach);

        let replay = {
            let slot = self.inner.slot.read();
            (slot.version > 0).then(|| slot.value.clone())
        };
        if let Some(value) = replay {
            tracing::trace!(field = self.inner.name, ?id, "replaying current value to new listener");
            listener(value.as_ref());
        }

        guard
    }

    fn dispatch(&self, value: Option<&T>) {
        // Snapshot so listeners may attach, detach or publish without deadlocking
        let listeners: Vec<ListenerEntry<T>> = self.inner.listeners.read().clone();
        for entry in listeners {
            if entry.active.load(Ordering::Acquire) {
                (entry.listener)(value);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.read();
        f.debug_struct("ObservableField")
            .field("name", &self.inner.name)
            .field("value", &slot.value)
            .field("version", &slot.version)
            .field("listeners", &self.inner.listeners.read().len())
            .finish()
    }
}
