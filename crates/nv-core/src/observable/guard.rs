//! Listener registration handles

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Identifier of a listener within one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Implemented by field internals so a guard can detach without knowing `T`
pub(crate) trait DetachListener: Send + Sync {
    fn detach(&self, id: ListenerId);
}

/// Keeps a listener attached to its field.
///
/// Dropping the guard (or calling [`ListenerGuard::detach`]) removes the
/// listener. The listener is deactivated before it is removed, so a publish
/// that is already delivering will skip it.
#[must_use = "dropping the guard detaches the listener immediately"]
pub struct ListenerGuard {
    id: ListenerId,
    field_name: &'static str,
    active: Arc<AtomicBool>,
    field: Weak<dyn DetachListener>,
}

impl ListenerGuard {
    pub(crate) fn new(
        id: ListenerId,
        field_name: &'static str,
        active: Arc<AtomicBool>,
        field: Weak<dyn DetachListener>,
    ) -> Self {
        Self { id, field_name, active, field }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Name of the field this guard is attached to
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Whether the listener can still be invoked
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Detach now. Equivalent to dropping the guard.
    pub fn detach(self) {}
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(field) = self.field.upgrade() {
            field.detach(self.id);
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("field", &self.field_name)
            .field("active", &self.is_active())
            .finish()
    }
}
