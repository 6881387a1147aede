//! Observable value holders
//!
//! An [`ObservableField`] is written by exactly one owner (a view-model) and
//! read by any number of listeners. Publishing is synchronous: every active
//! listener sees the new value before `set_value` returns.

mod field;
mod guard;

pub use field::ObservableField;
pub use guard::{ListenerGuard, ListenerId};

use std::sync::Arc;

/// Callback invoked with the published value (`None` when the field was cleared)
pub type Listener<T> = Arc<dyn Fn(Option<&T>) + Send + Sync + 'static>;
