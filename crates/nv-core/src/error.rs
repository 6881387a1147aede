//! Error type shared by the navigation view crates

use thiserror::Error;

/// Errors raised while setting up or driving the navigation view.
///
/// Event delivery never fails: invalid values on observable fields are
/// dropped, not reported. Everything here is a setup or persistence problem.
#[derive(Error, Debug)]
pub enum NavigationViewError {
    #[error("host does not provide a required capability: {0}")]
    MissingCapability(&'static str),

    #[error("navigation view is not ready: {0}")]
    NotReady(&'static str),

    #[error("view-model subscriptions are already established")]
    AlreadySubscribed,

    #[error("invalid saved state: {0}")]
    InvalidState(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NavigationViewError>;
