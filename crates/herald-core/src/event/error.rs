//! # Herald Event System Errors
//!
//! Defines error types specific to the Herald event dispatcher.
//!
//! [`EventSystemError`] covers every failure a registration or trigger can
//! report. All of them are returned to the caller; batch operations stop at
//! the first one and keep whatever they registered before it.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventSystemError {
    #[error("Event '{event_name}' already exists")]
    EventExists { event_name: String },

    #[error("Event '{event_name}' does not exist")]
    EventNotExist {
        event_name: String,
    },

    #[error("Listener '{listener_name}' already exists")]
    ListenerExists {
        listener_name: String,
    },

    #[error("Listener '{listener_name}' does not exist")]
    ListenerNotExist {
        listener_name: String,
    },

    #[error("Attempted to operate on a poisoned event dispatcher component: {component}")]
    DispatcherPoisoned {
        component: String,
    },
}

/// Result type for dispatcher operations
pub type Result<T> = std::result::Result<T, EventSystemError>;
