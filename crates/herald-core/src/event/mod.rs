pub mod dispatcher;
pub mod error;
pub mod sorter;

use std::fmt;

/// Listener priority for a single event. Larger values are dispatched earlier.
pub type Priority = i32;

/// Priority used when a subscription does not name one
pub const DEFAULT_PRIORITY: Priority = 0;

/// A listener's interest in one event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    /// Name of the subscribed event
    pub event: String,
    /// Dispatch priority for this event
    pub priority: Priority,
}

impl Subscription {
    /// Subscribe to `event` with [`DEFAULT_PRIORITY`]
    pub fn new(event: impl Into<String>) -> Self {
        Self::with_priority(event, DEFAULT_PRIORITY)
    }

    /// Subscribe to `event` with an explicit priority
    pub fn with_priority(event: impl Into<String>, priority: Priority) -> Self {
        Self {
            event: event.into(),
            priority,
        }
    }
}

/// Anything that can be registered with a [`Dispatcher`].
///
/// The name must be unique among the listeners of one dispatcher. The
/// subscriptions are read once, when the listener is added; the dispatcher
/// keeps that snapshot until the listener is deleted. Subscribing to an event
/// that is not registered is allowed.
pub trait Listener {
    /// Unique listener name
    fn name(&self) -> &str;

    /// Ordered list of events this listener wants, with priorities
    fn subscriptions(&self) -> Vec<Subscription>;
}

/// Callback invoked once per subscribed listener each time an event fires
pub type EventCallback<L, A> = Box<dyn Fn(&L, &A) + Send + Sync>;

/// A named event and the callback that delivers it to a listener.
///
/// The callback is typed against the dispatcher's listener type `L` and
/// argument type `A`, so it can call straight into the listener's own
/// methods. `L` may be a trait object (`dyn MyListener`) when listeners of
/// different concrete types share a dispatcher.
pub struct Event<L: ?Sized, A: ?Sized> {
    name: String,
    call: EventCallback<L, A>,
}

impl<L: ?Sized, A: ?Sized> Event<L, A> {
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&L, &A) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            call: Box::new(call),
        }
    }

    /// Get the name of this event
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, listener: &L, args: &A) {
        (self.call)(listener, args)
    }
}

impl<L: ?Sized, A: ?Sized> fmt::Debug for Event<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Re-export important types
pub use dispatcher::{Dispatcher, SharedDispatcher};
pub use error::EventSystemError;
pub use sorter::{PriorityEntry, PrioritySorter, TieBreak};
