use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{DispatcherConfig, MAX_INITIAL_CAPACITY};
use crate::event::error::{EventSystemError, Result};
use crate::event::sorter::{PriorityEntry, PrioritySorter};
use crate::event::{Event, Listener, Priority, Subscription};

//--------------------------------------------------
// Dispatcher
//--------------------------------------------------

/// Cached dispatch order for one event
#[derive(Debug, Clone, Default)]
enum SortedOrder {
    /// The priority table changed since the order was last computed
    #[default]
    Stale,
    /// Current order; may be empty when nobody is subscribed
    Ready(Arc<[String]>),
}

/// A listener instance together with the subscriptions it declared when added
struct RegisteredListener<L: ?Sized> {
    instance: Arc<L>,
    subscriptions: Vec<Subscription>,
}

/// Synchronous publish/subscribe dispatcher.
///
/// Events are registered by name with a callback; listeners subscribe to
/// event names with a priority. [`Dispatcher::trigger`] calls the event's
/// callback once per subscribed listener, highest priority first, on the
/// caller's thread. The sorted order is computed lazily and cached per event
/// until a listener subscribed to that event is added or deleted.
///
/// There is no internal locking. Wrap it in a [`SharedDispatcher`] to use it
/// from several threads.
pub struct Dispatcher<L: ?Sized, A: ?Sized> {
    config: DispatcherConfig,
    sorter: PrioritySorter,
    events: HashMap<String, Event<L, A>>,
    listeners: HashMap<String, RegisteredListener<L>>,
    // {event_name: {listener_name: priority}}
    priorities: HashMap<String, HashMap<String, PriorityEntry>>,
    sorted: HashMap<String, SortedOrder>,
    next_sequence: u64,
}

// Manual Debug implementation, listeners and callbacks are not Debug
impl<L: ?Sized, A: ?Sized> fmt::Debug for Dispatcher<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .sorted
            .values()
            .filter(|order| matches!(order, SortedOrder::Ready(_)))
            .count();
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("events_count", &self.events.len())
            .field("listeners_count", &self.listeners.len())
            .field("cached_orders", &cached)
            .finish()
    }
}

impl<L: Listener + ?Sized, A: ?Sized> Dispatcher<L, A> {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Capacities above [`MAX_INITIAL_CAPACITY`] are treated as that maximum.
    pub fn with_config(config: DispatcherConfig) -> Self {
        let event_capacity = config.event_capacity.min(MAX_INITIAL_CAPACITY);
        let listener_capacity = config.listener_capacity.min(MAX_INITIAL_CAPACITY);
        Self {
            sorter: PrioritySorter::new(config.tie_break),
            events: HashMap::with_capacity(event_capacity),
            listeners: HashMap::with_capacity(listener_capacity),
            priorities: HashMap::with_capacity(event_capacity),
            sorted: HashMap::with_capacity(event_capacity),
            next_sequence: 0,
            config,
        }
    }

    /// Build a dispatcher from a JSON, YAML or TOML configuration file
    pub fn from_config_path(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let config = DispatcherConfig::load(path)?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register an event.
    ///
    /// Fails with [`EventSystemError::EventExists`] if the name is taken.
    pub fn add_event(&mut self, event: Event<L, A>) -> Result<()> {
        if self.events.contains_key(event.name()) {
            log::warn!("Rejected duplicate event '{}'", event.name());
            return Err(EventSystemError::EventExists {
                event_name: event.name().to_string(),
            });
        }
        log::debug!("Registered event '{}'", event.name());
        self.events.insert(event.name().to_string(), event);
        Ok(())
    }

    /// Register events in order, stopping at the first name collision.
    ///
    /// Events registered before the collision stay registered.
    pub fn add_events<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = Event<L, A>>,
    {
        for event in events {
            self.add_event(event)?;
        }
        Ok(())
    }

    /// Register a listener and its subscriptions.
    ///
    /// Every event the listener subscribes to gets its cached order dropped.
    /// A repeated subscription to the same event keeps the last priority.
    pub fn add_listener(&mut self, listener: Arc<L>) -> Result<()> {
        let listener_name = listener.name().to_string();
        if self.listeners.contains_key(&listener_name) {
            log::warn!("Rejected duplicate listener '{}'", listener_name);
            return Err(EventSystemError::ListenerExists { listener_name });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let subscriptions = listener.subscriptions();
        for subscription in &subscriptions {
            self.priorities
                .entry(subscription.event.clone())
                .or_default()
                .insert(
                    listener_name.clone(),
                    PriorityEntry {
                        priority: subscription.priority,
                        sequence,
                    },
                );
            self.invalidate(&subscription.event);
        }

        log::debug!(
            "Registered listener '{}' with {} subscription(s)",
            listener_name,
            subscriptions.len()
        );
        self.listeners.insert(
            listener_name,
            RegisteredListener {
                instance: listener,
                subscriptions,
            },
        );
        Ok(())
    }

    /// Register listeners in order, stopping at the first name collision.
    ///
    /// Listeners registered before the collision stay registered.
    pub fn add_listeners<I>(&mut self, listeners: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<L>>,
    {
        for listener in listeners {
            self.add_listener(listener)?;
        }
        Ok(())
    }

    /// Remove a listener by the name it was registered under.
    ///
    /// Returns the listener instance. Events are left registered.
    pub fn del_listener(&mut self, name: &str) -> Result<Arc<L>> {
        let Some(registered) = self.listeners.remove(name) else {
            return Err(EventSystemError::ListenerNotExist {
                listener_name: name.to_string(),
            });
        };

        for subscription in &registered.subscriptions {
            if let Some(table) = self.priorities.get_mut(&subscription.event) {
                table.remove(name);
                if table.is_empty() {
                    self.priorities.remove(&subscription.event);
                }
            }
            // Nothing left to order for an unregistered event
            if !self.priorities.contains_key(&subscription.event)
                && !self.events.contains_key(&subscription.event)
            {
                self.sorted.remove(&subscription.event);
            } else {
                self.invalidate(&subscription.event);
            }
        }

        log::debug!("Deleted listener '{}'", name);
        Ok(registered.instance)
    }

    /// Fire an event, invoking its callback for every subscribed listener in
    /// priority order.
    ///
    /// Returns the number of listeners invoked. Fails with
    /// [`EventSystemError::EventNotExist`] without calling anything when the
    /// event is not registered.
    pub fn trigger(&mut self, event_name: &str, args: &A) -> Result<usize> {
        let Some(event) = self.events.get(event_name) else {
            return Err(EventSystemError::EventNotExist {
                event_name: event_name.to_string(),
            });
        };
        let order = resolve_order(&mut self.sorted, &self.priorities, &self.sorter, event_name);

        log::trace!("Triggering '{}' for {} listener(s)", event_name, order.len());
        let mut invoked = 0;
        for listener_name in order.iter() {
            match self.listeners.get(listener_name) {
                Some(registered) => {
                    event.call(&registered.instance, args);
                    invoked += 1;
                }
                None => log::warn!(
                    "Skipping listener '{}' for event '{}': not registered",
                    listener_name,
                    event_name
                ),
            }
        }
        Ok(invoked)
    }

    /// The order `trigger` would call listeners in for this event
    pub fn sorted_listeners(&mut self, event_name: &str) -> Result<Vec<String>> {
        if !self.events.contains_key(event_name) {
            return Err(EventSystemError::EventNotExist {
                event_name: event_name.to_string(),
            });
        }
        let order = resolve_order(&mut self.sorted, &self.priorities, &self.sorter, event_name);
        Ok(order.to_vec())
    }

    /// Whether the dispatch order for an event is currently cached
    pub fn is_cached(&self, event_name: &str) -> bool {
        matches!(self.sorted.get(event_name), Some(SortedOrder::Ready(_)))
    }

    pub fn has_event(&self, event_name: &str) -> bool {
        self.events.contains_key(event_name)
    }

    pub fn has_listener(&self, listener_name: &str) -> bool {
        self.listeners.contains_key(listener_name)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registered event names, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn listener(&self, listener_name: &str) -> Option<&Arc<L>> {
        self.listeners.get(listener_name).map(|registered| &registered.instance)
    }

    /// Priority a listener holds for an event, if it is subscribed
    pub fn priority_of(&self, event_name: &str, listener_name: &str) -> Option<Priority> {
        self.priorities
            .get(event_name)
            .and_then(|table| table.get(listener_name))
            .map(|entry| entry.priority)
    }

    /// Number of events with a cache entry, stale or ready
    #[cfg(test)]
    pub(crate) fn tracked_orders(&self) -> usize {
        self.sorted.len()
    }

    fn invalidate(&mut self, event_name: &str) {
        self.sorted.insert(event_name.to_string(), SortedOrder::Stale);
    }
}

impl<L: Listener + ?Sized, A: ?Sized> Default for Dispatcher<L, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the cached order for an event, sorting its priority table on a miss
fn resolve_order(
    sorted: &mut HashMap<String, SortedOrder>,
    priorities: &HashMap<String, HashMap<String, PriorityEntry>>,
    sorter: &PrioritySorter,
    event_name: &str,
) -> Arc<[String]> {
    if let Some(SortedOrder::Ready(order)) = sorted.get(event_name) {
        log::trace!("Cache hit for '{}'", event_name);
        return Arc::clone(order);
    }

    let order: Arc<[String]> = match priorities.get(event_name) {
        Some(table) => sorter.sort(table).into(),
        None => Arc::from(Vec::new()),
    };
    log::trace!("Rebuilt order for '{}': {:?}", event_name, order);
    sorted.insert(event_name.to_string(), SortedOrder::Ready(Arc::clone(&order)));
    order
}

//--------------------------------------------------
// SharedDispatcher (thread-safe wrapper)
//--------------------------------------------------

/// Thread-safe shared dispatcher.
///
/// One mutex guards every registry and the order cache, so a trigger always
/// sees a consistent priority table. Callbacks run with the lock held and
/// must not call back into the same `SharedDispatcher`.
pub struct SharedDispatcher<L: ?Sized, A: ?Sized> {
    dispatcher: Arc<Mutex<Dispatcher<L, A>>>,
}

impl<L: ?Sized, A: ?Sized> Clone for SharedDispatcher<L, A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<L: ?Sized, A: ?Sized> fmt::Debug for SharedDispatcher<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDispatcher").finish_non_exhaustive()
    }
}

impl<L: Listener + ?Sized, A: ?Sized> SharedDispatcher<L, A> {
    pub fn new() -> Self {
        Self::from(Dispatcher::<L, A>::new())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::from(Dispatcher::<L, A>::with_config(config))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dispatcher<L, A>>> {
        self.dispatcher
            .lock()
            .map_err(|_| EventSystemError::DispatcherPoisoned {
                component: "dispatcher".to_string(),
            })
    }

    pub fn add_event(&self, event: Event<L, A>) -> Result<()> {
        self.lock()?.add_event(event)
    }

    pub fn add_events<I>(&self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = Event<L, A>>,
    {
        self.lock()?.add_events(events)
    }

    pub fn add_listener(&self, listener: Arc<L>) -> Result<()> {
        self.lock()?.add_listener(listener)
    }

    pub fn add_listeners<I>(&self, listeners: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<L>>,
    {
        self.lock()?.add_listeners(listeners)
    }

    pub fn del_listener(&self, name: &str) -> Result<Arc<L>> {
        self.lock()?.del_listener(name)
    }

    pub fn trigger(&self, event_name: &str, args: &A) -> Result<usize> {
        self.lock()?.trigger(event_name, args)
    }

    pub fn sorted_listeners(&self, event_name: &str) -> Result<Vec<String>> {
        self.lock()?.sorted_listeners(event_name)
    }

    pub fn is_cached(&self, event_name: &str) -> Result<bool> {
        Ok(self.lock()?.is_cached(event_name))
    }

    pub fn has_event(&self, event_name: &str) -> Result<bool> {
        Ok(self.lock()?.has_event(event_name))
    }

    pub fn has_listener(&self, listener_name: &str) -> Result<bool> {
        Ok(self.lock()?.has_listener(listener_name))
    }

    pub fn event_count(&self) -> Result<usize> {
        Ok(self.lock()?.event_count())
    }

    pub fn listener_count(&self) -> Result<usize> {
        Ok(self.lock()?.listener_count())
    }

    pub fn event_names(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.event_names())
    }

    pub fn listener(&self, listener_name: &str) -> Result<Option<Arc<L>>> {
        Ok(self.lock()?.listener(listener_name).cloned())
    }

    pub fn priority_of(&self, event_name: &str, listener_name: &str) -> Result<Option<Priority>> {
        Ok(self.lock()?.priority_of(event_name, listener_name))
    }

    pub fn config(&self) -> Result<DispatcherConfig> {
        Ok(self.lock()?.config().clone())
    }
}

impl<L: Listener + ?Sized, A: ?Sized> Default for SharedDispatcher<L, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized, A: ?Sized> From<Dispatcher<L, A>> for SharedDispatcher<L, A> {
    fn from(dispatcher: Dispatcher<L, A>) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }
}
