//! # Herald Core
//!
//! An in-process, synchronous publish/subscribe dispatcher. Events are
//! registered by name, listeners subscribe to them with a priority, and
//! triggering an event calls every subscriber in priority order on the
//! caller's thread.
//!
//! ```
//! use std::sync::Arc;
//! use herald_core::{Dispatcher, Event, Listener, Subscription};
//!
//! struct Greeter {
//!     name: String,
//!     priority: i32,
//! }
//!
//! impl Listener for Greeter {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!
//!     fn subscriptions(&self) -> Vec<Subscription> {
//!         vec![Subscription::with_priority("up", self.priority)]
//!     }
//! }
//!
//! let mut dispatcher: Dispatcher<Greeter, str> = Dispatcher::new();
//! dispatcher
//!     .add_event(Event::new("up", |greeter: &Greeter, say: &str| {
//!         println!("{} says {}", greeter.name, say);
//!     }))
//!     .unwrap();
//! dispatcher
//!     .add_listener(Arc::new(Greeter {
//!         name: "foo".into(),
//!         priority: 2,
//!     }))
//!     .unwrap();
//!
//! assert_eq!(dispatcher.trigger("up", "hello").unwrap(), 1);
//! ```
pub mod config;
pub mod error;
pub mod event;

pub use config::{ConfigFormat, DispatcherConfig};
pub use error::{Error, Result};
pub use event::{
    DEFAULT_PRIORITY, Dispatcher, Event, EventSystemError, Listener, Priority, SharedDispatcher,
    Subscription, TieBreak,
};
