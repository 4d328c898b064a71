//! # Event Emitter
//!
//! A strongly-typed, synchronous publish/subscribe utility.
//!
//! ## Overview
//!
//! [`EventEmitter`] maps event names to ordered listener lists. Listeners
//! are registered per event, invoked in registration order on every emit,
//! removed individually, per event or all at once, and can be one-shot.
//!
//! ## Features
//!
//! * **Type-Safe**: Each [`Event`] marker binds a name to a payload type; the
//!   typed API rejects mismatched listeners and payloads at compile time.
//! * **Dynamic names**: The `*_named` API accepts any [`EventName`] at runtime.
//! * **Synchronous**: Listeners run on the emitting thread, no queueing.
//! * **Re-entrant**: Listeners may register, unregister or emit while being
//!   invoked; each emit works on a snapshot taken when it starts.
//! * **Panic policy**: Fail fast or isolate panicking listeners, see [`PanicPolicy`].
//!
//! # Example
//!
//! ```rust
//! use herald_events::{Event, EventEmitter, EventName, Listener};
//! use std::sync::{Arc, Mutex};
//!
//! struct Alarm;
//! impl Event for Alarm {
//!     type Payload = (String, u32);
//!     const NAME: EventName = EventName::tag(911);
//! }
//!
//! struct Greeting;
//! impl Event for Greeting {
//!     type Payload = str;
//!     const NAME: EventName = EventName::text("helloworld");
//! }
//!
//! let emitter = EventEmitter::new();
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&log);
//! let second = Listener::new(move |(what, code): &(String, u32)| {
//!     sink.lock().unwrap().push(format!("again {what} {code}"));
//! });
//! emitter.register::<Alarm>(&second);
//! emitter.emit::<Alarm>(&("bar".to_owned(), 120));
//! emitter.unregister::<Alarm>(&second);
//! emitter.emit::<Alarm>(&("foo bar".to_owned(), 119));
//!
//! let sink = Arc::clone(&log);
//! emitter.once::<Greeting>(move |who| sink.lock().unwrap().push(format!("hello {who}")));
//! emitter.emit::<Greeting>("world");
//! emitter.emit::<Greeting>("world");
//!
//! assert_eq!(*log.lock().unwrap(), ["again bar 120", "hello world"]);
//! ```

mod config;
mod emitter;
mod error;
mod event;
mod listener;

pub use config::{DEFAULT_MAX_LISTENERS, EmitterConfig, PanicPolicy};
pub use emitter::EventEmitter;
pub use error::EmitterError;
pub use event::{Event, EventName};
pub use listener::{Listener, ListenerId};
