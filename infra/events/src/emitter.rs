use crate::config::{EmitterConfig, PanicPolicy};
use crate::error::EmitterError;
use crate::event::{Event, EventName};
use crate::listener::{Listener, ListenerId};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, trace, warn};

/// One registration. `callback` always holds a `Listener<P>` where `TypeId::of::<P>() == payload`.
#[derive(Debug)]
struct Slot {
    id: ListenerId,
    payload: TypeId,
    payload_name: &'static str,
    /// Identity of the handle this registration was made from.
    origin: usize,
    once: bool,
    callback: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn new<P: ?Sized + 'static>(
        id: ListenerId,
        origin: usize,
        once: bool,
        callback: Listener<P>,
    ) -> Self {
        Self {
            id,
            payload: TypeId::of::<P>(),
            payload_name: std::any::type_name::<P>(),
            origin,
            once,
            callback: Box::new(callback),
        }
    }
}

#[derive(Debug)]
struct Registry {
    channels: RwLock<FxHashMap<EventName, Vec<Slot>>>,
    next_id: AtomicU64,
    config: EmitterConfig,
}

impl Registry {
    fn next_id(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Detaches the first slot under `name` matching `pred`.
    ///
    /// The slot is handed back so it gets dropped after the lock is released;
    /// dropping a callback may run arbitrary user `Drop` code.
    fn take_slot(&self, name: &EventName, pred: impl Fn(&Slot) -> bool) -> Option<Slot> {
        let mut channels = self.channels.write();
        let slots = channels.get_mut(name)?;
        let index = slots.iter().position(pred)?;
        let slot = slots.remove(index);
        if slots.is_empty() {
            channels.remove(name);
        }
        Some(slot)
    }
}

/// A synchronous, strongly-typed event emitter.
///
/// Maps [`EventName`]s to ordered listener lists. Listeners run on the thread
/// that calls `emit`, in registration order, and all receive the same payload
/// reference. The internal lock is never held while a listener runs, so
/// listeners may freely register, unregister or emit on the same emitter.
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    registry: Arc<Registry>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::with_config(EmitterConfig::default())
    }
}

impl EventEmitter {
    /// Creates a new, empty emitter with the default [`EmitterConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty emitter with the given configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Arc::new(Registry {
                channels: RwLock::new(FxHashMap::default()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Returns the configuration this emitter was built with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.registry.config
    }

    // --- register ---

    /// Registers a closure for event `E`.
    ///
    /// Every closure is a distinct registration. Use [`EventEmitter::register`]
    /// with a [`Listener`] handle when the listener must be removable by value.
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::{Event, EventEmitter, EventName};
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct Tick;
    /// impl Event for Tick {
    ///     type Payload = u32;
    ///     const NAME: EventName = EventName::text("tick");
    /// }
    ///
    /// let emitter = EventEmitter::new();
    /// let total = Arc::new(AtomicU32::new(0));
    /// let sink = Arc::clone(&total);
    /// emitter.on::<Tick>(move |n| {
    ///     sink.fetch_add(*n, Ordering::SeqCst);
    /// });
    ///
    /// emitter.emit::<Tick>(&2);
    /// emitter.emit::<Tick>(&3);
    /// assert_eq!(total.load(Ordering::SeqCst), 5);
    /// ```
    pub fn on<E: Event>(
        &self,
        callback: impl Fn(&E::Payload) + Send + Sync + 'static,
    ) -> ListenerId {
        self.on_named::<E::Payload>(E::NAME, callback)
    }

    /// Registers a listener handle for event `E`.
    ///
    /// Registering a handle that is already registered for `E` adds nothing
    /// and returns the original id, so it is still delivered once per emit.
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::{Event, EventEmitter, EventName, Listener};
    ///
    /// struct Ping;
    /// impl Event for Ping {
    ///     type Payload = u8;
    ///     const NAME: EventName = EventName::text("ping");
    /// }
    ///
    /// let emitter = EventEmitter::new();
    /// let listener = Listener::new(|_: &u8| {});
    ///
    /// let id = emitter.register::<Ping>(&listener);
    /// assert_eq!(emitter.register::<Ping>(&listener.clone()), id);
    /// assert_eq!(emitter.listener_count_of::<Ping>(), 1);
    /// ```
    pub fn register<E: Event>(&self, listener: &Listener<E::Payload>) -> ListenerId {
        self.register_named(E::NAME, listener)
    }

    /// Registers a closure under a dynamic event name.
    pub fn on_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        callback: impl Fn(&P) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register_named(name, &Listener::new(callback))
    }

    /// Registers a listener handle under a dynamic event name.
    pub fn register_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        listener: &Listener<P>,
    ) -> ListenerId {
        let id = self.registry.next_id();
        let slot = Slot::new(id, listener.identity(), false, listener.clone());
        self.insert(name.into(), slot, true)
    }

    // --- register-once ---

    /// Registers a closure for event `E` that fires on the next emit only.
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::{Event, EventEmitter, EventName};
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct Ready;
    /// impl Event for Ready {
    ///     type Payload = ();
    ///     const NAME: EventName = EventName::text("ready");
    /// }
    ///
    /// let emitter = EventEmitter::new();
    /// let hits = Arc::new(AtomicUsize::new(0));
    /// let sink = Arc::clone(&hits);
    /// emitter.once::<Ready>(move |_| {
    ///     sink.fetch_add(1, Ordering::SeqCst);
    /// });
    ///
    /// emitter.emit::<Ready>(&());
    /// emitter.emit::<Ready>(&());
    /// assert_eq!(hits.load(Ordering::SeqCst), 1);
    /// assert!(emitter.is_empty());
    /// ```
    pub fn once<E: Event>(
        &self,
        callback: impl Fn(&E::Payload) + Send + Sync + 'static,
    ) -> ListenerId {
        self.once_named::<E::Payload>(E::NAME, callback)
    }

    /// Registers a listener handle for event `E` that fires on the next emit only.
    ///
    /// Each call is an independent one-shot registration, even for the same handle.
    pub fn register_once<E: Event>(&self, listener: &Listener<E::Payload>) -> ListenerId {
        self.register_once_named(E::NAME, listener)
    }

    /// Registers a one-shot closure under a dynamic event name.
    pub fn once_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        callback: impl Fn(&P) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register_once_named(name, &Listener::new(callback))
    }

    /// Registers a one-shot listener handle under a dynamic event name.
    ///
    /// The stored wrapper delivers the payload first and then removes itself
    /// by id. It holds the registry weakly, and a fired flag keeps it from
    /// running twice when the listener re-emits the same event or two emits
    /// race on different threads.
    pub fn register_once_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        listener: &Listener<P>,
    ) -> ListenerId {
        let name = name.into();
        let id = self.registry.next_id();

        let registry = Arc::downgrade(&self.registry);
        let target = listener.clone();
        let own_name = name.clone();
        let fired = AtomicBool::new(false);

        let wrapper = Listener::new(move |payload: &P| {
            if fired.swap(true, Ordering::AcqRel) {
                return;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| target.call(payload)));
            if let Some(registry) = registry.upgrade() {
                let removed = registry.take_slot(&own_name, |slot| slot.id == id);
                trace!(event = %own_name, listener = %id, "One-shot listener fired and removed");
                drop(removed);
            }
            if let Err(panic) = outcome {
                panic::resume_unwind(panic);
            }
        });

        let slot = Slot::new(id, listener.identity(), true, wrapper);
        self.insert(name, slot, false)
    }

    // --- emit ---

    /// Emits event `E`, invoking every current listener in registration order.
    ///
    /// All listeners receive the same `payload` reference. Emitting an event
    /// with no listeners is a no-op. A panicking listener is handled according to the
    /// configured [`PanicPolicy`].
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::{Event, EventEmitter, EventName};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct Greeting;
    /// impl Event for Greeting {
    ///     type Payload = str;
    ///     const NAME: EventName = EventName::text("greeting");
    /// }
    ///
    /// let emitter = EventEmitter::new();
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// for prefix in ["hello", "hi"] {
    ///     let log = Arc::clone(&log);
    ///     emitter.on::<Greeting>(move |who| log.lock().unwrap().push(format!("{prefix} {who}")));
    /// }
    ///
    /// let who = String::from("world");
    /// emitter.emit::<Greeting>(&who);
    /// assert_eq!(*log.lock().unwrap(), ["hello world", "hi world"]);
    /// ```
    pub fn emit<E: Event>(&self, payload: &E::Payload) {
        self.emit_named::<E::Payload>(E::NAME, payload);
    }

    /// Emits a payload under a dynamic event name.
    ///
    /// Only listeners registered for payload type `P` under `name` are invoked.
    pub fn emit_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        payload: &P,
    ) {
        let name = name.into();
        let snapshot = self.snapshot::<P>(&name);
        if snapshot.is_empty() {
            trace!(event = %name, "Event dropped: no listeners");
            return;
        }

        match self.registry.config.panic_policy {
            PanicPolicy::Propagate => {
                for (_, listener) in &snapshot {
                    listener.call(payload);
                }
            },
            PanicPolicy::Isolate => {
                deliver_isolated(&name, &snapshot, payload);
            },
        }
        trace!(event = %name, count = snapshot.len(), "Event dispatched");
    }

    /// Emits event `E`, isolating listener panics regardless of the configured policy.
    ///
    /// # Errors
    /// Returns [`EmitterError::ListenerPanicked`] if any listener panicked.
    /// Every listener of the pass has still been invoked by then.
    pub fn try_emit<E: Event>(&self, payload: &E::Payload) -> Result<usize, EmitterError> {
        self.try_emit_named::<E::Payload>(E::NAME, payload)
    }

    /// Dynamic-name counterpart of [`EventEmitter::try_emit`].
    ///
    /// # Errors
    /// Returns [`EmitterError::ListenerPanicked`] if any listener panicked.
    pub fn try_emit_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        payload: &P,
    ) -> Result<usize, EmitterError> {
        let name = name.into();
        let snapshot = self.snapshot::<P>(&name);
        let failures = deliver_isolated(&name, &snapshot, payload);

        if failures.is_empty() {
            trace!(event = %name, count = snapshot.len(), "Event dispatched");
            return Ok(snapshot.len());
        }

        Err(EmitterError::ListenerPanicked {
            message: format!(
                "{} of {} listeners panicked: {}",
                failures.len(),
                snapshot.len(),
                failures.join("; ")
            )
            .into(),
            context: Some(name.to_string().into()),
        })
    }

    // --- unregister ---

    /// Removes one registration of `listener` for event `E`.
    ///
    /// Removing a handle that is not registered is a no-op.
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::{Event, EventEmitter, EventName, Listener};
    ///
    /// struct Tick;
    /// impl Event for Tick {
    ///     type Payload = u64;
    ///     const NAME: EventName = EventName::tag(7);
    /// }
    ///
    /// let emitter = EventEmitter::new();
    /// let first = Listener::new(|_: &u64| {});
    /// let second = Listener::new(|_: &u64| {});
    /// emitter.register::<Tick>(&first);
    /// emitter.register::<Tick>(&second);
    ///
    /// emitter.unregister::<Tick>(&first);
    /// emitter.unregister::<Tick>(&first);
    /// assert_eq!(emitter.listener_count_of::<Tick>(), 1);
    /// ```
    pub fn unregister<E: Event>(&self, listener: &Listener<E::Payload>) {
        self.unregister_named(E::NAME, listener);
    }

    /// Removes the earliest registration made from `listener` under `name`,
    /// including one-shot registrations that have not fired yet.
    pub fn unregister_named<P: ?Sized + 'static>(
        &self,
        name: impl Into<EventName>,
        listener: &Listener<P>,
    ) {
        let name = name.into();
        let origin = listener.identity();
        match self.registry.take_slot(&name, |slot| slot.origin == origin) {
            Some(slot) => trace!(event = %name, listener = %slot.id, "Listener removed"),
            None => trace!(event = %name, "Listener not registered; nothing removed"),
        }
    }

    /// Removes the registration with the given id, wherever it lives.
    ///
    /// Returns `true` if a registration was removed.
    pub fn unregister_id(&self, id: ListenerId) -> bool {
        let removed = {
            let mut channels = self.registry.channels.write();
            let found = channels.iter_mut().find_map(|(name, slots)| {
                let index = slots.iter().position(|slot| slot.id == id)?;
                Some((name.clone(), slots.remove(index), slots.is_empty()))
            });
            if let Some((name, _, true)) = &found {
                channels.remove(name);
            }
            found
        };

        let Some((name, slot, _)) = removed else {
            return false;
        };
        trace!(event = %name, listener = %slot.id, "Listener removed");
        true
    }

    /// Discards every listener registered under `name`. Other events are untouched.
    ///
    /// # Examples
    /// ```rust
    /// use herald_events::EventEmitter;
    ///
    /// let emitter = EventEmitter::new();
    /// emitter.on_named::<u8>("a", |_| {});
    /// emitter.on_named::<u8>("a", |_| {});
    /// emitter.on_named::<u8>("b", |_| {});
    ///
    /// emitter.unregister_event("a");
    /// assert_eq!(emitter.listener_count("a"), 0);
    /// assert_eq!(emitter.listener_count("b"), 1);
    ///
    /// emitter.unregister_all();
    /// assert!(emitter.is_empty());
    /// ```
    pub fn unregister_event(&self, name: impl Into<EventName>) {
        let name = name.into();
        let removed = self.registry.channels.write().remove(&name);
        let count = removed.as_ref().map_or(0, Vec::len);
        trace!(event = %name, count, "Event listeners cleared");
    }

    /// Discards every listener of every event.
    pub fn unregister_all(&self) {
        let removed = std::mem::take(&mut *self.registry.channels.write());
        trace!(events = removed.len(), "All listeners cleared");
    }

    // --- introspection ---

    /// Number of listeners currently registered under `name` (any payload type).
    #[must_use]
    pub fn listener_count(&self, name: impl Into<EventName>) -> usize {
        let name = name.into();
        self.registry.channels.read().get(&name).map_or(0, Vec::len)
    }

    /// Number of listeners currently registered for event `E`.
    #[must_use]
    pub fn listener_count_of<E: Event>(&self) -> usize {
        self.listener_count(E::NAME)
    }

    /// Number of listeners across all events.
    #[must_use]
    pub fn total_listener_count(&self) -> usize {
        self.registry.channels.read().values().map(Vec::len).sum()
    }

    /// Names with at least one listener, in sorted order.
    #[must_use]
    pub fn event_names(&self) -> Vec<EventName> {
        let mut names: Vec<EventName> = self.registry.channels.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns `true` if no listener is registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.channels.read().is_empty()
    }

    fn insert(&self, name: EventName, slot: Slot, dedupe: bool) -> ListenerId {
        let max_listeners = self.registry.config.max_listeners;
        let (id, count) = {
            let mut channels = self.registry.channels.write();
            let slots = channels.entry(name.clone()).or_default();

            if dedupe
                && let Some(existing) =
                    slots.iter().find(|other| !other.once && other.origin == slot.origin)
            {
                trace!(event = %name, listener = %existing.id, "Listener already registered");
                return existing.id;
            }

            if let Some(other) = slots.iter().find(|other| other.payload != slot.payload) {
                warn!(
                    event = %name,
                    existing_payload = other.payload_name,
                    registered_payload = slot.payload_name,
                    "Event already has listeners with a different payload type"
                );
            }

            let id = slot.id;
            slots.push(slot);
            (id, slots.len())
        };

        if max_listeners > 0 && count == max_listeners + 1 {
            warn!(
                event = %name,
                count,
                max_listeners,
                "Listener threshold exceeded; possible listener leak"
            );
        }
        trace!(event = %name, listener = %id, count, "Listener registered");
        id
    }

    fn snapshot<P: ?Sized + 'static>(&self, name: &EventName) -> Vec<(ListenerId, Listener<P>)> {
        let channels = self.registry.channels.read();
        channels.get(name).map_or_else(Vec::new, |slots| {
            slots
                .iter()
                .filter_map(|slot| {
                    slot.callback.downcast_ref::<Listener<P>>().map(|l| (slot.id, l.clone()))
                })
                .collect()
        })
    }
}

/// Invokes every listener under `catch_unwind`, returning one line per panic.
fn deliver_isolated<P: ?Sized>(
    name: &EventName,
    snapshot: &[(ListenerId, Listener<P>)],
    payload: &P,
) -> Vec<String> {
    let mut failures = Vec::new();
    for (id, listener) in snapshot {
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| listener.call(payload))) {
            let message = panic_message(&*panic);
            error!(
                event = %name,
                listener = %id,
                panic = %message,
                "Listener panicked; continuing delivery"
            );
            failures.push(format!("{id}: {message}"));
        }
    }
    failures
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn empty_channels_are_dropped() {
        let emitter = EventEmitter::new();
        let listener = Listener::new(|_: &u8| {});

        emitter.register_named("a", &listener);
        assert_eq!(emitter.event_names(), vec![EventName::text("a")]);

        emitter.unregister_named("a", &listener);
        assert!(emitter.is_empty());
        assert!(emitter.registry.channels.read().get(&EventName::text("a")).is_none());
    }

    #[test]
    fn fired_once_wrapper_leaves_no_slot() {
        let emitter = EventEmitter::new();
        emitter.once_named::<u8>("a", |_| {});
        emitter.emit_named::<u8>("a", &1);
        assert!(emitter.registry.channels.read().is_empty());
    }

    #[test]
    fn once_wrapper_does_not_keep_registry_alive() {
        let emitter = EventEmitter::new();
        let weak = Arc::downgrade(&emitter.registry);
        emitter.once_named::<u8>("a", |_| {});
        drop(emitter);
        assert!(weak.upgrade().is_none(), "wrapper must hold the registry weakly");
    }

    #[test]
    fn ids_are_never_reused() {
        let emitter = EventEmitter::new();
        let first = emitter.on_named::<u8>("a", |_| {});
        assert!(emitter.unregister_id(first));
        let second = emitter.on_named::<u8>("a", |_| {});
        assert_ne!(first, second);
        assert!(!emitter.unregister_id(first));
    }

    #[test]
    fn panic_message_reads_both_string_kinds() {
        let hits = Arc::new(AtomicUsize::new(0));
        let emitter = EventEmitter::new();
        emitter.on_named::<u8>("a", |_| panic!("static"));
        emitter.on_named::<u8>("a", |n| panic!("owned {n}"));
        let sink = Arc::clone(&hits);
        emitter.on_named::<u8>("a", move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let err = emitter.try_emit_named::<u8>("a", &4).expect_err("two listeners panic");
        let text = err.to_string();
        assert!(text.contains("2 of 3 listeners panicked"), "{text}");
        assert!(text.contains("static"), "{text}");
        assert!(text.contains("owned 4"), "{text}");
        assert!(text.starts_with("Listener panicked (a): "), "{text}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
