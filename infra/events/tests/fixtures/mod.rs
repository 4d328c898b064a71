use herald_events::{Event, EventName, Listener};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Integer-tagged event carrying a tuple.
#[derive(Debug)]
pub struct Alarm;

impl Event for Alarm {
    type Payload = (String, u32);
    const NAME: EventName = EventName::tag(911);
}

/// Text-named event carrying a borrowed string.
#[derive(Debug)]
pub struct Greeting;

impl Event for Greeting {
    type Payload = str;
    const NAME: EventName = EventName::text("helloworld");
}

/// Plain numeric event.
#[derive(Debug)]
pub struct Counter;

impl Event for Counter {
    type Payload = i64;
    const NAME: EventName = EventName::text("x");
}

/// Shares the `"x"` name with [`Counter`] but carries a different payload type.
#[derive(Debug)]
pub struct CounterText;

impl Event for CounterText {
    type Payload = String;
    const NAME: EventName = EventName::text("x");
}

/// Collects `(label, value)` entries in call order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a listener that records every payload under `label`.
    #[must_use]
    pub fn listener<P>(&self, label: &'static str) -> Listener<P>
    where
        P: ToString + ?Sized + 'static,
    {
        let calls = Arc::clone(&self.calls);
        Listener::new(move |payload: &P| calls.lock().push((label, payload.to_string())))
    }

    pub fn record(&self, label: &'static str, value: impl ToString) {
        self.calls.lock().push((label, value.to_string()));
    }

    #[must_use]
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|(label, _)| *label).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Tracing layer counting `WARN` events, for asserting on emitter diagnostics.
#[derive(Debug, Clone, Default)]
pub struct WarnCounter {
    count: Arc<AtomicUsize>,
}

impl WarnCounter {
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
