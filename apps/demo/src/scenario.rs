use herald_events::{Event, EventEmitter, EventName, Listener};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Emergency call: caller name and callback number.
#[derive(Debug)]
pub struct Emergency;

impl Event for Emergency {
    type Payload = (String, u32);
    const NAME: EventName = EventName::tag(911);
}

/// Plain greeting addressed to someone.
#[derive(Debug)]
pub struct HelloWorld;

impl Event for HelloWorld {
    type Payload = str;
    const NAME: EventName = EventName::text("helloworld");
}

/// Lines produced by listeners, in the order they ran.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<String>>>);

impl Transcript {
    fn say(&self, line: String) {
        info!("{line}");
        self.0.lock().push(line);
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Walks through every emitter operation and returns what the listeners said.
pub fn run(emitter: &EventEmitter) -> Transcript {
    let transcript = Transcript::default();

    let out = transcript.clone();
    emitter.on::<Emergency>(move |(caller, number)| {
        out.say(format!("Event 911 fired: {caller} {number}"));
    });
    emitter.emit::<Emergency>(&("foo".to_owned(), 110));

    let out = transcript.clone();
    let follow_up = Listener::new(move |(caller, number): &(String, u32)| {
        out.say(format!("Event 911 fired again: {caller} {number}"));
    });
    emitter.register::<Emergency>(&follow_up);
    emitter.emit::<Emergency>(&("bar".to_owned(), 120));

    emitter.unregister::<Emergency>(&follow_up);
    emitter.emit::<Emergency>(&("foo bar".to_owned(), 119));
    emitter.unregister_event(Emergency::NAME);

    let out = transcript.clone();
    emitter.once::<HelloWorld>(move |who| out.say(format!("hello {who}")));
    emitter.emit::<HelloWorld>("world");
    emitter.emit::<HelloWorld>("world");

    transcript
}
