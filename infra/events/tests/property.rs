use herald_events::{EventEmitter, Listener};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Register(usize),
    Unregister(usize),
    Once(usize),
    Emit(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6usize).prop_map(Op::Register),
        (0..6usize).prop_map(Op::Unregister),
        (0..6usize).prop_map(Op::Once),
        any::<u32>().prop_map(Op::Emit),
    ]
}

/// Reference model: an ordered list of `(handle, once)` entries.
fn apply_model(model: &mut Vec<(usize, bool)>, op: &Op, expected: &mut Vec<(usize, u32)>) {
    match *op {
        Op::Register(h) => {
            if !model.iter().any(|&(other, once)| other == h && !once) {
                model.push((h, false));
            }
        },
        Op::Unregister(h) => {
            if let Some(index) = model.iter().position(|&(other, _)| other == h) {
                model.remove(index);
            }
        },
        Op::Once(h) => model.push((h, true)),
        Op::Emit(value) => {
            expected.extend(model.iter().map(|&(h, _)| (h, value)));
            model.retain(|&(_, once)| !once);
        },
    }
}

proptest! {
    #[test]
    fn emitter_matches_ordered_set_model(ops in proptest::collection::vec(op(), 0..64)) {
        let emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<Listener<u32>> = (0..6)
            .map(|h| {
                let seen = Arc::clone(&seen);
                Listener::new(move |value: &u32| seen.lock().push((h, *value)))
            })
            .collect();

        let mut model = Vec::new();
        let mut expected = Vec::new();

        for op in &ops {
            match *op {
                Op::Register(h) => { emitter.register_named("p", &handles[h]); },
                Op::Unregister(h) => emitter.unregister_named("p", &handles[h]),
                Op::Once(h) => { emitter.register_once_named("p", &handles[h]); },
                Op::Emit(value) => emitter.emit_named::<u32>("p", &value),
            }
            apply_model(&mut model, op, &mut expected);
            prop_assert_eq!(emitter.listener_count("p"), model.len());
        }

        prop_assert_eq!(seen.lock().clone(), expected);
    }

    #[test]
    fn other_events_are_never_touched(
        names in proptest::collection::vec("[a-c]", 1..16),
        value in any::<u32>()
    ) {
        let emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            emitter.on_named::<u32>(name, move |v| seen.lock().push((name.to_owned(), *v)));
        }

        for name in &names {
            emitter.emit_named::<u32>(name.clone(), &value);
        }

        let expected: Vec<(String, u32)> = names.iter().map(|n| (n.clone(), value)).collect();
        prop_assert_eq!(seen.lock().clone(), expected);
    }
}
