// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch policies side by side.
//!
//! The same burst of presses is fed to four bindings (no policy, once, throttle, debounce)
//! on separate nodes, and the dispatch times of each are printed.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_policies`

use std::cell::RefCell;
use std::rc::Rc;

use understory_gesture::config::Configuration;
use understory_gesture::input::{Channels, EventSource, InputEvent};
use understory_gesture::registry::Gestures;

struct NullHost;

impl EventSource<usize> for NullHost {
    fn subscribe(&mut self, _node: usize, _channels: Channels) {}
    fn unsubscribe(&mut self, _node: usize, _channels: Channels) {}
}

fn main() {
    env_logger::init();

    let policies: [&[&str]; 4] = [
        &["press"],
        &["press", "once"],
        &["press", "throttle", "300ms"],
        &["press", "debounce", "300ms"],
    ];
    let presses = [0.0, 50.0, 100.0, 400.0, 1000.0, 1100.0];
    let clock = Rc::new(RefCell::new(0.0_f64));

    let mut gestures: Gestures<usize, NullHost> = Gestures::new(NullHost);
    let logs: Vec<Rc<RefCell<Vec<f64>>>> = policies
        .iter()
        .enumerate()
        .map(|(node, tokens)| {
            let log = Rc::new(RefCell::new(Vec::new()));
            let (sink, now) = (log.clone(), clock.clone());
            gestures.attach(
                node,
                Configuration::resolve(tokens.iter().copied(), None)
                    .with_callback(move |_| sink.borrow_mut().push(*now.borrow())),
            );
            log
        })
        .collect();

    let step = |gestures: &mut Gestures<usize, NullHost>, until: f64| {
        while let Some(at) = gestures.next_deadline().filter(|&at| at <= until) {
            *clock.borrow_mut() = at;
            gestures.advance(at);
        }
        *clock.borrow_mut() = until;
    };

    for &t in &presses {
        step(&mut gestures, t);
        for node in 0..policies.len() {
            gestures.handle_event(node, &InputEvent::mouse_down(t));
        }
    }
    step(&mut gestures, 5000.0);

    println!("presses at {presses:?}");
    for (tokens, log) in policies.iter().zip(&logs) {
        println!("{:<28} dispatched at {:?}", tokens.join(" "), log.borrow());
    }
}
