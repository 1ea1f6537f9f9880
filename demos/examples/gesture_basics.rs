// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture basics.
//!
//! Binds a click counter to a node, replays a scripted pointer trace, and prints what the
//! host is asked to do: which listeners to install, when to wake up, and which events
//! should have their default action suppressed.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example gesture_basics`

use std::cell::Cell;
use std::rc::Rc;

use understory_gesture::config::Configuration;
use understory_gesture::input::{Channels, EventSource, InputEvent};
use understory_gesture::registry::Gestures;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Node(u32);

/// Prints subscription requests instead of installing real listeners.
#[derive(Debug)]
struct PrintingHost;

impl EventSource<Node> for PrintingHost {
    fn subscribe(&mut self, node: Node, channels: Channels) {
        println!("  subscribe   {node:?} {channels:?}");
    }
    fn unsubscribe(&mut self, node: Node, channels: Channels) {
        println!("  unsubscribe {node:?} {channels:?}");
    }
}

fn main() {
    env_logger::init();

    let count = Rc::new(Cell::new(0_u32));
    let mut gestures = Gestures::new(PrintingHost);

    println!("== Attach ==");
    let c = count.clone();
    let button = Node(1);
    let id = gestures.attach(
        button,
        Configuration::resolve(["single:inc"], None).with_callback(move |arg| {
            c.set(c.get() + 1);
            println!("  dispatch    {arg:?} -> count = {}", c.get());
        }),
    );

    println!("== Input ==");
    let trace = [
        InputEvent::mouse_down(0.0),
        InputEvent::mouse_up(80.0),
        // Press held past the safety window: no click.
        InputEvent::mouse_down(500.0),
        InputEvent::mouse_up(900.0),
        // A tap followed by the browser's compatibility mouse events: one click.
        InputEvent::touch_start(1200.0),
        InputEvent::touch_end(1260.0),
        InputEvent::mouse_down(1270.0),
        InputEvent::mouse_up(1271.0),
        // Synthetic events are ignored.
        InputEvent::mouse_down(2000.0).synthetic(),
        InputEvent::mouse_up(2010.0).synthetic(),
    ];
    for event in &trace {
        if let Some(at) = gestures.next_deadline().filter(|&at| at <= event.time) {
            println!("  wake        t={at}");
            gestures.advance(at);
        }
        let disposition = gestures.handle_event(button, event);
        println!(
            "  t={:<6} {:?}/{:?} trusted={} -> {disposition:?}",
            event.time, event.device, event.edge, event.trusted
        );
    }

    println!("== Detach ==");
    gestures.detach(id);
    // Detaching again is a no-op.
    gestures.detach(id);
    println!("clicks: {}", count.get());
}
