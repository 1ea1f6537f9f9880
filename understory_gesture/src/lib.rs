// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic, `no_std` click and hold recognition with temporal
//! dispatch policies.
//!
//! ## Overview
//!
//! This crate turns raw press/release input on a UI node (mouse-down, mouse-up, touch-start,
//! touch-end) into gestures and decides when the user callback runs.
//!
//! - Gestures: `single`, `double`, `hold`, `press`, `release`.
//! - Policies: none, `once`, `throttle`, `debounce`.
//!
//! It does not hit test or route events. Feed it events that already target a node, for
//! example the target of an [Understory Responder] dispatch.
//!
//! ## Pipeline
//!
//! ```text
//! InputEvent ─▶ compat-mouse filter ─▶ Recognizer ─▶ Trigger ─▶ Policy ─▶ Decision ─▶ callback
//! ```
//!
//! - [`input`]: raw events, subscription [`Channels`](input::Channels), and the host
//!   [`EventSource`](input::EventSource) trait.
//! - [`time`]: duration tokens such as `300`, `2s`, `1.5m`.
//! - [`config`]: option tokens resolved into [`Options`](config::Options) and a
//!   [`Configuration`](config::Configuration) carrying the callback.
//! - [`recognizer`]: per-gesture state machines.
//! - [`policy`]: once, throttle (leading edge, refreshed), debounce (trailing edge).
//! - [`binding`]: one recognizer/policy pair on one node, with attach and idempotent detach.
//! - [`registry`]: many bindings over one host, with generational detach handles.
//!
//! ## Time
//!
//! There are no host timer handles. Each state machine owns at most one
//! [`Timer`](timer::Timer) deadline. The host asks for the next deadline and calls `advance`
//! when it is reached. Events carry their own timestamps, so tests drive everything with a
//! virtual clock.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_gesture::config::Configuration;
//! use understory_gesture::input::{Channels, EventSource, InputEvent};
//! use understory_gesture::registry::Gestures;
//!
//! /// A host that would install DOM or toolkit listeners.
//! struct Host;
//! impl EventSource<u32> for Host {
//!     fn subscribe(&mut self, _node: u32, _channels: Channels) {}
//!     fn unsubscribe(&mut self, _node: u32, _channels: Channels) {}
//! }
//!
//! let saves = Rc::new(Cell::new(0));
//! let s = saves.clone();
//! let mut gestures: Gestures<u32, Host> = Gestures::new(Host);
//! gestures.attach(
//!     42,
//!     Configuration::resolve(["press", "throttle", "1s"], None)
//!         .with_callback(move |_| s.set(s.get() + 1)),
//! );
//!
//! // A burst of presses dispatches once; the interval refreshes on every press.
//! for t in [0.0, 200.0, 400.0, 600.0] {
//!     gestures.handle_event(42, &InputEvent::mouse_down(t));
//! }
//! assert_eq!(saves.get(), 1);
//!
//! // After a quiet second the next press is a new leading edge.
//! let quiet = gestures.next_deadline().unwrap();
//! gestures.advance(quiet);
//! gestures.handle_event(42, &InputEvent::mouse_down(quiet + 1.0));
//! assert_eq!(saves.get(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `log/std`.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [Understory Responder]: https://docs.rs/understory_responder

#![no_std]

extern crate alloc;

pub mod binding;
pub mod config;
pub mod input;
pub mod policy;
pub mod recognizer;
pub mod registry;
pub mod time;
pub mod timer;
