// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One attached gesture binding: a recognizer and a policy on a single node.
//!
//! ## Lifecycle
//!
//! [`Binding::attach`] subscribes the recognizer's [`Channels`] on the host
//! [`EventSource`] and returns an attached binding. [`Channels::RELEASE`] is always
//! subscribed: the compatibility mouse filter measures its window from the end of a touch,
//! even for `press` bindings. [`Binding::detach`] cancels every pending
//! timer and unsubscribes. Detaching twice is a no-op. A [`Once`](crate::config::PolicyKind::Once)
//! binding detaches itself on its first trigger, before the callback runs.
//!
//! ## Time
//!
//! Timers are deadlines on the host clock. The host polls [`Binding::next_deadline`] and
//! calls [`Binding::advance`] when it is reached. Events carry their own timestamps, and
//! any timer due at or before an event's time fires before the event is processed.
//!
//! Nothing fires after detach: a detached binding has no deadlines and ignores events.
//!
//! ```
//! use understory_gesture::binding::Binding;
//! use understory_gesture::config::Configuration;
//! use understory_gesture::input::{Channels, EventSource, InputEvent};
//!
//! struct Host;
//! impl EventSource<u32> for Host {
//!     fn subscribe(&mut self, _node: u32, _channels: Channels) {}
//!     fn unsubscribe(&mut self, _node: u32, _channels: Channels) {}
//! }
//!
//! let mut host = Host;
//! let mut b = Binding::attach(&mut host, 7_u32, Configuration::resolve(["hold", "500"], None));
//! b.handle_event(&mut host, &InputEvent::touch_start(0.0));
//! assert_eq!(b.next_deadline(), Some(500.0));
//! b.advance(&mut host, 500.0);
//! assert!(b.detach(&mut host));
//! assert!(!b.detach(&mut host));
//! ```

use core::fmt::Debug;

use crate::config::{Configuration, Options};
use crate::input::{Channels, CompatMouseFilter, Disposition, EventSource, InputEvent};
use crate::policy::{Decision, Policy};
use crate::recognizer::{Recognizer, Trigger};

/// Lifecycle of a [`Binding`].
///
/// There is no observable unattached state: a binding only exists once
/// [`Binding::attach`] has subscribed it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BindingState {
    /// Subscribed and processing input.
    Attached,
    /// Torn down; inert.
    Detached,
}

/// A recognizer/policy pair attached to node `K`.
#[derive(Debug)]
pub struct Binding<K> {
    node: K,
    state: BindingState,
    subscribed: Channels,
    filter: CompatMouseFilter,
    recognizer: Recognizer,
    policy: Policy,
    config: Configuration,
}

impl<K: Copy + Debug> Binding<K> {
    /// Build the recognizer and policy for `config` and subscribe them on `node`.
    pub fn attach<S: EventSource<K>>(source: &mut S, node: K, config: Configuration) -> Self {
        let duration = config.options.duration_or_default();
        let recognizer = Recognizer::new(config.options.gesture, duration);
        let policy = Policy::new(config.options.policy, duration);
        let subscribed = recognizer.channels() | Channels::RELEASE;
        source.subscribe(node, subscribed);
        log::debug!(
            "attach {:?}: {} policy={:?} duration={duration}",
            node,
            config.options.gesture.as_str(),
            config.options.policy,
        );
        Self {
            node,
            state: BindingState::Attached,
            subscribed,
            filter: CompatMouseFilter::default(),
            recognizer,
            policy,
            config,
        }
    }

    /// Node this binding is attached to.
    pub fn node(&self) -> K {
        self.node
    }

    /// Resolved options.
    pub fn options(&self) -> &Options {
        &self.config.options
    }

    /// Lifecycle state.
    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Returns `true` until the binding is detached.
    pub fn is_attached(&self) -> bool {
        self.state == BindingState::Attached
    }

    /// Channels currently subscribed on the host. Empty once detached.
    pub fn subscriptions(&self) -> Channels {
        self.subscribed
    }

    /// Offer a raw input event to this binding.
    ///
    /// Synthetic events, events on unsubscribed channels, and compatibility mouse events
    /// following touch input are [`Ignored`](Disposition::Ignored). So are edges the
    /// recognizer does not listen to; they still feed the compatibility filter.
    pub fn handle_event<S: EventSource<K>>(
        &mut self,
        source: &mut S,
        event: &InputEvent,
    ) -> Disposition {
        if !event.trusted || !self.subscribed.contains(event.edge.channel()) {
            return Disposition::Ignored;
        }
        self.advance(source, event.time);
        if !self.is_attached()
            || !self.filter.accept(event)
            || !self.recognizer.channels().contains(event.edge.channel())
        {
            return Disposition::Ignored;
        }
        if let Some(trigger) = self.recognizer.on_edge(event.edge, event.time) {
            let decision = self.recognized(trigger);
            self.apply(source, decision);
        }
        if event.cancelable {
            Disposition::PreventDefault
        } else {
            Disposition::Observed
        }
    }

    /// Fire every timer due at or before `now`, in deadline order.
    ///
    /// Each timer fires at its own deadline, so a policy timer armed by a recognizer timer
    /// is measured from the recognizer's deadline, not from `now`.
    pub fn advance<S: EventSource<K>>(&mut self, source: &mut S, now: f64) {
        while let Some(at) = self.next_deadline().filter(|&at| at <= now) {
            // On a tie the recognizer goes first; its trigger may re-arm the policy timer.
            let decision = if self.recognizer.deadline() == Some(at) {
                match self.recognizer.on_timer(at) {
                    Some(trigger) => self.recognized(trigger),
                    None => Decision::Skip,
                }
            } else {
                self.policy.on_timer(at)
            };
            self.apply(source, decision);
        }
    }

    /// Earliest pending deadline across recognizer and policy.
    pub fn next_deadline(&self) -> Option<f64> {
        if !self.is_attached() {
            return None;
        }
        match (self.recognizer.deadline(), self.policy.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel all timers and unsubscribe.
    ///
    /// Returns `false` if the binding was already detached.
    pub fn detach<S: EventSource<K>>(&mut self, source: &mut S) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.recognizer.reset();
        self.policy.cancel();
        self.filter.reset();
        if !self.subscribed.is_empty() {
            source.unsubscribe(self.node, self.subscribed);
        }
        self.subscribed = Channels::empty();
        self.state = BindingState::Detached;
        log::debug!("detach {:?}", self.node);
        true
    }

    fn recognized(&mut self, trigger: Trigger) -> Decision {
        log::trace!(
            "{:?}: {} at {}",
            self.node,
            self.recognizer.kind().as_str(),
            trigger.at
        );
        self.policy.on_trigger(trigger.at)
    }

    fn apply<S: EventSource<K>>(&mut self, source: &mut S, decision: Decision) {
        log::trace!("{:?}: policy decision {decision:?}", self.node);
        match decision {
            Decision::Skip => {}
            Decision::Dispatch => self.config.dispatch(),
            Decision::DetachAndDispatch => {
                self.detach(source);
                self.config.dispatch();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_TIMEOUT, GestureKind, Options, PolicyKind};
    use crate::input::COMPAT_MOUSE_WINDOW;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    /// Event source that records the live subscription set per node.
    #[derive(Default)]
    struct Recorder {
        live: Vec<(u32, Channels)>,
        unsubscribes: usize,
    }

    impl EventSource<u32> for Recorder {
        fn subscribe(&mut self, node: u32, channels: Channels) {
            self.live.push((node, channels));
        }
        fn unsubscribe(&mut self, node: u32, channels: Channels) {
            self.unsubscribes += 1;
            let pos = self.live.iter().position(|&e| e == (node, channels));
            self.live.remove(pos.expect("unsubscribe without subscribe"));
        }
    }

    fn counting(tokens: &[&str]) -> (Configuration, Rc<Cell<usize>>) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let config = Configuration::resolve(tokens.iter().copied(), None)
            .with_callback(move |_| h.set(h.get() + 1));
        (config, hits)
    }

    fn click(b: &mut Binding<u32>, src: &mut Recorder, at: f64) {
        b.handle_event(src, &InputEvent::mouse_down(at));
        b.handle_event(src, &InputEvent::mouse_up(at + 20.0));
    }

    #[test]
    fn attach_subscribes_recognizer_channels() {
        let mut src = Recorder::default();
        let (config, _) = counting(&["press"]);
        let b = Binding::<u32>::attach(&mut src, 3, config);
        assert_eq!(src.live, [(3, Channels::PRESS | Channels::RELEASE)]);
        assert_eq!(b.subscriptions(), Channels::PRESS | Channels::RELEASE);
        assert_eq!(b.state(), BindingState::Attached);
        assert_eq!(b.node(), 3);
        assert_eq!(b.options().gesture, GestureKind::Press);
    }

    #[test]
    fn single_click_dispatches() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&[]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        click(&mut b, &mut src, 0.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn single_press_then_late_release_is_dropped() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["single"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        b.handle_event(&mut src, &InputEvent::mouse_up(DEFAULT_TIMEOUT + 1.0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn synthetic_events_never_trigger() {
        let policies = [None]
            .into_iter()
            .chain(PolicyKind::ALL.into_iter().map(Some));
        for policy in policies {
            for gesture in GestureKind::ALL {
                let mut src = Recorder::default();
                let hits = Rc::new(Cell::new(0));
                let h = hits.clone();
                let options = Options {
                    gesture,
                    policy,
                    ..Options::default()
                };
                let config =
                    Configuration::new(options).with_callback(move |_| h.set(h.get() + 1));
                let mut b = Binding::<u32>::attach(&mut src, 1, config);
                for t in 0..4 {
                    let at = f64::from(t) * 50.0;
                    let events = [
                        InputEvent::mouse_down(at),
                        InputEvent::mouse_up(at + 10.0),
                        InputEvent::touch_start(at + 20.0),
                        InputEvent::touch_end(at + 30.0),
                    ];
                    for event in events {
                        let d = b.handle_event(&mut src, &event.synthetic());
                        assert_eq!(d, Disposition::Ignored);
                    }
                }
                assert_eq!(b.next_deadline(), None, "{gesture:?} {policy:?}");
                b.advance(&mut src, 10_000.0);
                assert_eq!(hits.get(), 0, "{gesture:?} {policy:?}");
                assert!(b.is_attached(), "{gesture:?} {policy:?}");
            }
        }
    }

    #[test]
    fn disposition_follows_cancelable() {
        let mut src = Recorder::default();
        let (config, _) = counting(&["release"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_down(0.0)),
            Disposition::Ignored,
            "press is not subscribed"
        );
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_up(1.0)),
            Disposition::PreventDefault
        );
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_up(2.0).non_cancelable()),
            Disposition::Observed
        );
    }

    #[test]
    fn touch_followed_by_compat_mouse_fires_once() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["single"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::touch_start(0.0));
        b.handle_event(&mut src, &InputEvent::touch_end(60.0));
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_down(65.0)),
            Disposition::Ignored
        );
        b.handle_event(&mut src, &InputEvent::mouse_up(66.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn press_long_tap_then_compat_mouse_fires_once() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["press"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::touch_start(0.0)),
            Disposition::PreventDefault
        );
        // Seen by the filter only.
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::touch_end(600.0)),
            Disposition::Ignored
        );
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_down(610.0)),
            Disposition::Ignored
        );
        assert_eq!(hits.get(), 1);

        b.handle_event(&mut src, &InputEvent::mouse_down(600.0 + COMPAT_MOUSE_WINDOW));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn touch_compat_mouse_does_not_make_a_double() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["double"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::touch_start(0.0));
        b.handle_event(&mut src, &InputEvent::touch_end(40.0));
        click(&mut b, &mut src, 45.0);
        b.advance(&mut src, 1000.0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn double_click_dispatches_once() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["double"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        click(&mut b, &mut src, 0.0);
        click(&mut b, &mut src, 100.0);
        assert_eq!(hits.get(), 1);
        // Window elapses after a lone click: swallowed.
        click(&mut b, &mut src, 1000.0);
        b.advance(&mut src, 2000.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn hold_fires_on_advance() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["hold"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        b.advance(&mut src, 299.0);
        assert_eq!(hits.get(), 0);
        b.advance(&mut src, 301.0);
        assert_eq!(hits.get(), 1);
        b.handle_event(&mut src, &InputEvent::mouse_up(400.0));
        assert_eq!(hits.get(), 1);

        b.handle_event(&mut src, &InputEvent::mouse_down(500.0));
        b.handle_event(&mut src, &InputEvent::mouse_up(600.0));
        b.advance(&mut src, 2000.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn hold_then_debounce_fires_in_deadline_order() {
        let mut src = Recorder::default();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let options = Options {
            gesture: GestureKind::Hold,
            policy: Some(PolicyKind::Debounce),
            duration: Some(100.0),
            argument: None,
        };
        let config = Configuration::new(options).with_callback(move |_| h.set(h.get() + 1));
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::touch_start(0.0));
        assert_eq!(b.next_deadline(), Some(100.0));
        // One advance covers both the hold (100) and the debounce it arms (200).
        b.advance(&mut src, 1000.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(b.next_deadline(), None);
    }

    #[test]
    fn throttle_schedule() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["press", "throttle"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        assert_eq!(hits.get(), 1);
        b.handle_event(&mut src, &InputEvent::mouse_down(50.0));
        assert_eq!(hits.get(), 1);
        assert_eq!(b.next_deadline(), Some(350.0));
        b.handle_event(&mut src, &InputEvent::mouse_down(400.0));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn debounce_schedule() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["press", "debounce", "300ms"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        for t in [0.0, 50.0, 100.0] {
            b.handle_event(&mut src, &InputEvent::mouse_down(t));
        }
        assert_eq!(b.next_deadline(), Some(400.0));
        b.advance(&mut src, 399.0);
        assert_eq!(hits.get(), 0);
        b.advance(&mut src, 400.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn once_detaches_before_dispatch() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["press", "once"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        assert_eq!(hits.get(), 1);
        assert!(!b.is_attached());
        assert!(b.subscriptions().is_empty());
        assert!(src.live.is_empty());
        assert_eq!(
            b.handle_event(&mut src, &InputEvent::mouse_down(10.0)),
            Disposition::Ignored
        );
        assert_eq!(hits.get(), 1);
        // Already detached by the policy.
        assert!(!b.detach(&mut src));
        assert_eq!(src.unsubscribes, 1);
    }

    #[test]
    fn once_hold_detaches_from_timer() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["hold", "once"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        b.advance(&mut src, 1000.0);
        assert_eq!(hits.get(), 1);
        assert!(src.live.is_empty());
        b.handle_event(&mut src, &InputEvent::mouse_down(2000.0));
        b.advance(&mut src, 5000.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn detach_is_idempotent_and_silences_timers() {
        let mut src = Recorder::default();
        let (config, hits) = counting(&["press", "debounce"]);
        let mut b = Binding::<u32>::attach(&mut src, 1, config);
        b.handle_event(&mut src, &InputEvent::mouse_down(0.0));
        assert!(b.next_deadline().is_some());
        assert!(b.detach(&mut src));
        assert!(!b.detach(&mut src));
        assert_eq!(src.unsubscribes, 1);
        assert_eq!(b.next_deadline(), None);
        b.advance(&mut src, 10_000.0);
        assert_eq!(hits.get(), 0);
    }
}
