// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognizers: per-binding state machines from press/release edges to triggers.
//!
//! ## Overview
//!
//! A [`Recognizer`] consumes [`Edge`]s that already passed input filtering (trusted, not a
//! compatibility mouse event) and timer expirations, and produces [`Trigger`]s. It never
//! calls user code; triggers go to a [`Policy`](crate::policy::Policy).
//!
//! Each variant owns at most one [`Timer`]:
//!
//! | Gesture   | Timer                                            | Channels         |
//! |-----------|--------------------------------------------------|------------------|
//! | `Single`  | safety window, [`DEFAULT_TIMEOUT`]               | press + release  |
//! | `Double`  | safety window, then the double-click window      | press + release  |
//! | `Hold`    | hold duration                                    | press + release  |
//! | `Press`   | none                                             | press            |
//! | `Release` | none                                             | release          |
//!
//! An incomplete double click is swallowed: when the window elapses after the first click
//! nothing is emitted.
//!
//! ## Example
//!
//! ```
//! use understory_gesture::config::GestureKind;
//! use understory_gesture::input::Edge;
//! use understory_gesture::recognizer::Recognizer;
//!
//! let mut r = Recognizer::new(GestureKind::Double, 300.0);
//! assert!(r.on_edge(Edge::Press, 0.0).is_none());
//! assert!(r.on_edge(Edge::Release, 20.0).is_none());
//! assert!(r.on_edge(Edge::Press, 120.0).is_none());
//! assert!(r.on_edge(Edge::Release, 140.0).is_some());
//! ```

use crate::config::{DEFAULT_TIMEOUT, GestureKind};
use crate::input::{Channels, Edge};
use crate::timer::Timer;

/// A recognized gesture occurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trigger {
    /// Time at which the gesture completed, in milliseconds.
    pub at: f64,
}

/// Gesture recognizer for one binding.
#[derive(Clone, Debug, PartialEq)]
pub enum Recognizer {
    /// Press then release within the safety window.
    Single(SingleClick),
    /// Two single clicks within the double-click window.
    Double(DoubleClick),
    /// Press held for the hold duration.
    Hold(HoldPress),
    /// Every press.
    Press,
    /// Every release.
    Release,
}

impl Recognizer {
    /// Create the recognizer for `kind`.
    ///
    /// `duration` is the double-click window or hold duration and is unused by other kinds.
    pub fn new(kind: GestureKind, duration: f64) -> Self {
        match kind {
            GestureKind::Single => Self::Single(SingleClick::default()),
            GestureKind::Double => Self::Double(DoubleClick::new(duration)),
            GestureKind::Hold => Self::Hold(HoldPress::new(duration)),
            GestureKind::Press => Self::Press,
            GestureKind::Release => Self::Release,
        }
    }

    /// Gesture kind this recognizer implements.
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Single(_) => GestureKind::Single,
            Self::Double(_) => GestureKind::Double,
            Self::Hold(_) => GestureKind::Hold,
            Self::Press => GestureKind::Press,
            Self::Release => GestureKind::Release,
        }
    }

    /// Channels this recognizer needs to be subscribed to.
    pub fn channels(&self) -> Channels {
        match self {
            Self::Press => Channels::PRESS,
            Self::Release => Channels::RELEASE,
            Self::Single(_) | Self::Double(_) | Self::Hold(_) => {
                Channels::PRESS | Channels::RELEASE
            }
        }
    }

    /// Feed an input edge at time `now`.
    pub fn on_edge(&mut self, edge: Edge, now: f64) -> Option<Trigger> {
        match (self, edge) {
            (Self::Single(s), Edge::Press) => s.press(now),
            (Self::Single(s), Edge::Release) => s.release(now),
            (Self::Double(d), Edge::Press) => d.press(now),
            (Self::Double(d), Edge::Release) => d.release(now),
            (Self::Hold(h), Edge::Press) => h.press(now),
            (Self::Hold(h), Edge::Release) => h.release(),
            (Self::Press, Edge::Press) | (Self::Release, Edge::Release) => {
                Some(Trigger { at: now })
            }
            (Self::Press, Edge::Release) | (Self::Release, Edge::Press) => None,
        }
    }

    /// Fire the pending timer if it is due at `now`.
    pub fn on_timer(&mut self, now: f64) -> Option<Trigger> {
        match self {
            Self::Single(s) => s.expire(now),
            Self::Double(d) => d.expire(now),
            Self::Hold(h) => h.expire(now),
            Self::Press | Self::Release => None,
        }
    }

    /// The pending timer deadline, if any.
    pub fn deadline(&self) -> Option<f64> {
        match self {
            Self::Single(s) => s.timer.deadline(),
            Self::Double(d) => d.timer.deadline(),
            Self::Hold(h) => h.timer.deadline(),
            Self::Press | Self::Release => None,
        }
    }

    /// Return to the initial state and cancel any pending timer.
    pub fn reset(&mut self) {
        match self {
            Self::Single(s) => s.timer.cancel(),
            Self::Double(d) => d.reset(),
            Self::Hold(h) => h.timer.cancel(),
            Self::Press | Self::Release => {}
        }
    }
}

/// Single click: `Idle → Pressed → Idle`.
///
/// The recognizer is pressed exactly while its safety timer is armed. A press that is not
/// released within [`DEFAULT_TIMEOUT`] (for example, the pointer was dragged away) is
/// dropped without a trigger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleClick {
    timer: Timer,
}

impl SingleClick {
    /// Returns `true` between a press and its release.
    pub fn is_pressed(&self) -> bool {
        self.timer.is_armed()
    }

    fn press(&mut self, now: f64) -> Option<Trigger> {
        self.timer.arm(now, DEFAULT_TIMEOUT);
        None
    }

    fn release(&mut self, now: f64) -> Option<Trigger> {
        if !self.timer.is_armed() {
            return None;
        }
        self.timer.cancel();
        Some(Trigger { at: now })
    }

    fn expire(&mut self, now: f64) -> Option<Trigger> {
        if self.timer.expire(now) {
            log::trace!("single click: press not released within safety window");
        }
        None
    }
}

/// States of [`DoubleClick`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DoubleState {
    /// No click in progress.
    #[default]
    Idle,
    /// First press seen, waiting for its release.
    FirstDown,
    /// First click complete, double-click window open.
    AwaitingSecond,
    /// Second press seen, waiting for its release.
    SecondDown,
}

/// Double click.
///
/// Each press arms the safety window (superseding the double-click window); the first
/// release arms the double-click window. Any expiry returns to [`DoubleState::Idle`].
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleClick {
    window: f64,
    state: DoubleState,
    timer: Timer,
}

impl DoubleClick {
    /// Create with a double-click window of `window` milliseconds.
    pub fn new(window: f64) -> Self {
        Self {
            window,
            state: DoubleState::Idle,
            timer: Timer::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> DoubleState {
        self.state
    }

    fn press(&mut self, now: f64) -> Option<Trigger> {
        self.state = match self.state {
            DoubleState::Idle | DoubleState::FirstDown => DoubleState::FirstDown,
            DoubleState::AwaitingSecond | DoubleState::SecondDown => DoubleState::SecondDown,
        };
        self.timer.arm(now, DEFAULT_TIMEOUT);
        None
    }

    fn release(&mut self, now: f64) -> Option<Trigger> {
        match self.state {
            DoubleState::FirstDown => {
                self.state = DoubleState::AwaitingSecond;
                self.timer.arm(now, self.window);
                None
            }
            DoubleState::SecondDown => {
                self.reset();
                Some(Trigger { at: now })
            }
            DoubleState::Idle | DoubleState::AwaitingSecond => None,
        }
    }

    fn expire(&mut self, now: f64) -> Option<Trigger> {
        if self.timer.expire(now) {
            log::trace!("double click: {:?} timed out", self.state);
            self.state = DoubleState::Idle;
        }
        None
    }

    fn reset(&mut self) {
        self.state = DoubleState::Idle;
        self.timer.cancel();
    }
}

/// Hold: a press that lasts at least the hold duration.
#[derive(Clone, Debug, PartialEq)]
pub struct HoldPress {
    duration: f64,
    timer: Timer,
}

impl HoldPress {
    /// Create with a hold duration of `duration` milliseconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            timer: Timer::new(),
        }
    }

    fn press(&mut self, now: f64) -> Option<Trigger> {
        self.timer.arm(now, self.duration);
        None
    }

    fn release(&mut self) -> Option<Trigger> {
        self.timer.cancel();
        None
    }

    fn expire(&mut self, now: f64) -> Option<Trigger> {
        self.timer.expire(now).then_some(Trigger { at: now })
    }
}
