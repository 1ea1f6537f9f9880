// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporal dispatch policies: once, throttle, debounce.
//!
//! A [`Policy`] sits between a [`Recognizer`](crate::recognizer::Recognizer) and the user
//! callback. It never calls the callback itself. Instead, each trigger or timer expiry yields
//! a [`Decision`] that the [binding](crate::binding) carries out.
//!
//! - No policy: every trigger dispatches.
//! - [`Once`](PolicyKind::Once): the first trigger detaches the binding, then dispatches.
//! - [`Throttle`](PolicyKind::Throttle): leading edge. A trigger dispatches if no interval is
//!   pending. A trigger during the interval is skipped and restarts the interval.
//! - [`Debounce`](PolicyKind::Debounce): trailing edge. Each trigger restarts the interval,
//!   and dispatch happens when it elapses.

use crate::config::PolicyKind;
use crate::timer::Timer;

/// What to do with a trigger or timer expiry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Do not invoke the callback.
    Skip,
    /// Invoke the callback.
    Dispatch,
    /// Tear the binding down, then invoke the callback.
    DetachAndDispatch,
}

/// Dispatch policy state for one binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Policy {
    kind: Option<PolicyKind>,
    interval: f64,
    timer: Timer,
}

impl Policy {
    /// Create a policy of `kind` with `interval` milliseconds for throttle and debounce.
    pub fn new(kind: Option<PolicyKind>, interval: f64) -> Self {
        Self {
            kind,
            interval,
            timer: Timer::new(),
        }
    }

    /// The configured policy kind.
    pub fn kind(&self) -> Option<PolicyKind> {
        self.kind
    }

    /// Decide what a trigger at `now` does.
    pub fn on_trigger(&mut self, now: f64) -> Decision {
        match self.kind {
            None => Decision::Dispatch,
            Some(PolicyKind::Once) => Decision::DetachAndDispatch,
            Some(PolicyKind::Throttle) => {
                let throttled = self.timer.is_armed();
                self.timer.arm(now, self.interval);
                if throttled {
                    Decision::Skip
                } else {
                    Decision::Dispatch
                }
            }
            Some(PolicyKind::Debounce) => {
                self.timer.arm(now, self.interval);
                Decision::Skip
            }
        }
    }

    /// Fire the pending timer if it is due at `now`.
    pub fn on_timer(&mut self, now: f64) -> Decision {
        if !self.timer.expire(now) {
            return Decision::Skip;
        }
        match self.kind {
            Some(PolicyKind::Debounce) => Decision::Dispatch,
            // Throttle: the interval is over; the next trigger is a new leading edge.
            _ => Decision::Skip,
        }
    }

    /// The pending timer deadline, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.timer.deadline()
    }

    /// Cancel any pending timer.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}
