// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single cancelable deadline.
//!
//! Every recognizer and policy owns at most one [`Timer`]. There are no host timer handles:
//! the host asks for the earliest [`deadline`](Timer::deadline) and later reports the
//! current time, and the owner calls [`expire`](Timer::expire) to learn whether it fired.
//!
//! Arming an already armed timer supersedes the previous deadline.

/// A cancelable one-shot deadline, in milliseconds on the host clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Timer {
    deadline: Option<f64>,
}

impl Timer {
    /// An unarmed timer.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire `delay` milliseconds after `now`, replacing any pending deadline.
    ///
    /// Negative delays are clamped to zero.
    pub fn arm(&mut self, now: f64, delay: f64) {
        self.deadline = Some(now + delay.max(0.0));
    }

    /// Cancel the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Disarm and return `true` if the deadline is at or before `now`.
    ///
    /// A deadline exactly equal to `now` has expired.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
