// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input model: press/release edges from mouse and touch, subscription channels,
//! and the host event-source seam.
//!
//! ## Channels
//!
//! Mouse-down and touch-start are the same logical [`PRESS`](Channels::PRESS) input;
//! mouse-up and touch-end are [`RELEASE`](Channels::RELEASE). Recognizers subscribe to
//! channels, never to a specific device.
//!
//! ## Compatibility mouse events
//!
//! Browsers follow a touch sequence with synthesized mouse events. [`CompatMouseFilter`]
//! drops mouse input for [`COMPAT_MOUSE_WINDOW`] milliseconds after the latest touch
//! input so that one tap is seen once.

/// How long mouse input is ignored after a touch input, in milliseconds.
pub const COMPAT_MOUSE_WINDOW: f64 = 500.0;

bitflags::bitflags! {
    /// Logical input channels a recognizer listens to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        /// Mouse-button-down and touch-start.
        const PRESS   = 0b0000_0001;
        /// Mouse-button-up and touch-end.
        const RELEASE = 0b0000_0010;
    }
}

/// Which side of a click an input is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edge {
    /// Pointer went down.
    Press,
    /// Pointer went up.
    Release,
}

impl Edge {
    /// The channel this edge is delivered on.
    pub const fn channel(self) -> Channels {
        match self {
            Self::Press => Channels::PRESS,
            Self::Release => Channels::RELEASE,
        }
    }
}

/// Input device that produced an event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Device {
    /// Mouse or other button-based pointer.
    Mouse,
    /// Touch screen.
    Touch,
}

/// A raw pointer event as delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputEvent {
    /// Press or release.
    pub edge: Edge,
    /// Producing device.
    pub device: Device,
    /// Host timestamp in milliseconds. Must be non-decreasing per node.
    pub time: f64,
    /// `false` for synthetically dispatched events; those are never processed.
    pub trusted: bool,
    /// Whether the host's default action for this event can be suppressed.
    pub cancelable: bool,
}

impl InputEvent {
    /// A trusted, cancelable event.
    pub const fn new(edge: Edge, device: Device, time: f64) -> Self {
        Self {
            edge,
            device,
            time,
            trusted: true,
            cancelable: true,
        }
    }

    /// Mouse button down.
    pub const fn mouse_down(time: f64) -> Self {
        Self::new(Edge::Press, Device::Mouse, time)
    }

    /// Mouse button up.
    pub const fn mouse_up(time: f64) -> Self {
        Self::new(Edge::Release, Device::Mouse, time)
    }

    /// Touch start.
    pub const fn touch_start(time: f64) -> Self {
        Self::new(Edge::Press, Device::Touch, time)
    }

    /// Touch end.
    pub const fn touch_end(time: f64) -> Self {
        Self::new(Edge::Release, Device::Touch, time)
    }

    /// Mark the event as synthetic (not originating from the user).
    #[must_use]
    pub const fn synthetic(mut self) -> Self {
        self.trusted = false;
        self
    }

    /// Mark the event as non-cancelable.
    #[must_use]
    pub const fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }
}

/// What the host should do with an event after it was offered to a binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Not processed (synthetic, unsubscribed, filtered, or detached).
    Ignored,
    /// Processed; the event is not cancelable.
    Observed,
    /// Processed; the host should suppress the default action.
    PreventDefault,
}

impl Disposition {
    /// Combine dispositions of several bindings on the same node.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        use Disposition::*;
        match (self, other) {
            (PreventDefault, _) | (_, PreventDefault) => PreventDefault,
            (Observed, _) | (_, Observed) => Observed,
            (Ignored, Ignored) => Ignored,
        }
    }
}

/// Host-side subscription management for nodes.
///
/// The host installs its real listeners (for example DOM `mousedown`/`touchstart` for
/// [`Channels::PRESS`]) when asked to subscribe and removes them on unsubscribe. Calls are
/// balanced per binding: every subscribed channel is unsubscribed exactly once.
///
/// Precondition: `node` must be addressable by the host.
pub trait EventSource<K> {
    /// Start delivering events on `channels` for `node`.
    fn subscribe(&mut self, node: K, channels: Channels);
    /// Stop delivering events on `channels` for `node`.
    fn unsubscribe(&mut self, node: K, channels: Channels);
}

/// Drops compatibility mouse events that trail a touch sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CompatMouseFilter {
    last_touch: Option<f64>,
}

impl CompatMouseFilter {
    /// Returns `true` if `event` should reach the recognizer.
    pub fn accept(&mut self, event: &InputEvent) -> bool {
        match event.device {
            Device::Touch => {
                self.last_touch = Some(event.time);
                true
            }
            Device::Mouse => match self.last_touch {
                Some(t) if event.time - t < COMPAT_MOUSE_WINDOW => false,
                _ => {
                    self.last_touch = None;
                    true
                }
            },
        }
    }

    /// Forget any recent touch input.
    pub fn reset(&mut self) {
        self.last_touch = None;
    }
}
