// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding configuration: gesture and policy kinds, and the option-token resolver.
//!
//! ## Tokens
//!
//! A binding is declared as an ordered list of tokens such as `["double", "throttle", "2s"]`.
//! Each token may carry an argument after a colon (`"once:save"`). Only the second
//! colon-separated segment is used as the argument. The first segment is classified in
//! priority order:
//!
//! 1. a [duration](crate::time::parse_duration) sets [`Options::duration`],
//! 2. a gesture name sets [`Options::gesture`],
//! 3. a policy name sets [`Options::policy`].
//!
//! Anything else is ignored. Tokens are applied in declared order, so later tokens win.
//!
//! ```
//! use understory_gesture::config::{GestureKind, Options, PolicyKind};
//!
//! let opts = Options::resolve(["double", "debounce:row-7", "1s", "sparkle"], None);
//! assert_eq!(opts.gesture, GestureKind::Double);
//! assert_eq!(opts.policy, Some(PolicyKind::Debounce));
//! assert_eq!(opts.duration, Some(1000.0));
//! assert_eq!(opts.argument.as_deref(), Some("row-7"));
//! ```

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use crate::time::parse_duration;

/// Canonical timeout for every timed gesture and policy, in milliseconds.
///
/// Used for the single-click safety window, and for the double-click window, hold
/// duration, throttle interval, and debounce interval when no duration is configured.
pub const DEFAULT_TIMEOUT: f64 = 300.0;

/// Which gesture a binding recognizes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum GestureKind {
    /// A press followed by a release.
    #[default]
    Single,
    /// Two clicks within the double-click window.
    Double,
    /// A press held for the hold duration.
    Hold,
    /// Every press.
    Press,
    /// Every release.
    Release,
}

impl GestureKind {
    /// All gesture kinds.
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::Double,
        Self::Hold,
        Self::Press,
        Self::Release,
    ];

    /// Token name for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Hold => "hold",
            Self::Press => "press",
            Self::Release => "release",
        }
    }

    /// Look up a kind by its exact token name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

/// Temporal policy applied between recognition and dispatch.
///
/// The absence of a policy (`None` in [`Options::policy`]) dispatches every trigger.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PolicyKind {
    /// Dispatch the first trigger, then detach.
    Once,
    /// Leading-edge throttle with refresh.
    Throttle,
    /// Trailing-edge debounce.
    Debounce,
}

impl PolicyKind {
    /// All policy kinds.
    pub const ALL: [Self; 3] = [Self::Once, Self::Throttle, Self::Debounce];

    /// Token name for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Throttle => "throttle",
            Self::Debounce => "debounce",
        }
    }

    /// Look up a kind by its exact token name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

/// The comparable part of a binding configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    /// Gesture to recognize.
    pub gesture: GestureKind,
    /// Policy between trigger and dispatch, if any.
    pub policy: Option<PolicyKind>,
    /// Duration override in milliseconds for hold, double, throttle, and debounce.
    pub duration: Option<f64>,
    /// Argument passed to the callback.
    pub argument: Option<String>,
}

impl Options {
    /// Resolve options from ordered tokens and an optional explicit argument.
    ///
    /// Never fails: unrecognized tokens are skipped. An explicit `argument` overrides any
    /// argument carried by a token.
    pub fn resolve<'a, I>(tokens: I, argument: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Self::default();
        for token in tokens {
            let mut segments = token.split(':');
            let head = segments.next().unwrap_or(token);
            // Segments past the second are dropped.
            if let Some(arg) = segments.next().filter(|a| !a.is_empty()) {
                out.argument = Some(arg.to_string());
            }
            if let Some(ms) = parse_duration(head) {
                out.duration = Some(ms);
            } else if let Some(g) = GestureKind::from_name(head) {
                out.gesture = g;
            } else if let Some(p) = PolicyKind::from_name(head) {
                out.policy = Some(p);
            }
        }
        if let Some(arg) = argument {
            out.argument = Some(arg.to_string());
        }
        out
    }

    /// The configured duration, or [`DEFAULT_TIMEOUT`].
    pub fn duration_or_default(&self) -> f64 {
        self.duration.unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// User callback receiving the configured argument.
pub type Callback = Box<dyn FnMut(Option<&str>)>;

/// A resolved configuration: [`Options`] plus the callback to dispatch.
pub struct Configuration {
    /// Resolved options.
    pub options: Options,
    pub(crate) callback: Callback,
}

impl core::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Configuration")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    /// Wrap `options` with a no-op callback.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            callback: Box::new(|_: Option<&str>| {}),
        }
    }

    /// Resolve tokens (see [`Options::resolve`]) with a no-op callback.
    pub fn resolve<'a, I>(tokens: I, argument: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(Options::resolve(tokens, argument))
    }

    /// Replace the callback.
    #[must_use]
    pub fn with_callback(mut self, callback: impl FnMut(Option<&str>) + 'static) -> Self {
        self.callback = Box::new(callback);
        self
    }

    /// Invoke the callback with the configured argument.
    pub fn dispatch(&mut self) {
        (self.callback)(self.options.argument.as_deref());
    }
}

impl From<Options> for Configuration {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}
