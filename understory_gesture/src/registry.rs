// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Many bindings over one host event source.
//!
//! ## Overview
//!
//! [`Gestures`] owns the host [`EventSource`] and every [`Binding`] attached through it.
//! [`Gestures::attach`] returns a [`BindingId`] detach handle. The host routes each raw event
//! to the node it occurred on with [`Gestures::handle_event`] and drives time with
//! [`Gestures::advance`] at [`Gestures::next_deadline`].
//!
//! When a node leaves the UI, [`Gestures::remove_node`] detaches everything bound to it.
//!
//! ## Handles
//!
//! A [`BindingId`] is a slot index plus a generation. Slots of detached bindings are reused
//! with a higher generation, so a stale handle never refers to a newer binding.
//! [`Gestures::detach`] on a stale or already detached handle is a no-op that returns `false`.
//! This includes bindings that detached themselves through the `once` policy.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_gesture::config::Configuration;
//! use understory_gesture::input::{Channels, EventSource, InputEvent};
//! use understory_gesture::registry::Gestures;
//!
//! #[derive(Default)]
//! struct Host;
//! impl EventSource<u32> for Host {
//!     fn subscribe(&mut self, _node: u32, _channels: Channels) {}
//!     fn unsubscribe(&mut self, _node: u32, _channels: Channels) {}
//! }
//!
//! let clicks = Rc::new(Cell::new(0));
//! let c = clicks.clone();
//! let mut gestures: Gestures<u32, Host> = Gestures::new(Host);
//! let id = gestures.attach(
//!     1,
//!     Configuration::resolve(["double"], None).with_callback(move |_| c.set(c.get() + 1)),
//! );
//!
//! for t in [0.0, 100.0] {
//!     gestures.handle_event(1, &InputEvent::mouse_down(t));
//!     gestures.handle_event(1, &InputEvent::mouse_up(t + 30.0));
//! }
//! assert_eq!(clicks.get(), 1);
//!
//! assert!(gestures.detach(id));
//! assert!(!gestures.detach(id));
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::binding::Binding;
use crate::config::{Configuration, Options};
use crate::input::{Disposition, EventSource, InputEvent};

/// Detach handle for a binding in [`Gestures`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BindingId(u32, u32);

impl BindingId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "BindingId uses 32-bit indices by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Slot<K> {
    generation: u32,
    binding: Option<Binding<K>>,
}

/// Registry of gesture bindings sharing one host event source.
pub struct Gestures<K, S> {
    source: S,
    slots: Vec<Slot<K>>,
    free_list: Vec<usize>,
}

impl<K, S: Debug> Debug for Gestures<K, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.slots.iter().filter(|s| s.binding.is_some()).count();
        f.debug_struct("Gestures")
            .field("source", &self.source)
            .field("slots_total", &self.slots.len())
            .field("bindings_alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Debug, S: EventSource<K>> Gestures<K, S> {
    /// Create an empty registry over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// The host event source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The host event source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Attach a binding for `config` on `node`.
    pub fn attach(&mut self, node: K, config: impl Into<Configuration>) -> BindingId {
        let binding = Binding::attach(&mut self.source, node, config.into());
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.saturating_add(1);
            slot.binding = Some(binding);
            (idx, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                binding: Some(binding),
            });
            (self.slots.len() - 1, 1)
        };
        BindingId::new(idx, generation)
    }

    /// Detach the binding behind `id`.
    ///
    /// Returns `false` if `id` is stale, unknown, or already detached.
    pub fn detach(&mut self, id: BindingId) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(id.idx())
            .filter(|s| s.generation == id.1)
        else {
            return false;
        };
        let Some(mut binding) = slot.binding.take() else {
            return false;
        };
        self.free_list.push(id.idx());
        binding.detach(&mut self.source)
    }

    /// Detach every binding on `node`, returning how many were detached.
    pub fn remove_node(&mut self, node: K) -> usize {
        let mut count = 0;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.binding.as_ref().is_some_and(|b| b.node() == node) {
                if let Some(mut b) = slot.binding.take() {
                    count += usize::from(b.detach(&mut self.source));
                }
                self.free_list.push(idx);
            }
        }
        count
    }

    /// Route a raw input event that occurred on `node` to its bindings.
    ///
    /// Returns the strongest [`Disposition`] across the node's bindings.
    pub fn handle_event(&mut self, node: K, event: &InputEvent) -> Disposition {
        let mut out = Disposition::Ignored;
        for slot in &mut self.slots {
            if let Some(b) = slot.binding.as_mut().filter(|b| b.node() == node) {
                out = out.merge(b.handle_event(&mut self.source, event));
            }
        }
        self.prune();
        out
    }

    /// Fire every timer due at or before `now`, across all bindings.
    pub fn advance(&mut self, now: f64) {
        for slot in &mut self.slots {
            if let Some(b) = slot.binding.as_mut() {
                b.advance(&mut self.source, now);
            }
        }
        self.prune();
    }

    /// Earliest pending deadline across all bindings.
    pub fn next_deadline(&self) -> Option<f64> {
        self.bindings()
            .filter_map(Binding::next_deadline)
            .reduce(f64::min)
    }

    /// Returns `true` if `id` refers to a binding that is still attached.
    pub fn is_attached(&self, id: BindingId) -> bool {
        self.binding(id).is_some_and(Binding::is_attached)
    }

    /// Resolved options of the binding behind `id`.
    pub fn options(&self, id: BindingId) -> Option<&Options> {
        self.binding(id).map(Binding::options)
    }

    /// Handles of all bindings on `node`.
    pub fn bindings_on(&self, node: K) -> impl Iterator<Item = BindingId> + '_ {
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            let b = slot.binding.as_ref()?;
            (b.node() == node).then_some(BindingId::new(idx, slot.generation))
        })
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings().count()
    }

    /// Returns `true` if no binding is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach everything and return the event source.
    pub fn into_source(mut self) -> S {
        for slot in &mut self.slots {
            if let Some(mut b) = slot.binding.take() {
                b.detach(&mut self.source);
            }
        }
        self.source
    }

    fn bindings(&self) -> impl Iterator<Item = &Binding<K>> {
        self.slots.iter().filter_map(|s| s.binding.as_ref())
    }

    fn binding(&self, id: BindingId) -> Option<&Binding<K>> {
        self.slots
            .get(id.idx())
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.binding.as_ref())
    }

    /// Free slots of bindings that detached themselves.
    fn prune(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.binding.as_ref().is_some_and(|b| !b.is_attached()) {
                slot.binding = None;
                self.free_list.push(idx);
            }
        }
    }
}
