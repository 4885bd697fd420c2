// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-event notification point.

use rand::rngs::StdRng;

use crate::emitter::EventEmitter;
use crate::token::ListenerToken;

/// An event target bound to one event name, with its own listener registry.
#[derive(Debug)]
pub struct EventTarget<A> {
    emitter: EventEmitter<A>,
    event_name: String,
}

impl<A> EventTarget<A> {
    /// Create a target for `event_name`.
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            emitter: EventEmitter::new(),
            event_name: event_name.into(),
        }
    }

    /// Create a target whose listener tokens are drawn from `rng`.
    pub fn with_rng(event_name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            emitter: EventEmitter::with_rng(rng),
            event_name: event_name.into(),
        }
    }

    /// The event name this target emits under.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Register a listener and return its token.
    pub fn add_listener<F>(&self, listener: F) -> ListenerToken
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.emitter.add_listener(&self.event_name, listener)
    }

    /// Remove a listener by token. Returns `false` if it was not registered.
    pub fn remove_listener(&self, token: &ListenerToken) -> bool {
        self.emitter.remove_listener(&self.event_name, token)
    }

    /// Remove every listener. Returns whether any existed.
    pub fn remove_all_listeners(&self) -> bool {
        self.emitter.remove_all_listeners(&self.event_name)
    }

    /// Synchronously invoke every listener. Returns whether any existed.
    pub fn emit(&self, args: &A) -> bool {
        self.emitter.emit(&self.event_name, args)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.emitter.listener_count(&self.event_name)
    }
}
