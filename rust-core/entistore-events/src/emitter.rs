// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-event listener registry.
//
// Listeners run synchronously on the emitting thread, in registration order.
// A listener that wants non-blocking behaviour must hand the work off itself,
// e.g. with `tokio::spawn` or `std::thread::spawn`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::token::ListenerToken;

/// A registered listener callback.
pub type Listener<A> = Arc<dyn Fn(&A) + Send + Sync>;

struct Registration<A> {
    token: ListenerToken,
    listener: Listener<A>,
}

impl<A> Clone for Registration<A> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            listener: Arc::clone(&self.listener),
        }
    }
}

/// A registry of listeners keyed by event name. Safe for concurrent use.
///
/// `emit` snapshots the listener list under a shared lock and releases the
/// lock before invoking anything, so listeners may freely add or remove
/// listeners (including themselves) and emits of different events never block
/// each other. A listener removed while an emit is in flight may still be
/// called by that emit if it was captured in the snapshot.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use entistore_events::EventEmitter;
///
/// let emitter = EventEmitter::<u32>::new();
/// let total = Arc::new(AtomicUsize::new(0));
/// let sink = Arc::clone(&total);
/// let token = emitter.add_listener("tick", move |n: &u32| {
///     sink.fetch_add(*n as usize, Ordering::SeqCst);
/// });
///
/// assert!(emitter.emit("tick", &3));
/// assert!(emitter.remove_listener("tick", &token));
/// assert!(!emitter.emit("tick", &3));
/// assert_eq!(total.load(Ordering::SeqCst), 3);
/// ```
pub struct EventEmitter<A> {
    events: RwLock<HashMap<String, Vec<Registration<A>>>>,
    rng: Mutex<StdRng>,
}

impl<A> EventEmitter<A> {
    /// Create an emitter whose tokens are drawn from an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an emitter that draws tokens from `rng`.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Register `listener` for `event_name` and return its token.
    pub fn add_listener<F>(&self, event_name: &str, listener: F) -> ListenerToken
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let token = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            ListenerToken::generate(&mut *rng)
        };
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        events
            .entry(event_name.to_string())
            .or_default()
            .push(Registration {
                token: token.clone(),
                listener: Arc::new(listener),
            });
        trace!(event = event_name, token = %token, "listener added");
        token
    }

    /// Remove the listener registered under `token`.
    ///
    /// Returns `false` when no such listener exists for `event_name`.
    pub fn remove_listener(&self, event_name: &str, token: &ListenerToken) -> bool {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let Some(registrations) = events.get_mut(event_name) else {
            return false;
        };
        let Some(position) = registrations.iter().position(|r| &r.token == token) else {
            return false;
        };
        registrations.remove(position);
        if registrations.is_empty() {
            events.remove(event_name);
        }
        trace!(event = event_name, token = %token, "listener removed");
        true
    }

    /// Remove every listener for `event_name`. Returns whether any existed.
    pub fn remove_all_listeners(&self, event_name: &str) -> bool {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        events.remove(event_name).is_some()
    }

    /// Invoke every listener for `event_name` with `args`.
    ///
    /// Returns `false` when no listener was registered. A panicking listener
    /// unwinds into the caller and the remaining listeners are skipped.
    pub fn emit(&self, event_name: &str, args: &A) -> bool {
        let snapshot: Vec<Registration<A>> = {
            let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
            match events.get(event_name) {
                Some(registrations) if !registrations.is_empty() => registrations.clone(),
                _ => return false,
            }
        };
        trace!(event = event_name, listeners = snapshot.len(), "emitting");
        for registration in &snapshot {
            (registration.listener)(args);
        }
        true
    }

    /// Number of listeners registered for `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.get(event_name).map_or(0, Vec::len)
    }
}

impl<A> Default for EventEmitter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventEmitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<&str, usize> = events
            .iter()
            .map(|(name, registrations)| (name.as_str(), registrations.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .finish()
    }
}
