// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entistore Event Notification Channel
//
// A named, token-addressable, synchronous multicast registry used to announce
// entity lifecycle changes.
//
// # Modules
//
// - [`emitter`] -- `EventEmitter`, a registry of listeners keyed by event name.
// - [`target`] -- `EventTarget`, a registry bound to a single event name.
// - [`token`] -- `ListenerToken`, the handle used to remove a listener.

pub mod emitter;
pub mod target;
pub mod token;

pub use emitter::{EventEmitter, Listener};
pub use target::EventTarget;
pub use token::{ListenerToken, TOKEN_LENGTH};
