// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entity lifecycle events.
//
// Every store owns one `EntityEvents` per lifecycle kind. Listeners run
// synchronously on the task that performed the write, after the write has
// succeeded. A listener that wants asynchronous work hands it off itself,
// for example through a channel or `tokio::spawn`.

use std::fmt;

use entistore_events::{EventTarget, ListenerToken};

/// The kind of lifecycle change an [`EntityEvent`] announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityEventKind {
    /// Entities were written by `add` or `add_batch`.
    Added,
    /// Entities were deleted.
    Removed,
    /// Reserved for stores that distinguish updates from inserts. The entity
    /// store itself never emits it.
    Updated,
    /// The whole namespace was flushed.
    Flushed,
}

impl EntityEventKind {
    /// The event name listeners are registered under.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Added => "EntitiesAdded",
            Self::Removed => "EntitiesRemoved",
            Self::Updated => "EntitiesUpdated",
            Self::Flushed => "EntitiesFlushed",
        }
    }
}

impl fmt::Display for EntityEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Payload delivered to lifecycle listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEvent {
    /// What happened.
    pub kind: EntityEventKind,
    /// Entity key bodies affected. Empty for [`EntityEventKind::Flushed`].
    pub keys: Vec<String>,
}

/// Listener registry for one lifecycle event of one store.
pub struct EntityEvents {
    kind: EntityEventKind,
    target: EventTarget<EntityEvent>,
}

impl EntityEvents {
    pub(crate) fn new(kind: EntityEventKind) -> Self {
        Self {
            kind,
            target: EventTarget::new(kind.event_name()),
        }
    }

    /// The lifecycle kind this registry announces.
    pub fn kind(&self) -> EntityEventKind {
        self.kind
    }

    /// Register a listener and return the token that removes it.
    pub fn add_listener<F>(&self, listener: F) -> ListenerToken
    where
        F: Fn(&EntityEvent) + Send + Sync + 'static,
    {
        self.target.add_listener(listener)
    }

    /// Remove one listener. Returns `false` if the token is unknown.
    pub fn remove_listener(&self, token: &ListenerToken) -> bool {
        self.target.remove_listener(token)
    }

    /// Remove every listener. Returns whether any were registered.
    pub fn remove_all_listeners(&self) -> bool {
        self.target.remove_all_listeners()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.target.listener_count()
    }

    pub(crate) fn emit(&self, keys: Vec<String>) -> bool {
        self.target.emit(&EntityEvent {
            kind: self.kind,
            keys,
        })
    }
}

impl fmt::Debug for EntityEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityEvents")
            .field("kind", &self.kind)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_event_names() {
        assert_eq!(EntityEventKind::Added.to_string(), "EntitiesAdded");
        assert_eq!(EntityEventKind::Removed.to_string(), "EntitiesRemoved");
        assert_eq!(EntityEventKind::Updated.to_string(), "EntitiesUpdated");
        assert_eq!(EntityEventKind::Flushed.to_string(), "EntitiesFlushed");
    }

    #[test]
    fn test_emit_delivers_kind_and_keys() {
        let events = EntityEvents::new(EntityEventKind::Removed);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let token = events.add_listener(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        assert!(events.emit(vec!["a:1".to_string()]));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![EntityEvent {
                kind: EntityEventKind::Removed,
                keys: vec!["a:1".to_string()],
            }]
        );

        assert!(events.remove_listener(&token));
        assert!(!events.emit(vec![]));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_all_listeners() {
        let events = EntityEvents::new(EntityEventKind::Added);
        assert!(!events.remove_all_listeners());
        events.add_listener(|_| {});
        events.add_listener(|_| {});
        assert_eq!(events.listener_count(), 2);
        assert!(events.remove_all_listeners());
        assert_eq!(events.listener_count(), 0);
    }
}
