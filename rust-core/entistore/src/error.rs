// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for the entity store.

use entistore_datastore::DatastoreError;
use entistore_key::KeyError;
use thiserror::Error;

use crate::codec::CodecError;

/// Errors returned by [`crate::EntityStore`] operations.
#[derive(Debug, Error)]
pub enum EntityStoreError {
    /// The store was created without an entity kind.
    #[error("entitystore: entity kind must not be empty")]
    EmptyEntityKind,

    /// No entity is stored under the given key.
    #[error("entitystore: entity not found: {0}")]
    NotFound(String),

    /// A key, parent key, entity kind or namespace failed validation.
    #[error("entitystore: {0}")]
    Key(#[from] KeyError),

    /// An entity could not be serialized.
    #[error("entitystore: failed to encode entity with key '{key}': {source}")]
    Encode {
        /// Key of the offending entity.
        key: String,
        /// Codec failure.
        source: CodecError,
    },

    /// A stored payload could not be deserialized.
    #[error("entitystore: failed to decode entity with key '{key}': {source}")]
    Decode {
        /// Storage key of the offending payload.
        key: String,
        /// Codec failure.
        source: CodecError,
    },

    /// The key-value store failed.
    #[error("entitystore: {0}")]
    Datastore(DatastoreError),

    /// An [`crate::EntityStoreConfig`] is not usable.
    #[error("entitystore: invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EntityStoreError {
    /// Whether this error means the requested entity is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<DatastoreError> for EntityStoreError {
    fn from(err: DatastoreError) -> Self {
        match err {
            DatastoreError::KeyNotFound(key) => Self::NotFound(key),
            DatastoreError::Key(err) => Self::Key(err),
            other => Self::Datastore(other),
        }
    }
}

/// Result type for entity store operations.
pub type EntityStoreResult<T> = Result<T, EntityStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EntityStoreError::EmptyEntityKind.to_string(),
            "entitystore: entity kind must not be empty"
        );
        assert_eq!(
            EntityStoreError::NotFound("__ns__:a:b".to_string()).to_string(),
            "entitystore: entity not found: __ns__:a:b"
        );
        let err = EntityStoreError::Decode {
            key: "a:b".to_string(),
            source: CodecError::Decode {
                codec: "json",
                reason: "eof".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "entitystore: failed to decode entity with key 'a:b': json decode failed: eof"
        );
    }

    #[test]
    fn test_datastore_not_found_maps_to_not_found() {
        let err: EntityStoreError = DatastoreError::KeyNotFound("k".to_string()).into();
        assert!(err.is_not_found());
        assert!(matches!(err, EntityStoreError::NotFound(ref k) if k == "k"));
    }

    #[test]
    fn test_other_datastore_errors_are_wrapped() {
        let err: EntityStoreError = DatastoreError::BackendUnavailable("down".to_string()).into();
        assert!(!err.is_not_found());
        assert!(matches!(err, EntityStoreError::Datastore(_)));

        let err: EntityStoreError = DatastoreError::Key(KeyError::Empty).into();
        assert!(matches!(err, EntityStoreError::Key(KeyError::Empty)));
    }
}
