// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Datastore error types.
//
// Single-key misses are reported as `KeyNotFound` so callers can tell
// "absent" apart from "failed". Backend failures carry the operation and the
// offending key in their message.

use entistore_key::KeyError;
use thiserror::Error;

/// Errors that can occur when interacting with a key-value store.
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// The requested key was not found.
    #[error("datastore: key not found: {0}")]
    KeyNotFound(String),

    /// A batch write received a different number of keys and values.
    #[error("datastore: batch has {keys} keys but {values} values")]
    BatchLengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A scan pattern could not be compiled.
    #[error("datastore: invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending glob pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A key read back from the store failed to parse.
    #[error("datastore: {0}")]
    Key(#[from] KeyError),

    /// The storage backend is not available.
    #[error("datastore: backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The stored data is corrupted or in an unexpected format.
    #[error("datastore: corrupted data: {0}")]
    CorruptedData(String),

    /// An I/O error occurred in the underlying storage layer.
    #[error("datastore: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatastoreError {
    /// Whether this error is a single-key miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatastoreError::KeyNotFound(_))
    }
}

/// Convenience type alias for datastore results.
pub type DatastoreResult<T> = Result<T, DatastoreError>;
