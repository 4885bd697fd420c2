// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key validation errors for Entistore.
//
// Every variant describes an invalid key. They are raised synchronously while
// a key is composed, before any storage I/O takes place.

use thiserror::Error;

/// Errors raised while validating or composing a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key is the empty string.
    #[error("invalid key: key must not be empty")]
    Empty,

    /// The key exceeds the maximum allowed length.
    #[error("invalid key: key '{key}' is {length} characters long (max: {max})")]
    TooLong {
        /// The offending key.
        key: String,
        /// Actual length in characters.
        length: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The key contains characters outside the allowed set.
    #[error("invalid key: key '{0}' contains invalid characters")]
    InvalidCharacters(String),

    /// The key starts or ends with the fragment delimiter.
    #[error("invalid key: key '{key}' must not start or end with '{delimiter}'")]
    DelimiterBoundary {
        /// The offending key.
        key: String,
        /// The fragment delimiter.
        delimiter: char,
    },

    /// A single fragment contains the fragment delimiter.
    #[error("invalid key: key fragment '{fragment}' must not contain delimiter '{delimiter}'")]
    FragmentContainsDelimiter {
        /// The offending fragment.
        fragment: String,
        /// The fragment delimiter.
        delimiter: char,
    },

    /// A fragment begins with the token reserved for namespace wrapping.
    #[error("invalid key: key fragment '{fragment}' must not start with reserved namespace prefix '{reserved}'")]
    ReservedPrefix {
        /// The offending fragment.
        fragment: String,
        /// The reserved namespace token.
        reserved: &'static str,
    },

    /// A namespace uses characters outside `[A-Za-z0-9_]`.
    #[error("invalid key: namespace '{0}' may only contain letters, digits and '_'")]
    InvalidNamespace(String),

    /// Composition produced an empty key body.
    #[error("invalid key: composed key must not be empty")]
    EmptyComposite,

    /// A required component of a structured key was not supplied.
    #[error("invalid key: {0} must not be empty")]
    MissingComponent(&'static str),
}

/// Convenience type alias for key results.
pub type KeyResult<T> = Result<T, KeyError>;
