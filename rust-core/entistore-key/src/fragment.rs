// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw key-body primitives.
//
// A key body is a sequence of fragments joined by `:`. These functions work on
// plain strings and know nothing about namespaces; namespace rendering lives in
// [`crate::key`].

use std::fmt;

use crate::error::{KeyError, KeyResult};

/// Delimiter placed between key fragments.
pub const DELIMITER: char = ':';

/// Maximum length of a key body, in characters.
pub const MAX_KEY_LENGTH: usize = 1024;

/// Glob wildcard appended to a key to turn it into a scan pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// Matches exactly one character (`?`).
    AnyChar,
    /// Matches zero or more characters (`*`).
    AnyString,
}

impl Wildcard {
    /// The glob glyph for this wildcard.
    pub fn as_str(self) -> &'static str {
        match self {
            Wildcard::AnyChar => "?",
            Wildcard::AnyString => "*",
        }
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, ':' | '_' | '-' | '*' | '?' | '[' | ']' | '(' | ')' | ',')
}

/// Validate a key body.
///
/// A valid key is non-empty, at most [`MAX_KEY_LENGTH`] characters, uses only
/// letters, digits and `: _ - * ? [ ] ( ) ,`, and neither starts nor ends with
/// the delimiter.
pub fn validate(key: &str) -> KeyResult<()> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    let length = key.chars().count();
    if length > MAX_KEY_LENGTH {
        return Err(KeyError::TooLong {
            key: key.to_string(),
            length,
            max: MAX_KEY_LENGTH,
        });
    }
    if !key.chars().all(is_allowed_char) {
        return Err(KeyError::InvalidCharacters(key.to_string()));
    }
    if key.starts_with(DELIMITER) || key.ends_with(DELIMITER) {
        return Err(KeyError::DelimiterBoundary {
            key: key.to_string(),
            delimiter: DELIMITER,
        });
    }
    Ok(())
}

/// Compose a key from individual fragments.
///
/// Empty fragments are skipped and every fragment is lower-cased. A fragment
/// that itself contains the delimiter is rejected so the resulting structure
/// stays unambiguous. The composed key is validated before it is returned.
///
/// ```rust
/// assert_eq!(entistore_key::build(&["Entity", "", "123"]).unwrap(), "entity:123");
/// ```
pub fn build(fragments: &[&str]) -> KeyResult<String> {
    let mut lowered = Vec::with_capacity(fragments.len());
    for fragment in fragments.iter().filter(|f| !f.is_empty()) {
        if fragment.contains(DELIMITER) {
            return Err(KeyError::FragmentContainsDelimiter {
                fragment: fragment.to_string(),
                delimiter: DELIMITER,
            });
        }
        lowered.push(fragment.to_lowercase());
    }
    let key = join(&lowered);
    validate(&key)?;
    Ok(key)
}

/// Join already-valid keys with the delimiter, skipping empty ones.
pub fn join<S: AsRef<str>>(keys: &[S]) -> String {
    let mut joined = String::new();
    for key in keys.iter().map(AsRef::as_ref).filter(|k| !k.is_empty()) {
        if !joined.is_empty() {
            joined.push(DELIMITER);
        }
        joined.push_str(key);
    }
    joined
}

/// Split a key body into its fragments.
pub fn split(key: &str) -> Vec<&str> {
    key.split(DELIMITER).collect()
}

/// Build a glob scan pattern from a base key.
///
/// The result is only meaningful for pattern-matching operations and must
/// never be used as a literal storage key. An empty base yields the bare
/// wildcard glyph.
pub fn build_match_pattern(base_key: &str, wildcard: Wildcard) -> String {
    if base_key.is_empty() {
        return wildcard.as_str().to_string();
    }
    format!("{base_key}{DELIMITER}{wildcard}")
}
