// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fully qualified storage keys with optional namespace isolation.
//
// A namespace is rendered by wrapping its lower-cased name in the reserved
// `__` token on both sides and prepending it to the key body:
//
// ```text
// [__namespace__:]parentKey:entityKind:entityKeyBody[:wildcard]
// ```
//
// Because no fragment may begin with `__`, a rendered key can always be split
// back into its namespace and body.

use std::fmt;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

use crate::error::{KeyError, KeyResult};
use crate::fragment::{self, DELIMITER};

/// Token placed before and after each namespace name.
pub const RESERVED_NAMESPACE_DELIMITER: &str = "__";

/// Length of keys produced by [`generate_random_key`].
pub const RANDOM_KEY_LENGTH: usize = 10;

const RANDOM_KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn namespace_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(__[A-Za-z0-9_]+__):?").expect("namespace prefix pattern is a valid regex")
    })
}

/// Wrap a namespace name in the reserved delimiter.
fn wrap_namespace(namespace: &str) -> String {
    if namespace.is_empty() {
        return String::new();
    }
    format!(
        "{RESERVED_NAMESPACE_DELIMITER}{}{RESERVED_NAMESPACE_DELIMITER}",
        namespace.to_lowercase()
    )
}

/// Reject fragments that begin with the reserved namespace token.
///
/// Empty fragments are accepted; callers decide whether emptiness matters.
pub(crate) fn check_reserved_prefix(fragments: &[&str]) -> KeyResult<()> {
    for fragment in fragments {
        if fragment.starts_with(RESERVED_NAMESPACE_DELIMITER) {
            return Err(KeyError::ReservedPrefix {
                fragment: fragment.to_string(),
                reserved: RESERVED_NAMESPACE_DELIMITER,
            });
        }
    }
    Ok(())
}

/// Validate a single key fragment supplied by a caller.
///
/// The fragment must not begin with the reserved namespace token and must be a
/// valid key on its own.
pub fn validate_key_fragment(fragment: &str) -> KeyResult<()> {
    check_reserved_prefix(&[fragment])?;
    fragment::validate(fragment)
}

/// Validate a namespace name.
///
/// Namespaces follow the fragment rules, must be a single fragment and may only
/// use `[A-Za-z0-9_]`, the set a rendered namespace prefix is parsed with.
pub fn validate_namespace(namespace: &str) -> KeyResult<()> {
    validate_key_fragment(namespace)?;
    if namespace.contains(DELIMITER) {
        return Err(KeyError::FragmentContainsDelimiter {
            fragment: namespace.to_string(),
            delimiter: DELIMITER,
        });
    }
    if !namespace
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(KeyError::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}

/// Generate a random key of [`RANDOM_KEY_LENGTH`] characters.
///
/// The result only uses `[a-z0-9]` and is always a valid key fragment, which
/// makes it suitable as a throwaway namespace for isolating test data.
pub fn generate_random_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RANDOM_KEY_LENGTH)
        .map(|_| RANDOM_KEY_ALPHABET[rng.gen_range(0..RANDOM_KEY_ALPHABET.len())] as char)
        .collect()
}

/// A fully qualified storage key: a key body plus an optional namespace.
///
/// Two keys are equal when their rendered forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// Namespace in its wrapped form (`__name__`), or empty.
    namespace: String,
    /// Delimited key body.
    body: String,
}

impl Key {
    /// Create a key from a body and a namespace.
    ///
    /// The namespace is wrapped and lower-cased unless it is already in its
    /// wrapped form. An empty namespace means "no namespace".
    pub fn new(body: impl Into<String>, namespace: &str) -> Self {
        let namespace = if namespace.starts_with(RESERVED_NAMESPACE_DELIMITER) {
            namespace.to_string()
        } else {
            wrap_namespace(namespace)
        };
        Self {
            namespace,
            body: body.into(),
        }
    }

    /// Parse a rendered key back into its body and namespace.
    ///
    /// Only the body is held to the key rules, so a body at the maximum length
    /// still parses once the namespace prefix is added.
    ///
    /// ```rust
    /// use entistore_key::Key;
    ///
    /// let key = Key::parse("__app1__:tenant:tenant1:product:product-1").unwrap();
    /// assert_eq!(key.body(), "tenant:tenant1:product:product-1");
    /// assert_eq!(key.namespace_name(), "app1");
    /// ```
    pub fn parse(rendered: &str) -> KeyResult<Self> {
        if let Some(captures) = namespace_prefix().captures(rendered) {
            if let (Some(full), Some(wrapped)) = (captures.get(0), captures.get(1)) {
                let body = &rendered[full.end()..];
                fragment::validate(body)?;
                return Ok(Self {
                    namespace: wrapped.as_str().to_string(),
                    body: body.to_string(),
                });
            }
        }
        fragment::validate(rendered)?;
        Ok(Self::new(rendered, ""))
    }

    /// The key body, without any namespace.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The namespace in its wrapped form (`__name__`), or `""`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The namespace name with the reserved delimiters stripped.
    pub fn namespace_name(&self) -> &str {
        self.namespace
            .strip_prefix(RESERVED_NAMESPACE_DELIMITER)
            .and_then(|ns| ns.strip_suffix(RESERVED_NAMESPACE_DELIMITER))
            .unwrap_or(&self.namespace)
    }

    /// Whether the key carries a namespace.
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Render the key in its storage form: `[__namespace__:]body`.
    pub fn render(&self) -> String {
        fragment::join(&[self.namespace.as_str(), self.body.as_str()])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
