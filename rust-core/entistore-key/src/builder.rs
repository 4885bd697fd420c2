// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reusable builders for fully qualified keys.

use crate::error::{KeyError, KeyResult};
use crate::fragment::{self, Wildcard};
use crate::key::{check_reserved_prefix, validate_namespace, Key};

/// Accumulates the parts of a key and compiles them into a [`Key`].
///
/// Resulting key structure: `[__namespace__:]parentKey:key[:wildcard]`.
///
/// Either a key, a parent key or a wildcard must be set. A key built with a
/// wildcard is a scan pattern and must only be used for pattern-matching
/// operations, never for single-entity reads or writes.
///
/// The builder keeps its string buffers across [`KeyBuilder::reset`], so one
/// instance can compose many keys without reallocating.
///
/// ```rust
/// use entistore_key::{KeyBuilder, Wildcard};
///
/// let mut builder = KeyBuilder::new();
/// builder
///     .with_namespace("group1")
///     .with_parent_key("tenant:tenant1")
///     .with_key("product")
///     .with_wildcard(Wildcard::AnyString);
/// let pattern = builder.build_and_reset().unwrap();
/// assert_eq!(pattern.render(), "__group1__:tenant:tenant1:product:*");
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    key: String,
    parent_key: String,
    wildcard: Option<Wildcard>,
    namespace: String,
}

impl KeyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity key (must be a valid key body).
    pub fn with_key(&mut self, key: &str) -> &mut Self {
        self.key.clear();
        self.key.push_str(key);
        self
    }

    /// Set the parent key (must be a valid key body).
    pub fn with_parent_key(&mut self, parent_key: &str) -> &mut Self {
        self.parent_key.clear();
        self.parent_key.push_str(parent_key);
        self
    }

    /// Append a wildcard to the compiled key, turning it into a scan pattern.
    pub fn with_wildcard(&mut self, wildcard: Wildcard) -> &mut Self {
        self.wildcard = Some(wildcard);
        self
    }

    /// Set the namespace used to isolate the compiled key.
    pub fn with_namespace(&mut self, namespace: &str) -> &mut Self {
        self.namespace.clear();
        self.namespace.push_str(namespace);
        self
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        self.key.clear();
        self.parent_key.clear();
        self.wildcard = None;
        self.namespace.clear();
    }

    /// Compile the key.
    pub fn build(&self) -> KeyResult<Key> {
        compile(&self.key, &self.parent_key, self.wildcard, &self.namespace)
    }

    /// Compile the key and reset the builder, whether or not compilation
    /// succeeded.
    pub fn build_and_reset(&mut self) -> KeyResult<Key> {
        let result = self.build();
        self.reset();
        result
    }
}

/// A [`KeyBuilder`] whose namespace is fixed for its whole lifetime.
///
/// [`NamespacedKeyBuilder::reset`] clears the key, parent key and wildcard but
/// never the namespace.
#[derive(Debug, Clone)]
pub struct NamespacedKeyBuilder {
    inner: KeyBuilder,
}

impl NamespacedKeyBuilder {
    /// Create a builder bound to `namespace` (empty for no namespace).
    pub fn new(namespace: &str) -> Self {
        let mut inner = KeyBuilder::new();
        inner.with_namespace(namespace);
        Self { inner }
    }

    /// The fixed namespace.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Set the entity key (must be a valid key body).
    pub fn with_key(&mut self, key: &str) -> &mut Self {
        self.inner.with_key(key);
        self
    }

    /// Set the parent key (must be a valid key body).
    pub fn with_parent_key(&mut self, parent_key: &str) -> &mut Self {
        self.inner.with_parent_key(parent_key);
        self
    }

    /// Append a wildcard to the compiled key, turning it into a scan pattern.
    pub fn with_wildcard(&mut self, wildcard: Wildcard) -> &mut Self {
        self.inner.with_wildcard(wildcard);
        self
    }

    /// Clear the key, parent key and wildcard. The namespace is kept.
    pub fn reset(&mut self) {
        self.inner.key.clear();
        self.inner.parent_key.clear();
        self.inner.wildcard = None;
    }

    /// Compile the key.
    pub fn build(&self) -> KeyResult<Key> {
        self.inner.build()
    }

    /// Compile the key and reset everything except the namespace.
    pub fn build_and_reset(&mut self) -> KeyResult<Key> {
        let result = self.build();
        self.reset();
        result
    }
}

fn compile(
    key: &str,
    parent_key: &str,
    wildcard: Option<Wildcard>,
    namespace: &str,
) -> KeyResult<Key> {
    check_reserved_prefix(&[key, parent_key, namespace])?;
    for part in [key, parent_key] {
        if !part.is_empty() {
            fragment::validate(part)?;
        }
    }
    if !namespace.is_empty() {
        validate_namespace(namespace)?;
    }

    let mut body = fragment::join(&[parent_key, key]);
    if let Some(wildcard) = wildcard {
        body = fragment::build_match_pattern(&body, wildcard);
    }
    if body.is_empty() {
        return Err(KeyError::EmptyComposite);
    }
    fragment::validate(&body)?;
    Ok(Key::new(body, namespace))
}
