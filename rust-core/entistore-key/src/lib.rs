// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entistore Key Namespace Engine
//
// Rules for composing, validating and pattern-matching hierarchical storage
// keys, with optional namespace isolation for multi-tenant keyspaces.
//
// # Modules
//
// - [`fragment`] -- Raw key-body primitives: validate, build, join, split and
//   glob pattern construction.
// - [`key`] -- The `Key` value type, namespace rendering and parsing.
// - [`builder`] -- Reusable `KeyBuilder` and `NamespacedKeyBuilder`.
// - [`entity_key`] -- Structured entity and tenant key helpers.
// - [`error`] -- The `KeyError` enum.
//
// # Example
//
// ```rust
// use entistore_key::{Key, KeyBuilder};
//
// let mut builder = KeyBuilder::new();
// builder.with_namespace("app1").with_key("product:p1");
// let key = builder.build_and_reset().unwrap();
//
// assert_eq!(key.render(), "__app1__:product:p1");
// assert_eq!(Key::parse(&key.render()).unwrap(), key);
// ```

pub mod builder;
pub mod entity_key;
pub mod error;
pub mod fragment;
pub mod key;

pub use builder::{KeyBuilder, NamespacedKeyBuilder};
pub use entity_key::{entity_key, tenant_key, TENANT_KIND};
pub use error::{KeyError, KeyResult};
pub use fragment::{build, build_match_pattern, join, split, validate, Wildcard, DELIMITER, MAX_KEY_LENGTH};
pub use key::{
    generate_random_key, validate_key_fragment, validate_namespace, Key, RANDOM_KEY_LENGTH,
    RESERVED_NAMESPACE_DELIMITER,
};
