// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entistore Datastore
//
// The key-value store contract the entity store is written against, plus
// reference backends. Keys are fully qualified `entistore_key::Key` values
// and values are opaque byte payloads with an optional time-to-live.
//
// # Modules
//
// - [`store`] -- The `KeyValueStore` trait.
// - [`error`] -- The `DatastoreError` enum.
// - [`pattern`] -- Redis-style glob patterns used by key scans.
// - [`memory`] -- An in-memory `BTreeMap` store with lazy expiry.
// - [`metrics`] -- A transparent wrapper that collects operation statistics.
// - `redb_store` -- A persistent single-file store (feature `redb-backend`).
//
// # Example
//
// ```rust
// use entistore_datastore::{InMemoryStore, KeyValueStore, MetricsStore};
// use entistore_key::Key;
//
// # tokio_test::block_on(async {
// let store = MetricsStore::new(InMemoryStore::new());
// store.put(&Key::new("product:1", "shop"), b"one", None).await.unwrap();
// store.put(&Key::new("product:2", "shop"), b"two", None).await.unwrap();
//
// let keys = store.get_keys(&Key::new("product:*", "shop")).await.unwrap();
// assert_eq!(keys.len(), 2);
// assert_eq!(store.stats().await.put_count, 2);
// # });
// ```

pub mod error;
pub mod memory;
pub mod metrics;
pub mod pattern;
pub mod store;

#[cfg(feature = "redb-backend")]
pub mod redb_store;

pub use error::{DatastoreError, DatastoreResult};
pub use memory::InMemoryStore;
pub use metrics::{MetricsStore, StoreStats};
pub use pattern::GlobPattern;
pub use store::{clamp_scan_limit, KeyValueStore, MAX_SCAN_LIMIT};

#[cfg(feature = "redb-backend")]
pub use redb_store::RedbStore;
