// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-value store contract consumed by the entity store.
//
// Keys are fully qualified `Key` values and are stored under their rendered
// form. Values are opaque byte payloads. Scans take a `Key` whose body is a
// glob pattern (see [`crate::pattern`]).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use entistore_key::Key;

use crate::error::DatastoreResult;

/// Largest page a cursor scan will request.
pub const MAX_SCAN_LIMIT: usize = 1000;

/// Clamp a requested scan page size into `1..=MAX_SCAN_LIMIT`.
///
/// Zero and anything above the maximum fall back to the maximum.
pub fn clamp_scan_limit(limit: usize) -> usize {
    if limit == 0 || limit > MAX_SCAN_LIMIT {
        MAX_SCAN_LIMIT
    } else {
        limit
    }
}

/// An external key-value store.
///
/// Implementations must be safe to share across threads and tokio tasks.
/// No method retries internally; every failure is returned to the caller.
/// Cancellation is by dropping the returned future.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// `ttl` of `None` or zero means the key never expires.
    async fn put(&self, key: &Key, value: &[u8], ttl: Option<Duration>) -> DatastoreResult<()>;

    /// Store many values in one request, applying `ttl` to every key.
    ///
    /// `keys` and `values` must have the same length. An empty batch is a
    /// no-op. The write is not guaranteed to be atomic.
    async fn put_multi(
        &self,
        keys: &[Key],
        values: &[Vec<u8>],
        ttl: Option<Duration>,
    ) -> DatastoreResult<()>;

    /// Retrieve the value stored under `key`.
    ///
    /// Returns [`crate::DatastoreError::KeyNotFound`] when the key is absent.
    async fn get(&self, key: &Key) -> DatastoreResult<Vec<u8>>;

    /// Retrieve many values in one request.
    ///
    /// Values are returned in input order. Missing keys are silently omitted,
    /// so the result may be shorter than `keys`.
    async fn get_multi(&self, keys: &[Key]) -> DatastoreResult<Vec<Vec<u8>>>;

    /// Delete the given keys. Absent keys are ignored; an empty slice is a
    /// no-op.
    async fn delete(&self, keys: &[Key]) -> DatastoreResult<()>;

    /// Whether `key` exists.
    async fn exists(&self, key: &Key) -> DatastoreResult<bool>;

    /// Enumerate every key matching `pattern` in one blocking pass.
    async fn get_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>>;

    /// Advance an incremental scan over keys matching `pattern`.
    ///
    /// Start with cursor `0` and call again with the returned cursor until it
    /// is `0`. `limit` is a hint clamped by [`clamp_scan_limit`]. The scan is
    /// weakly consistent: a page may be empty while the cursor is non-zero, a
    /// key may be returned more than once, and keys mutated mid-scan may or
    /// may not appear.
    async fn get_keys_with_cursor(
        &self,
        cursor: u64,
        limit: usize,
        pattern: &Key,
    ) -> DatastoreResult<(Vec<Key>, u64)>;

    /// A human-readable name for this store, used in logging.
    fn name(&self) -> &str;

    /// Delete every key matching `pattern`. Blocking, like [`Self::get_keys`].
    async fn delete_match(&self, pattern: &Key) -> DatastoreResult<()> {
        let keys = self.get_keys(pattern).await?;
        if keys.is_empty() {
            return Ok(());
        }
        self.delete(&keys).await
    }

    /// Drive a cursor scan to completion and de-duplicate the result.
    ///
    /// Non-blocking with respect to the store, but may miss keys added or
    /// removed during the iteration.
    async fn scan_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        let mut cursor = 0;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        loop {
            let (page, next) = self
                .get_keys_with_cursor(cursor, MAX_SCAN_LIMIT, pattern)
                .await?;
            for key in page {
                if seen.insert(key.render()) {
                    keys.push(key);
                }
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }
}

/// A shared store is itself a store, so several entity stores can sit on one
/// backend.
#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn put(&self, key: &Key, value: &[u8], ttl: Option<Duration>) -> DatastoreResult<()> {
        (**self).put(key, value, ttl).await
    }

    async fn put_multi(
        &self,
        keys: &[Key],
        values: &[Vec<u8>],
        ttl: Option<Duration>,
    ) -> DatastoreResult<()> {
        (**self).put_multi(keys, values, ttl).await
    }

    async fn get(&self, key: &Key) -> DatastoreResult<Vec<u8>> {
        (**self).get(key).await
    }

    async fn get_multi(&self, keys: &[Key]) -> DatastoreResult<Vec<Vec<u8>>> {
        (**self).get_multi(keys).await
    }

    async fn delete(&self, keys: &[Key]) -> DatastoreResult<()> {
        (**self).delete(keys).await
    }

    async fn exists(&self, key: &Key) -> DatastoreResult<bool> {
        (**self).exists(key).await
    }

    async fn get_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        (**self).get_keys(pattern).await
    }

    async fn get_keys_with_cursor(
        &self,
        cursor: u64,
        limit: usize,
        pattern: &Key,
    ) -> DatastoreResult<(Vec<Key>, u64)> {
        (**self).get_keys_with_cursor(cursor, limit, pattern).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn delete_match(&self, pattern: &Key) -> DatastoreResult<()> {
        (**self).delete_match(pattern).await
    }

    async fn scan_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        (**self).scan_keys(pattern).await
    }
}
