// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metrics-collecting wrapper for key-value stores.
//
// Wraps any `KeyValueStore` and transparently collects operation counts,
// latency sums and byte totals. The entity store tests use it to check that
// empty-input calls never reach the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use entistore_key::Key;
use tokio::sync::RwLock;

use crate::error::DatastoreResult;
use crate::store::KeyValueStore;

/// Accumulated statistics for a store.
///
/// All counters increase monotonically until [`MetricsStore::reset_stats`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    /// Keys read through `get` and `get_multi`.
    pub get_count: u64,
    /// Keys written through `put` and `put_multi`.
    pub put_count: u64,
    /// Number of `delete` calls.
    pub delete_count: u64,
    /// Number of `exists` calls.
    pub exists_count: u64,
    /// Number of `get_keys` and `get_keys_with_cursor` calls.
    pub scan_count: u64,
    /// Cumulative wall-clock latency of reads, in milliseconds.
    pub get_latency_sum_ms: f64,
    /// Cumulative wall-clock latency of writes, in milliseconds.
    pub put_latency_sum_ms: f64,
    /// Total value bytes returned by reads.
    pub total_bytes_read: u64,
    /// Total value bytes accepted by writes.
    pub total_bytes_written: u64,
}

impl StoreStats {
    /// Total number of store calls recorded, of any kind.
    pub fn total_calls(&self) -> u64 {
        self.get_count + self.put_count + self.delete_count + self.exists_count + self.scan_count
    }
}

/// A store wrapper that collects operation metrics.
///
/// # Example
///
/// ```rust
/// use entistore_datastore::{InMemoryStore, KeyValueStore, MetricsStore};
/// use entistore_key::Key;
///
/// # tokio_test::block_on(async {
/// let metered = MetricsStore::new(InMemoryStore::new());
/// let key = Key::new("k", "");
///
/// metered.put(&key, b"value", None).await.unwrap();
/// metered.get(&key).await.unwrap();
///
/// let stats = metered.stats().await;
/// assert_eq!(stats.put_count, 1);
/// assert_eq!(stats.get_count, 1);
/// # });
/// ```
pub struct MetricsStore<S: KeyValueStore> {
    inner: S,
    stats: Arc<RwLock<StoreStats>>,
}

impl<S: KeyValueStore> MetricsStore<S> {
    /// Wrap `inner` with metrics collection.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: Arc::new(RwLock::new(StoreStats::default())),
        }
    }

    /// Return a snapshot of the current statistics.
    pub async fn stats(&self) -> StoreStats {
        self.stats.read().await.clone()
    }

    /// Reset all statistics to zero.
    pub async fn reset_stats(&self) {
        *self.stats.write().await = StoreStats::default();
    }

    /// Return a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for MetricsStore<S> {
    async fn put(&self, key: &Key, value: &[u8], ttl: Option<Duration>) -> DatastoreResult<()> {
        let start = Instant::now();
        let result = self.inner.put(key, value, ttl).await;
        let elapsed = elapsed_ms(start);

        let mut s = self.stats.write().await;
        s.put_count += 1;
        s.put_latency_sum_ms += elapsed;
        if result.is_ok() {
            s.total_bytes_written += value.len() as u64;
        }
        result
    }

    async fn put_multi(
        &self,
        keys: &[Key],
        values: &[Vec<u8>],
        ttl: Option<Duration>,
    ) -> DatastoreResult<()> {
        let start = Instant::now();
        let result = self.inner.put_multi(keys, values, ttl).await;
        let elapsed = elapsed_ms(start);

        let mut s = self.stats.write().await;
        s.put_count += keys.len() as u64;
        s.put_latency_sum_ms += elapsed;
        if result.is_ok() {
            s.total_bytes_written += values.iter().map(|v| v.len() as u64).sum::<u64>();
        }
        result
    }

    async fn get(&self, key: &Key) -> DatastoreResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.inner.get(key).await;
        let elapsed = elapsed_ms(start);

        let mut s = self.stats.write().await;
        s.get_count += 1;
        s.get_latency_sum_ms += elapsed;
        if let Ok(ref value) = result {
            s.total_bytes_read += value.len() as u64;
        }
        result
    }

    async fn get_multi(&self, keys: &[Key]) -> DatastoreResult<Vec<Vec<u8>>> {
        let start = Instant::now();
        let result = self.inner.get_multi(keys).await;
        let elapsed = elapsed_ms(start);

        let mut s = self.stats.write().await;
        s.get_count += keys.len() as u64;
        s.get_latency_sum_ms += elapsed;
        if let Ok(ref values) = result {
            s.total_bytes_read += values.iter().map(|v| v.len() as u64).sum::<u64>();
        }
        result
    }

    async fn delete(&self, keys: &[Key]) -> DatastoreResult<()> {
        self.stats.write().await.delete_count += 1;
        self.inner.delete(keys).await
    }

    async fn exists(&self, key: &Key) -> DatastoreResult<bool> {
        self.stats.write().await.exists_count += 1;
        self.inner.exists(key).await
    }

    async fn get_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        self.stats.write().await.scan_count += 1;
        self.inner.get_keys(pattern).await
    }

    async fn get_keys_with_cursor(
        &self,
        cursor: u64,
        limit: usize,
        pattern: &Key,
    ) -> DatastoreResult<(Vec<Key>, u64)> {
        self.stats.write().await.scan_count += 1;
        self.inner.get_keys_with_cursor(cursor, limit, pattern).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
