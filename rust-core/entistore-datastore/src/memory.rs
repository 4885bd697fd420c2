// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory key-value store.
//
// Uses a `BTreeMap` keyed by the rendered key, wrapped in a tokio `RwLock`.
// Expiry is lazy: expired entries are invisible to every read and are dropped
// by the next write that touches the map. Intended for tests, development and
// small ephemeral datasets.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use entistore_key::Key;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

use crate::error::{DatastoreError, DatastoreResult};
use crate::pattern::GlobPattern;
use crate::store::{clamp_scan_limit, KeyValueStore};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &[u8], ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value: value.to_vec(),
            expires_at: ttl.filter(|ttl| !ttl.is_zero()).map(|ttl| now + ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

type Map = BTreeMap<String, Entry>;

/// An in-memory store backed by a sorted `BTreeMap`.
///
/// All data lives in process memory and is lost on drop. Clones share state.
///
/// The cursor returned by [`KeyValueStore::get_keys_with_cursor`] counts the
/// keyspace slots examined so far, in key order. Each call examines at most
/// `limit` slots, so a page can be empty while the scan is still running.
///
/// # Example
///
/// ```rust
/// use entistore_datastore::{InMemoryStore, KeyValueStore};
/// use entistore_key::Key;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryStore::new();
/// let key = Key::new("product:p1", "app");
/// store.put(&key, b"payload", None).await.unwrap();
/// assert_eq!(store.get(&key).await.unwrap(), b"payload".to_vec());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<Map>>,
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.data
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Whether the store holds no live keys.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining time-to-live of `key`, or `None` when it has no expiry or
    /// does not exist.
    pub async fn ttl(&self, key: &Key) -> Option<Duration> {
        let now = Instant::now();
        let map = self.data.read().await;
        let entry = map.get(&key.render()).filter(|entry| entry.is_live(now))?;
        entry.expires_at.map(|at| at - now)
    }

    fn purge_expired(map: &mut Map, now: Instant) {
        let before = map.len();
        map.retain(|_, entry| entry.is_live(now));
        let purged = before - map.len();
        if purged > 0 {
            trace!(purged, "expired entries dropped");
        }
    }

    fn matching_keys<'a>(
        map: &'a Map,
        pattern: &'a GlobPattern,
        now: Instant,
    ) -> impl Iterator<Item = &'a String> + 'a {
        map.iter()
            .filter(move |(rendered, entry)| entry.is_live(now) && pattern.matches(rendered))
            .map(|(rendered, _)| rendered)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put(&self, key: &Key, value: &[u8], ttl: Option<Duration>) -> DatastoreResult<()> {
        let now = Instant::now();
        let mut map = self.data.write().await;
        Self::purge_expired(&mut map, now);
        map.insert(key.render(), Entry::new(value, ttl, now));
        Ok(())
    }

    async fn put_multi(
        &self,
        keys: &[Key],
        values: &[Vec<u8>],
        ttl: Option<Duration>,
    ) -> DatastoreResult<()> {
        if keys.len() != values.len() {
            return Err(DatastoreError::BatchLengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        if keys.is_empty() {
            return Ok(());
        }
        let now = Instant::now();
        let mut map = self.data.write().await;
        Self::purge_expired(&mut map, now);
        for (key, value) in keys.iter().zip(values) {
            map.insert(key.render(), Entry::new(value, ttl, now));
        }
        Ok(())
    }

    async fn get(&self, key: &Key) -> DatastoreResult<Vec<u8>> {
        let now = Instant::now();
        let rendered = key.render();
        let map = self.data.read().await;
        match map.get(&rendered) {
            Some(entry) if entry.is_live(now) => Ok(entry.value.clone()),
            _ => Err(DatastoreError::KeyNotFound(rendered)),
        }
    }

    async fn get_multi(&self, keys: &[Key]) -> DatastoreResult<Vec<Vec<u8>>> {
        let now = Instant::now();
        let map = self.data.read().await;
        let values = keys
            .iter()
            .filter_map(|key| map.get(&key.render()))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
            .collect();
        Ok(values)
    }

    async fn delete(&self, keys: &[Key]) -> DatastoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let now = Instant::now();
        let mut map = self.data.write().await;
        for key in keys {
            map.remove(&key.render());
        }
        Self::purge_expired(&mut map, now);
        Ok(())
    }

    async fn exists(&self, key: &Key) -> DatastoreResult<bool> {
        let now = Instant::now();
        let map = self.data.read().await;
        Ok(map.get(&key.render()).is_some_and(|entry| entry.is_live(now)))
    }

    async fn get_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        let glob = GlobPattern::compile(&pattern.render())?;
        let now = Instant::now();
        let map = self.data.read().await;
        Self::matching_keys(&map, &glob, now)
            .map(|rendered| Key::parse(rendered).map_err(DatastoreError::from))
            .collect()
    }

    async fn get_keys_with_cursor(
        &self,
        cursor: u64,
        limit: usize,
        pattern: &Key,
    ) -> DatastoreResult<(Vec<Key>, u64)> {
        let glob = GlobPattern::compile(&pattern.render())?;
        let limit = clamp_scan_limit(limit);
        let now = Instant::now();
        let map = self.data.read().await;

        let start = usize::try_from(cursor).unwrap_or(usize::MAX);
        let mut examined = 0usize;
        let mut keys = Vec::new();
        for (rendered, entry) in map.iter().skip(start).take(limit) {
            examined += 1;
            if entry.is_live(now) && glob.matches(rendered) {
                keys.push(Key::parse(rendered)?);
            }
        }

        let position = start.saturating_add(examined);
        let next = if position >= map.len() {
            0
        } else {
            position as u64
        };
        Ok((keys, next))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn key(body: &str) -> Key {
        Key::new(body, "")
    }

    #[tokio::test]
    async fn test_basic_crud() {
        let store = InMemoryStore::new();
        let k = key("product:p1");

        assert!(store.is_empty().await);
        assert!(store.get(&k).await.unwrap_err().is_not_found());
        assert!(!store.exists(&k).await.unwrap());

        store.put(&k, b"value1", None).await.unwrap();
        assert_eq!(store.get(&k).await.unwrap(), b"value1".to_vec());
        assert!(store.exists(&k).await.unwrap());

        store.put(&k, b"updated", None).await.unwrap();
        assert_eq!(store.get(&k).await.unwrap(), b"updated".to_vec());
        assert_eq!(store.len().await, 1);

        store.delete(&[k.clone()]).await.unwrap();
        assert!(store.get(&k).await.unwrap_err().is_not_found());
        assert!(store.is_empty().await);

        // Absent keys are ignored.
        store.delete(&[key("nonexistent")]).await.unwrap();
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = InMemoryStore::new();
        store.put(&Key::new("a", "one"), b"1", None).await.unwrap();
        store.put(&Key::new("a", "two"), b"2", None).await.unwrap();

        assert_eq!(store.get(&Key::new("a", "one")).await.unwrap(), b"1".to_vec());
        assert_eq!(store.get(&Key::new("a", "two")).await.unwrap(), b"2".to_vec());
        assert!(store.get(&key("a")).await.is_err());
    }

    #[tokio::test]
    async fn test_put_multi_and_get_multi() {
        let store = InMemoryStore::new();
        let keys = vec![key("a"), key("b"), key("c")];
        let values = vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()];
        store.put_multi(&keys, &values, None).await.unwrap();

        let found = store
            .get_multi(&[key("c"), key("missing"), key("a")])
            .await
            .unwrap();
        assert_eq!(found, vec![b"3".to_vec(), b"1".to_vec()]);
    }

    #[tokio::test]
    async fn test_put_multi_length_mismatch() {
        let store = InMemoryStore::new();
        let err = store
            .put_multi(&[key("a"), key("b")], &[b"1".to_vec()], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatastoreError::BatchLengthMismatch { keys: 2, values: 1 }
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let store = InMemoryStore::new();
        let short = key("session:1");
        let forever = key("session:2");
        store
            .put(&short, b"x", Some(Duration::from_secs(10)))
            .await
            .unwrap();
        store.put(&forever, b"y", Some(Duration::ZERO)).await.unwrap();

        assert!(store.ttl(&short).await.is_some());
        assert_eq!(store.ttl(&forever).await, None);

        tokio::time::advance(Duration::from_secs(11)).await;

        assert!(!store.exists(&short).await.unwrap());
        assert!(store.get(&short).await.unwrap_err().is_not_found());
        assert!(store.exists(&forever).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_multi_applies_ttl_per_key() {
        let store = InMemoryStore::new();
        let keys = vec![key("a"), key("b")];
        let values = vec![b"1".to_vec(), b"2".to_vec()];
        store
            .put_multi(&keys, &values, Some(Duration::from_secs(5)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(store.get_multi(&keys).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_keys_and_delete_match() {
        let store = InMemoryStore::new();
        store.put(&Key::new("product:1", "ns"), b"1", None).await.unwrap();
        store.put(&Key::new("product:2", "ns"), b"2", None).await.unwrap();
        store.put(&Key::new("tenant:1", "ns"), b"3", None).await.unwrap();
        store.put(&Key::new("product:3", "other"), b"4", None).await.unwrap();

        let pattern = Key::new("product:*", "ns");
        let mut found: Vec<String> = store
            .get_keys(&pattern)
            .await
            .unwrap()
            .iter()
            .map(Key::render)
            .collect();
        found.sort();
        assert_eq!(found, vec!["__ns__:product:1", "__ns__:product:2"]);

        store.delete_match(&pattern).await.unwrap();
        assert!(store.get_keys(&pattern).await.unwrap().is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_get_keys_returns_parsed_namespace() {
        let store = InMemoryStore::new();
        store.put(&Key::new("product:1", "ns"), b"1", None).await.unwrap();

        let keys = store.get_keys(&Key::new("*", "ns")).await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].body(), "product:1");
        assert_eq!(keys[0].namespace_name(), "ns");
    }

    #[tokio::test]
    async fn test_cursor_scan_covers_every_key() {
        let store = InMemoryStore::new();
        for i in 0..25 {
            store
                .put(&Key::new(format!("product:{i}"), "ns"), b"v", None)
                .await
                .unwrap();
        }
        for i in 0..10 {
            store
                .put(&Key::new(format!("tenant:{i}"), "ns"), b"v", None)
                .await
                .unwrap();
        }

        let pattern = Key::new("product:*", "ns");
        let mut cursor = 0;
        let mut seen = HashSet::new();
        let mut calls = 0;
        loop {
            let (page, next) = store.get_keys_with_cursor(cursor, 10, &pattern).await.unwrap();
            assert!(page.len() <= 10);
            seen.extend(page.iter().map(Key::render));
            calls += 1;
            if next == 0 {
                break;
            }
            cursor = next;
        }
        assert_eq!(seen.len(), 25);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_cursor_scan_on_empty_store() {
        let store = InMemoryStore::new();
        let (page, next) = store
            .get_keys_with_cursor(0, 10, &key("*"))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(next, 0);
    }

    #[tokio::test]
    async fn test_scan_keys_deduplicates() {
        let store = InMemoryStore::new();
        for i in 0..2500 {
            store
                .put(&Key::new(format!("item:{i}"), "ns"), b"v", None)
                .await
                .unwrap();
        }
        let keys = store.scan_keys(&Key::new("item:*", "ns")).await.unwrap();
        assert_eq!(keys.len(), 2500);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.put(&key("shared"), b"data", None).await.unwrap();
        assert_eq!(clone.get(&key("shared")).await.unwrap(), b"data".to_vec());
    }

    #[tokio::test]
    async fn test_name() {
        assert_eq!(InMemoryStore::new().name(), "in-memory");
    }
}
