// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// redb-backed persistent key-value store.
//
// Uses redb (pure Rust, B-tree, ACID, single-file database) to provide
// durable storage with the same semantics as the in-memory store.
//
// # Design
//
// - One table keyed by the rendered key.
// - Every value is framed with an 8-byte little-endian expiry timestamp in
//   milliseconds since the Unix epoch, `0` meaning "never expires".
// - Expiry is lazy: reads skip expired entries and writes purge the keys they
//   touch.
// - All redb work runs in `tokio::task::spawn_blocking`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use entistore_key::Key;
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition, TableError,
};
use tracing::info;

use crate::error::{DatastoreError, DatastoreResult};
use crate::pattern::GlobPattern;
use crate::store::{clamp_scan_limit, KeyValueStore};

const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

const HEADER_LEN: usize = 8;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn expiry_ms(ttl: Option<Duration>, now: u64) -> u64 {
    match ttl {
        Some(ttl) if !ttl.is_zero() => now.saturating_add(ttl.as_millis() as u64),
        _ => 0,
    }
}

fn encode_frame(value: &[u8], expires_at: u64) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + value.len());
    frame.extend_from_slice(&expires_at.to_le_bytes());
    frame.extend_from_slice(value);
    frame
}

/// Split a stored frame into its expiry timestamp and payload.
fn decode_frame<'a>(key: &str, frame: &'a [u8]) -> DatastoreResult<(u64, &'a [u8])> {
    if frame.len() < HEADER_LEN {
        return Err(DatastoreError::CorruptedData(format!(
            "value for '{key}' is {} bytes, shorter than its {HEADER_LEN}-byte header",
            frame.len()
        )));
    }
    let (header, payload) = frame.split_at(HEADER_LEN);
    let mut bytes = [0u8; HEADER_LEN];
    bytes.copy_from_slice(header);
    Ok((u64::from_le_bytes(bytes), payload))
}

fn is_live(expires_at: u64, now: u64) -> bool {
    expires_at == 0 || expires_at > now
}

fn unavailable(operation: &str, e: impl std::fmt::Display) -> DatastoreError {
    DatastoreError::BackendUnavailable(format!("{operation}: {e}"))
}

fn corrupted(operation: &str, e: impl std::fmt::Display) -> DatastoreError {
    DatastoreError::CorruptedData(format!("{operation}: {e}"))
}

/// A persistent key-value store powered by redb.
///
/// # Example
///
/// ```rust,no_run
/// use entistore_datastore::redb_store::RedbStore;
/// use entistore_datastore::KeyValueStore;
/// use entistore_key::Key;
///
/// # tokio_test::block_on(async {
/// let store = RedbStore::open("/tmp/entistore-test.redb").unwrap();
/// let key = Key::new("product:p1", "app");
/// store.put(&key, b"payload", None).await.unwrap();
/// assert_eq!(store.get(&key).await.unwrap(), b"payload".to_vec());
/// # });
/// ```
pub struct RedbStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbStore {
    /// Open or create a redb database at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> DatastoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(|e| {
            unavailable(&format!("open redb at {}", path.display()), e)
        })?;

        info!(path = %path.display(), "opened redb store");

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    /// Filesystem path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn blocking<T, F>(&self, operation: &'static str, work: F) -> DatastoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> DatastoreResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || work(db.as_ref()))
            .await
            .map_err(|e| unavailable(operation, format!("task join: {e}")))?
    }

    async fn write_entries(
        &self,
        operation: &'static str,
        entries: Vec<(String, Vec<u8>)>,
    ) -> DatastoreResult<()> {
        self.blocking(operation, move |db| {
            let txn = db.begin_write().map_err(|e| unavailable(operation, e))?;
            {
                let mut table = txn.open_table(ENTRIES).map_err(|e| unavailable(operation, e))?;
                for (key, frame) in &entries {
                    table
                        .insert(key.as_str(), frame.as_slice())
                        .map_err(|e| corrupted(&format!("{operation} '{key}'"), e))?;
                }
            }
            txn.commit().map_err(|e| corrupted(operation, e))
        })
        .await
    }

    /// Collect matching live keys, optionally restricted to a slot window.
    async fn scan(
        &self,
        operation: &'static str,
        pattern: &Key,
        window: Option<(usize, usize)>,
    ) -> DatastoreResult<(Vec<Key>, u64)> {
        let glob = GlobPattern::compile(&pattern.render())?;
        self.blocking(operation, move |db| {
            let txn = db.begin_read().map_err(|e| unavailable(operation, e))?;
            let table = match txn.open_table(ENTRIES) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Ok((Vec::new(), 0)),
                Err(e) => return Err(unavailable(operation, e)),
            };
            let total = table.len().map_err(|e| corrupted(operation, e))? as usize;
            let (start, limit) = window.unwrap_or((0, usize::MAX));
            let now = now_ms();

            let mut keys = Vec::new();
            let mut examined = 0usize;
            let iter = table.iter().map_err(|e| corrupted(operation, e))?;
            for entry in iter.skip(start).take(limit) {
                let (rendered, frame) = entry.map_err(|e| corrupted(operation, e))?;
                examined += 1;
                let rendered = rendered.value();
                let (expires_at, _) = decode_frame(rendered, frame.value())?;
                if is_live(expires_at, now) && glob.matches(rendered) {
                    keys.push(Key::parse(rendered)?);
                }
            }

            let position = start.saturating_add(examined);
            let next = if window.is_none() || position >= total {
                0
            } else {
                position as u64
            };
            Ok((keys, next))
        })
        .await
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

#[async_trait]
impl KeyValueStore for RedbStore {
    async fn put(&self, key: &Key, value: &[u8], ttl: Option<Duration>) -> DatastoreResult<()> {
        let frame = encode_frame(value, expiry_ms(ttl, now_ms()));
        self.write_entries("put", vec![(key.render(), frame)]).await
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
        let expires_at = expiry_ms(ttl, now_ms());
        let entries = keys
            .iter()
            .zip(values)
            .map(|(key, value)| (key.render(), encode_frame(value, expires_at)))
            .collect();
        self.write_entries("put_multi", entries).await
    }

    async fn get(&self, key: &Key) -> DatastoreResult<Vec<u8>> {
        let rendered = key.render();
        self.blocking("get", move |db| {
            let txn = db.begin_read().map_err(|e| unavailable("get", e))?;
            let table = match txn.open_table(ENTRIES) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => {
                    return Err(DatastoreError::KeyNotFound(rendered))
                }
                Err(e) => return Err(unavailable("get", e)),
            };
            let stored = table
                .get(rendered.as_str())
                .map_err(|e| corrupted(&format!("get '{rendered}'"), e))?;
            let Some(stored) = stored else {
                return Err(DatastoreError::KeyNotFound(rendered));
            };
            let (expires_at, payload) = decode_frame(&rendered, stored.value())?;
            if !is_live(expires_at, now_ms()) {
                return Err(DatastoreError::KeyNotFound(rendered));
            }
            Ok(payload.to_vec())
        })
        .await
    }

    async fn get_multi(&self, keys: &[Key]) -> DatastoreResult<Vec<Vec<u8>>> {
        let rendered: Vec<String> = keys.iter().map(Key::render).collect();
        self.blocking("get_multi", move |db| {
            let txn = db.begin_read().map_err(|e| unavailable("get_multi", e))?;
            let table = match txn.open_table(ENTRIES) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(e) => return Err(unavailable("get_multi", e)),
            };
            let now = now_ms();
            let mut values = Vec::with_capacity(rendered.len());
            for key in &rendered {
                let stored = table
                    .get(key.as_str())
                    .map_err(|e| corrupted(&format!("get_multi '{key}'"), e))?;
                if let Some(stored) = stored {
                    let (expires_at, payload) = decode_frame(key, stored.value())?;
                    if is_live(expires_at, now) {
                        values.push(payload.to_vec());
                    }
                }
            }
            Ok(values)
        })
        .await
    }

    async fn delete(&self, keys: &[Key]) -> DatastoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let rendered: Vec<String> = keys.iter().map(Key::render).collect();
        self.blocking("delete", move |db| {
            let txn = db.begin_write().map_err(|e| unavailable("delete", e))?;
            {
                let mut table = txn.open_table(ENTRIES).map_err(|e| unavailable("delete", e))?;
                for key in &rendered {
                    table
                        .remove(key.as_str())
                        .map_err(|e| corrupted(&format!("delete '{key}'"), e))?;
                }
            }
            txn.commit().map_err(|e| corrupted("delete", e))
        })
        .await
    }

    async fn exists(&self, key: &Key) -> DatastoreResult<bool> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_keys(&self, pattern: &Key) -> DatastoreResult<Vec<Key>> {
        let (keys, _) = self.scan("get_keys", pattern, None).await?;
        Ok(keys)
    }

    async fn get_keys_with_cursor(
        &self,
        cursor: u64,
        limit: usize,
        pattern: &Key,
    ) -> DatastoreResult<(Vec<Key>, u64)> {
        let start = usize::try_from(cursor).unwrap_or(usize::MAX);
        self.scan("get_keys_with_cursor", pattern, Some((start, clamp_scan_limit(limit))))
            .await
    }

    fn name(&self) -> &str {
        "redb"
    }
}
