// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generic entity store.
//
// Maps typed entities onto a flat key-value namespace. Single-entity
// operations address an entity by its own key body; scope operations
// (`get_all`, `remove_all`, `get_with_pagination`) match
// `[__namespace__:][parent:]entity_kind:*`. Every mutating operation announces
// its change through the store's lifecycle events once the write succeeded.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use entistore_datastore::{KeyValueStore, MAX_SCAN_LIMIT};
use entistore_key::{validate_key_fragment, validate_namespace, Key, NamespacedKeyBuilder, Wildcard};
use tracing::{debug, info};

use crate::codec::{Codec, JsonCodec};
use crate::config::EntityStoreConfig;
use crate::entity::Entity;
use crate::error::{EntityStoreError, EntityStoreResult};
use crate::events::{EntityEventKind, EntityEvents};

/// One page of a cursor scan.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCursor<T> {
    /// Cursor for the next call. Zero means the iteration is complete.
    pub cursor: u64,
    /// Entities found in this page. May be empty while `cursor` is non-zero.
    pub entities: Vec<T>,
}

impl<T> EntityCursor<T> {
    /// Whether the scan has finished.
    pub fn is_done(&self) -> bool {
        self.cursor == 0
    }
}

/// A reusable store for one entity kind in one namespace.
///
/// The store is safe to share between tasks. Its only mutable state is the
/// listener registries of its lifecycle events.
///
/// # Example
///
/// ```rust
/// use entistore::{Entity, EntityStore};
/// use entistore_datastore::InMemoryStore;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Product {
///     id: String,
/// }
///
/// impl Entity for Product {
///     fn key(&self) -> String {
///         format!("product:{}", self.id)
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let store: EntityStore<Product, _> =
///     EntityStore::new("product", "shop", InMemoryStore::new()).unwrap();
///
/// let key = store.add(&Product { id: "p1".into() }, None).await.unwrap();
/// assert_eq!(key, "product:p1");
///
/// let product = store.get(&key).await.unwrap();
/// assert_eq!(product, Some(Product { id: "p1".into() }));
/// assert_eq!(store.get_all("").await.unwrap().len(), 1);
/// # });
/// ```
pub struct EntityStore<T, S, C = JsonCodec> {
    entity_kind: String,
    namespace: String,
    store: S,
    codec: C,
    default_ttl: Option<Duration>,
    max_page_size: usize,
    on_added: EntityEvents,
    on_updated: EntityEvents,
    on_removed: EntityEvents,
    on_flushed: EntityEvents,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S, C> EntityStore<T, S, C>
where
    T: Entity,
    S: KeyValueStore,
    C: Codec<T>,
{
    /// Create a store for `entity_kind`, isolated under `namespace` (empty for
    /// none), using the codec's default instance.
    pub fn new(entity_kind: &str, namespace: &str, store: S) -> EntityStoreResult<Self>
    where
        C: Default,
    {
        Self::with_codec(entity_kind, namespace, store, C::default())
    }

    /// Create a store with an explicit codec instance.
    pub fn with_codec(
        entity_kind: &str,
        namespace: &str,
        store: S,
        codec: C,
    ) -> EntityStoreResult<Self> {
        if entity_kind.is_empty() {
            return Err(EntityStoreError::EmptyEntityKind);
        }
        validate_key_fragment(entity_kind)?;
        if !namespace.is_empty() {
            validate_namespace(namespace)?;
        }
        Ok(Self {
            entity_kind: entity_kind.to_string(),
            namespace: namespace.to_string(),
            store,
            codec,
            default_ttl: None,
            max_page_size: MAX_SCAN_LIMIT,
            on_added: EntityEvents::new(EntityEventKind::Added),
            on_updated: EntityEvents::new(EntityEventKind::Updated),
            on_removed: EntityEvents::new(EntityEventKind::Removed),
            on_flushed: EntityEvents::new(EntityEventKind::Flushed),
            _entity: PhantomData,
        })
    }

    /// Create a store from a validated [`EntityStoreConfig`].
    pub fn from_config(config: &EntityStoreConfig, store: S) -> EntityStoreResult<Self>
    where
        C: Default,
    {
        config.validate()?;
        let namespace = config.namespace.as_deref().unwrap_or_default();
        let mut entity_store = Self::new(&config.entity_kind, namespace, store)?;
        entity_store.default_ttl = config.default_ttl();
        entity_store.max_page_size = config.max_page_size;
        Ok(entity_store)
    }

    /// The entity kind this store manages.
    pub fn entity_kind(&self) -> &str {
        &self.entity_kind
    }

    /// The namespace name, or `""` when the store has none.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The TTL used by [`Self::add_default`] and [`Self::add_batch_default`].
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// A key builder bound to this store's namespace.
    pub fn new_key_builder(&self) -> NamespacedKeyBuilder {
        NamespacedKeyBuilder::new(&self.namespace)
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Listeners for entities written by `add` and `add_batch`.
    pub fn on_added(&self) -> &EntityEvents {
        &self.on_added
    }

    /// Listeners for entity updates. Never emitted by the store itself.
    pub fn on_updated(&self) -> &EntityEvents {
        &self.on_updated
    }

    /// Listeners for removed entities.
    pub fn on_removed(&self) -> &EntityEvents {
        &self.on_removed
    }

    /// Listeners for namespace flushes.
    pub fn on_flushed(&self) -> &EntityEvents {
        &self.on_flushed
    }

    /// Add an entity, overwriting any entity stored under the same key.
    ///
    /// Returns the entity key. `ttl` of `None` keeps the entity forever.
    pub async fn add(&self, entity: &T, ttl: Option<Duration>) -> EntityStoreResult<String> {
        let entity_key = entity.key();
        let key = self.new_key_builder().with_key(&entity_key).build()?;
        let payload = self.encode(&entity_key, entity)?;

        self.store.put(&key, &payload, ttl).await?;
        debug!(entity_kind = %self.entity_kind, key = %key, "entity added");

        self.on_added.emit(vec![entity_key.clone()]);
        Ok(entity_key)
    }

    /// [`Self::add`] with the store's default TTL.
    pub async fn add_default(&self, entity: &T) -> EntityStoreResult<String> {
        self.add(entity, self.default_ttl).await
    }

    /// Add many entities in one store request.
    ///
    /// Every key and payload is prepared before anything is written, so an
    /// invalid key or encoding failure aborts the whole batch. A failure in
    /// the store itself is surfaced as is and not rolled back. An empty batch
    /// is a no-op.
    pub async fn add_batch(
        &self,
        entities: &[T],
        ttl: Option<Duration>,
    ) -> EntityStoreResult<Vec<String>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = self.new_key_builder();
        let mut keys = Vec::with_capacity(entities.len());
        let mut entity_keys = Vec::with_capacity(entities.len());
        let mut payloads = Vec::with_capacity(entities.len());
        for entity in entities {
            let entity_key = entity.key();
            keys.push(builder.with_key(&entity_key).build_and_reset()?);
            payloads.push(self.encode(&entity_key, entity)?);
            entity_keys.push(entity_key);
        }

        self.store.put_multi(&keys, &payloads, ttl).await?;
        debug!(entity_kind = %self.entity_kind, count = keys.len(), "entities added");

        self.on_added.emit(entity_keys.clone());
        Ok(entity_keys)
    }

    /// [`Self::add_batch`] with the store's default TTL.
    pub async fn add_batch_default(&self, entities: &[T]) -> EntityStoreResult<Vec<String>> {
        self.add_batch(entities, self.default_ttl).await
    }

    /// Remove the entity stored under `entity_key`. An empty key is a no-op.
    pub async fn remove(&self, entity_key: &str) -> EntityStoreResult<()> {
        if entity_key.is_empty() {
            return Ok(());
        }
        let key = self.new_key_builder().with_key(entity_key).build()?;

        self.store.delete(std::slice::from_ref(&key)).await?;
        debug!(entity_kind = %self.entity_kind, key = %key, "entity removed");

        self.on_removed.emit(vec![entity_key.to_string()]);
        Ok(())
    }

    /// Remove many entities in one store request.
    ///
    /// The removed event carries every requested key, including keys that did
    /// not exist. An empty slice is a no-op.
    pub async fn remove_by_keys<K: AsRef<str>>(&self, entity_keys: &[K]) -> EntityStoreResult<()> {
        if entity_keys.is_empty() {
            return Ok(());
        }
        let keys = self.storage_keys(entity_keys.iter().map(|key| key.as_ref()))?;

        self.store.delete(&keys).await?;
        debug!(entity_kind = %self.entity_kind, count = keys.len(), "entities removed");

        self.on_removed
            .emit(entity_keys.iter().map(|k| k.as_ref().to_string()).collect());
        Ok(())
    }

    /// Remove every entity of this kind under `parent_key` (empty for the
    /// whole namespace).
    ///
    /// Enumerates the scope in one blocking pass, so the cost grows with the
    /// size of the scope.
    pub async fn remove_all(&self, parent_key: &str) -> EntityStoreResult<()> {
        let pattern = self.scope_pattern(parent_key)?;
        let keys = self.store.get_keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(());
        }

        self.store.delete(&keys).await?;
        debug!(
            entity_kind = %self.entity_kind,
            pattern = %pattern,
            count = keys.len(),
            "entities removed by scope"
        );

        self.on_removed
            .emit(keys.iter().map(|key| key.body().to_string()).collect());
        Ok(())
    }

    /// Fetch one entity.
    ///
    /// Returns `Ok(None)` for an empty key and
    /// [`EntityStoreError::NotFound`] when nothing is stored under the key.
    pub async fn get(&self, entity_key: &str) -> EntityStoreResult<Option<T>> {
        if entity_key.is_empty() {
            return Ok(None);
        }
        let key = self.new_key_builder().with_key(entity_key).build()?;
        let payload = self.store.get(&key).await?;
        debug!(entity_kind = %self.entity_kind, key = %key, "entity fetched");
        self.decode(&key.render(), &payload).map(Some)
    }

    /// Fetch many entities in one store request.
    ///
    /// Empty keys are skipped and missing entities are omitted, so the result
    /// may be shorter than the input.
    pub async fn get_by_keys<K: AsRef<str>>(&self, entity_keys: &[K]) -> EntityStoreResult<Vec<T>> {
        let keys = self.storage_keys(
            entity_keys
                .iter()
                .map(|key| key.as_ref())
                .filter(|key| !key.is_empty()),
        )?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let payloads = self.store.get_multi(&keys).await?;
        debug!(
            entity_kind = %self.entity_kind,
            requested = keys.len(),
            found = payloads.len(),
            "entities fetched"
        );
        self.decode_all(&keys, payloads)
    }

    /// Fetch every entity of this kind under `parent_key` (empty for the whole
    /// namespace).
    ///
    /// Enumerates the scope in one blocking pass. Prefer
    /// [`Self::get_with_pagination`] for large scopes.
    pub async fn get_all(&self, parent_key: &str) -> EntityStoreResult<Vec<T>> {
        let pattern = self.scope_pattern(parent_key)?;
        let keys = self.store.get_keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let payloads = self.store.get_multi(&keys).await?;
        debug!(entity_kind = %self.entity_kind, pattern = %pattern, count = payloads.len(), "entities fetched by scope");
        self.decode_all(&keys, payloads)
    }

    /// Fetch one page of entities of this kind under `parent_key`.
    ///
    /// Start with cursor `0` and repeat with the returned cursor until it is
    /// `0` again. `limit` is a hint: zero or anything at or above the maximum
    /// page size is clamped to the maximum. Pages are weakly consistent: an
    /// entity may appear more than once, entities written during the scan may
    /// or may not appear, and a page may be empty before the scan is done.
    pub async fn get_with_pagination(
        &self,
        cursor: u64,
        limit: usize,
        parent_key: &str,
    ) -> EntityStoreResult<EntityCursor<T>> {
        let limit = if limit == 0 || limit >= self.max_page_size {
            self.max_page_size
        } else {
            limit
        };
        let pattern = self.scope_pattern(parent_key)?;

        let (keys, next) = self
            .store
            .get_keys_with_cursor(cursor, limit, &pattern)
            .await?;
        debug!(
            entity_kind = %self.entity_kind,
            cursor,
            next,
            count = keys.len(),
            "entity page scanned"
        );
        if keys.is_empty() {
            return Ok(EntityCursor {
                cursor: next,
                entities: Vec::new(),
            });
        }

        let payloads = self.store.get_multi(&keys).await?;
        Ok(EntityCursor {
            cursor: next,
            entities: self.decode_all(&keys, payloads)?,
        })
    }

    /// Whether an entity is stored under `entity_key`. An empty key is
    /// reported as absent without contacting the store.
    pub async fn exists(&self, entity_key: &str) -> EntityStoreResult<bool> {
        if entity_key.is_empty() {
            return Ok(false);
        }
        let key = self.new_key_builder().with_key(entity_key).build()?;
        Ok(self.store.exists(&key).await?)
    }

    /// Delete every key in this store's namespace, whatever its entity kind.
    ///
    /// Intended for tearing down test data.
    ///
    /// # Panics
    ///
    /// Panics if the store has no namespace, since flushing would otherwise
    /// wipe the un-namespaced keyspace.
    pub async fn flush(&self) -> EntityStoreResult<()> {
        assert!(
            !self.namespace.is_empty(),
            "flush called on an entity store without a namespace"
        );
        let pattern = self
            .new_key_builder()
            .with_wildcard(Wildcard::AnyString)
            .build()?;

        self.store.delete_match(&pattern).await?;
        info!(
            entity_kind = %self.entity_kind,
            namespace = %self.namespace,
            store = self.store.name(),
            "namespace flushed"
        );

        self.on_flushed.emit(Vec::new());
        Ok(())
    }

    /// `[parent:]entity_kind:*` in this store's namespace.
    fn scope_pattern(&self, parent_key: &str) -> EntityStoreResult<Key> {
        Ok(self
            .new_key_builder()
            .with_parent_key(parent_key)
            .with_key(&self.entity_kind)
            .with_wildcard(Wildcard::AnyString)
            .build()?)
    }

    fn storage_keys<'a>(
        &self,
        entity_keys: impl Iterator<Item = &'a str>,
    ) -> EntityStoreResult<Vec<Key>> {
        let mut builder = self.new_key_builder();
        entity_keys
            .map(|entity_key| {
                builder
                    .with_key(entity_key)
                    .build_and_reset()
                    .map_err(EntityStoreError::from)
            })
            .collect()
    }

    fn encode(&self, entity_key: &str, entity: &T) -> EntityStoreResult<Vec<u8>> {
        self.codec
            .encode(entity)
            .map_err(|source| EntityStoreError::Encode {
                key: entity_key.to_string(),
                source,
            })
    }

    fn decode(&self, key: &str, payload: &[u8]) -> EntityStoreResult<T> {
        self.codec
            .decode(payload)
            .map_err(|source| EntityStoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Decode a `get_multi` result. Misses are omitted by the store, so when
    /// the lengths differ a failing payload is reported against the scope of
    /// keys requested rather than a single key.
    fn decode_all(&self, keys: &[Key], payloads: Vec<Vec<u8>>) -> EntityStoreResult<Vec<T>> {
        let aligned = keys.len() == payloads.len();
        payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| {
                let key = match keys.get(i) {
                    Some(key) if aligned => key.render(),
                    _ => format!("one of {} requested keys", keys.len()),
                };
                self.decode(&key, payload)
            })
            .collect()
    }
}

impl<T, S: KeyValueStore, C> fmt::Debug for EntityStore<T, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("entity_kind", &self.entity_kind)
            .field("namespace", &self.namespace)
            .field("store", &self.store.name())
            .field("default_ttl", &self.default_ttl)
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}
