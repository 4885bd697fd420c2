// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entistore
//
// Typed entity storage over a flat key-value namespace. An `EntityStore`
// manages one entity kind in one namespace: it derives storage keys through
// `entistore_key`, serializes entities through a `Codec`, talks to any
// `entistore_datastore::KeyValueStore`, and announces changes through
// synchronous lifecycle events.
//
// # Modules
//
// - [`store`] -- The `EntityStore` engine and `EntityCursor` pages.
// - [`entity`] -- The `Entity` trait.
// - [`codec`] -- JSON, CBOR and protobuf codecs.
// - [`events`] -- Lifecycle events (`EntitiesAdded`, `EntitiesRemoved`, ...).
// - [`config`] -- Serde-loadable store settings.
// - [`error`] -- The `EntityStoreError` enum.
//
// # Example
//
// ```rust
// use std::sync::{Arc, Mutex};
//
// use entistore::{Entity, EntityStore};
// use entistore_datastore::InMemoryStore;
// use serde::{Deserialize, Serialize};
//
// #[derive(Debug, Serialize, Deserialize)]
// struct Order {
//     id: u32,
// }
//
// impl Entity for Order {
//     fn key(&self) -> String {
//         format!("order:{}", self.id)
//     }
// }
//
// # tokio_test::block_on(async {
// let store: EntityStore<Order, _> =
//     EntityStore::new("order", "shop", InMemoryStore::new()).unwrap();
//
// let added = Arc::new(Mutex::new(Vec::new()));
// let sink = Arc::clone(&added);
// store.on_added().add_listener(move |event| {
//     sink.lock().unwrap().extend(event.keys.iter().cloned());
// });
//
// store.add_batch(&[Order { id: 1 }, Order { id: 2 }], None).await.unwrap();
// assert_eq!(*added.lock().unwrap(), vec!["order:1", "order:2"]);
// # });
// ```

pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod store;

pub use codec::{CborCodec, Codec, CodecError, JsonCodec, ProstCodec};
pub use config::EntityStoreConfig;
pub use entity::Entity;
pub use error::{EntityStoreError, EntityStoreResult};
pub use events::{EntityEvent, EntityEventKind, EntityEvents};
pub use store::{EntityCursor, EntityStore};
