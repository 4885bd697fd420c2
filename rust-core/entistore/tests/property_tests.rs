// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for entity store scans

use std::collections::HashSet;

use entistore::{Entity, EntityStore};
use entistore_datastore::InMemoryStore;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    tenant: String,
    id: String,
}

impl Entity for Item {
    fn key(&self) -> String {
        format!("tenant:{}:item:{}", self.tenant, self.id)
    }
}

/// Generate distinct item ids
fn arb_ids() -> impl Strategy<Value = HashSet<String>> {
    prop::collection::hash_set("[a-z0-9]{1,8}", 0..60)
}

/// Generate requested page sizes, including ones that get clamped
fn arb_limit() -> impl Strategy<Value = usize> {
    prop_oneof![Just(0usize), 1usize..20, Just(1000usize), Just(5000usize)]
}

fn items(tenant: &str, ids: &HashSet<String>) -> Vec<Item> {
    ids.iter()
        .map(|id| Item {
            tenant: tenant.to_string(),
            id: id.clone(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_pagination_yields_every_entity_in_scope(
        ids in arb_ids(),
        noise in arb_ids(),
        limit in arb_limit(),
    ) {
        let rt = Runtime::new().unwrap();
        let (seen, calls) = rt.block_on(async {
            let store: EntityStore<Item, _> =
                EntityStore::new("item", "props", InMemoryStore::new()).unwrap();
            store.add_batch(&items("t1", &ids), None).await.unwrap();
            store.add_batch(&items("t2", &noise), None).await.unwrap();

            let mut cursor = 0;
            let mut calls = 0usize;
            let mut seen = HashSet::new();
            loop {
                let page = store.get_with_pagination(cursor, limit, "tenant:t1").await.unwrap();
                calls += 1;
                seen.extend(page.entities.into_iter().map(|item| item.id));
                if page.cursor == 0 || calls > 1000 {
                    break;
                }
                cursor = page.cursor;
            }
            (seen, calls)
        });

        prop_assert!(calls <= 1000);
        prop_assert_eq!(seen, ids);
    }

    #[test]
    fn test_get_all_matches_remove_all(
        ids in arb_ids(),
    ) {
        let rt = Runtime::new().unwrap();
        let (fetched, removed, left) = rt.block_on(async {
            let store: EntityStore<Item, _> =
                EntityStore::new("item", "props", InMemoryStore::new()).unwrap();
            store.add_batch(&items("t1", &ids), None).await.unwrap();

            let fetched: HashSet<String> = store
                .get_all("tenant:t1")
                .await
                .unwrap()
                .into_iter()
                .map(|item| item.key())
                .collect();

            let removed = std::sync::Arc::new(std::sync::Mutex::new(HashSet::new()));
            let sink = std::sync::Arc::clone(&removed);
            store.on_removed().add_listener(move |event| {
                sink.lock().unwrap().extend(event.keys.iter().cloned());
            });
            store.remove_all("tenant:t1").await.unwrap();
            let left = store.get_all("").await.unwrap().len();
            let removed = removed.lock().unwrap().clone();
            (fetched, removed, left)
        });

        prop_assert_eq!(fetched.len(), ids.len());
        prop_assert_eq!(fetched, removed);
        prop_assert_eq!(left, 0);
    }
}
