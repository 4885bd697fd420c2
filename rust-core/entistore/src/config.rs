// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entity store configuration.

use std::time::Duration;

use entistore_datastore::MAX_SCAN_LIMIT;
use serde::{Deserialize, Serialize};

use crate::error::{EntityStoreError, EntityStoreResult};

/// Settings for one entity store.
///
/// Deserializes from any serde format; missing fields take their defaults.
/// Loading the configuration from disk is left to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStoreConfig {
    /// Logical entity kind. Required.
    pub entity_kind: String,
    /// Namespace isolating every key the store writes.
    pub namespace: Option<String>,
    /// TTL applied by `add_default` and `add_batch_default`. `None` keeps
    /// entities forever.
    pub default_ttl_secs: Option<u64>,
    /// Largest page `get_with_pagination` will request.
    pub max_page_size: usize,
}

impl Default for EntityStoreConfig {
    fn default() -> Self {
        Self {
            entity_kind: String::new(),
            namespace: None,
            default_ttl_secs: None,
            max_page_size: MAX_SCAN_LIMIT,
        }
    }
}

impl EntityStoreConfig {
    /// A configuration for `entity_kind` with every other field defaulted.
    pub fn new(entity_kind: impl Into<String>) -> Self {
        Self {
            entity_kind: entity_kind.into(),
            ..Self::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the default TTL, rounded down to whole seconds.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_secs = Some(ttl.as_secs());
        self
    }

    /// The default TTL as a `Duration`. Zero means no expiry.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Check the settings that do not depend on key validation.
    pub fn validate(&self) -> EntityStoreResult<()> {
        if self.entity_kind.is_empty() {
            return Err(EntityStoreError::EmptyEntityKind);
        }
        if self.max_page_size == 0 || self.max_page_size > MAX_SCAN_LIMIT {
            return Err(EntityStoreError::InvalidConfig(format!(
                "max_page_size must be between 1 and {MAX_SCAN_LIMIT}, got {}",
                self.max_page_size
            )));
        }
        Ok(())
    }
}
