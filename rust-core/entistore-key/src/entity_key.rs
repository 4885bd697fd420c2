// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured logical keys for entities and tenants.

use crate::error::{KeyError, KeyResult};
use crate::fragment;
use crate::key::check_reserved_prefix;

/// Entity kind used for tenant keys.
pub const TENANT_KIND: &str = "tenant";

/// Build a structured entity key.
///
/// Key structure: `[<parent>:]<kind>:<id>[:<version>]`.
///
/// `kind` and `id` are required. The kind, id and version are lower-cased
/// single fragments; the parent may be any valid key body.
///
/// ```rust
/// use entistore_key::{entity_key, tenant_key};
///
/// let tenant = tenant_key("t1").unwrap();
/// let key = entity_key("product", "P-1", None, Some(&tenant)).unwrap();
/// assert_eq!(key, "tenant:t1:product:p-1");
/// ```
pub fn entity_key(
    kind: &str,
    id: &str,
    version_id: Option<&str>,
    parent_key: Option<&str>,
) -> KeyResult<String> {
    if kind.is_empty() {
        return Err(KeyError::MissingComponent("entity kind"));
    }
    if id.is_empty() {
        return Err(KeyError::MissingComponent("entity id"));
    }
    let version_id = version_id.unwrap_or_default();
    let parent_key = parent_key.unwrap_or_default();
    check_reserved_prefix(&[kind, id, version_id, parent_key])?;

    let key = fragment::build(&[kind, id, version_id])?;
    if parent_key.is_empty() {
        return Ok(key);
    }
    fragment::validate(parent_key)?;
    let joined = fragment::join(&[parent_key, key.as_str()]);
    fragment::validate(&joined)?;
    Ok(joined)
}

/// Build a tenant key: `tenant:<id>`.
pub fn tenant_key(id: &str) -> KeyResult<String> {
    if id.is_empty() {
        return Err(KeyError::MissingComponent("tenant id"));
    }
    check_reserved_prefix(&[id])?;
    fragment::build(&[TENANT_KIND, id])
}
