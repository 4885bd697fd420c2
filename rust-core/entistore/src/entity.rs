// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

/// An application type that can be persisted by an [`crate::EntityStore`].
///
/// The returned key must already encode whatever hierarchy the application
/// needs (tenant, kind, id, version), typically via
/// [`entistore_key::entity_key`]. The store treats it as an opaque key body.
/// Scope operations (`get_all`, `remove_all`, `get_with_pagination`) only see
/// entities whose key starts with `[parent_key:]entity_kind:`.
///
/// ```rust
/// use entistore::Entity;
/// use entistore_key::{entity_key, tenant_key};
///
/// struct Product {
///     tenant: String,
///     id: String,
/// }
///
/// impl Entity for Product {
///     fn key(&self) -> String {
///         let parent = tenant_key(&self.tenant).unwrap_or_default();
///         entity_key("product", &self.id, None, Some(&parent)).unwrap_or_default()
///     }
/// }
///
/// let product = Product { tenant: "t1".into(), id: "p1".into() };
/// assert_eq!(product.key(), "tenant:t1:product:p1");
/// ```
pub trait Entity {
    /// The entity's structured, unique key body.
    fn key(&self) -> String;
}
