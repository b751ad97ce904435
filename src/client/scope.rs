//! Scoped catalog override

use super::Client;
use crate::catalog::CatalogOverride;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Client view with a catalog override in effect
///
/// Created by [`Client::catalog`]. Every operation called through the scope
/// uses the overridden catalog unless a per-call `catalog_url` is given. The
/// override is removed when the scope is dropped, including on early return
/// and unwinding. Scopes nest.
#[must_use = "the override is removed as soon as the scope is dropped"]
pub struct CatalogScope<'a> {
    client: &'a mut Client,
    restore_to: usize,
}

impl<'a> CatalogScope<'a> {
    pub(super) fn new(client: &'a mut Client, catalog: CatalogOverride) -> Self {
        debug!("Enter catalog scope {}", catalog.catalog_url);
        let restore_to = client.context.push(catalog);
        Self { client, restore_to }
    }
}

impl Deref for CatalogScope<'_> {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl DerefMut for CatalogScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.client
    }
}

impl Drop for CatalogScope<'_> {
    fn drop(&mut self) {
        self.client.context.restore(self.restore_to);
        debug!("Leave catalog scope (depth {})", self.restore_to);
    }
}

impl std::fmt::Debug for CatalogScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogScope")
            .field("catalog", &self.client.context.active_override())
            .field("restore_to", &self.restore_to)
            .finish()
    }
}
