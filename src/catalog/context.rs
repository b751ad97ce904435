//! Configured catalog plus the stack of scoped overrides

use super::resolver::Catalog;
use crate::config::Options;

/// One scoped override of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOverride {
    /// Catalog host for the scope
    pub catalog_url: String,
    /// Scheme for the scope; `None` keeps the configured one
    pub use_https: Option<bool>,
}

impl CatalogOverride {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            use_https: None,
        }
    }

    #[must_use]
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = Some(use_https);
        self
    }
}

/// Options plus active overrides, innermost last
#[derive(Debug, Clone, Default)]
pub struct CatalogContext {
    options: Options,
    overrides: Vec<CatalogOverride>,
}

impl CatalogContext {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            overrides: Vec::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Number of active overrides
    pub fn depth(&self) -> usize {
        self.overrides.len()
    }

    /// Innermost active override
    pub fn active_override(&self) -> Option<&CatalogOverride> {
        self.overrides.last()
    }

    /// Push an override, returning the depth to restore to
    pub fn push(&mut self, catalog: CatalogOverride) -> usize {
        let restore_to = self.overrides.len();
        self.overrides.push(catalog);
        restore_to
    }

    /// Drop every override above `depth`
    pub fn restore(&mut self, depth: usize) {
        self.overrides.truncate(depth);
    }

    /// Resolve the catalog for one call
    ///
    /// `catalog_url` wins over the innermost override, which wins over the
    /// configured host. The scheme comes from the innermost override that
    /// sets one, else from the options.
    pub fn resolve(&self, catalog_url: Option<&str>) -> Catalog {
        let host = catalog_url
            .or_else(|| self.active_override().map(|o| o.catalog_url.as_str()))
            .unwrap_or(&self.options.catalog_url);

        let use_https = self
            .overrides
            .iter()
            .rev()
            .find_map(|o| o.use_https)
            .unwrap_or(self.options.use_https);

        Catalog::new(host, use_https, self.options.service)
    }
}
