//! Catalog resolution
//!
//! Decides which host, scheme and OData service a request goes to.
//!
//! # Precedence
//!
//! 1. Per-call `catalog_url` argument
//! 2. Innermost active scoped override
//! 3. The configured [`Options`](crate::config::Options)
//!
//! Resolution never touches the network; a bad host only fails once the
//! first request is sent.

mod context;
mod resolver;

pub use context::{CatalogContext, CatalogOverride};
pub use resolver::Catalog;
