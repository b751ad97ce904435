// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # cbsodata
//!
//! Client for the Statistics Netherlands (CBS) OData catalogs: the main
//! open data catalog (`opendata.cbs.nl`) and the third-party catalog
//! (`dataderden.cbs.nl`).
//!
//! ## Features
//!
//! - **Table metadata**: `TableInfos`, the catalog table list and any other
//!   metadata entity set
//! - **Data download**: follows `odata.nextLink` until the last page
//! - **Narrowing**: `$select` as a string or a column list, `$filter` passed
//!   through
//! - **Catalog selection**: configured default, scoped override or per-call
//!   argument
//! - **Persistence**: one JSON file per resource, or Parquet from the CLI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cbsodata::{Client, DataRequest, Options, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = Client::new(Options::new().with_https(true))?;
//!
//!     let info = client.get_info("82010NED", None).await?;
//!     println!("{:?}", info.description());
//!
//!     let request = DataRequest::new().select(vec!["ID", "Perioden"]);
//!     let data = client.get_data("82010NED", &request).await?;
//!
//!     // Third-party catalog for a few calls
//!     let derden = client.catalog("dataderden.cbs.nl");
//!     let tables = derden.get_table_list(None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Client                             │
//! │  get_info  get_table_list  get_meta  get_data  download_data │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────┬───┴─────────┬────────────┬────────┐
//! │  Catalog   │    HTTP     │  Paginate   │   OData    │ Output │
//! ├────────────┼─────────────┼─────────────┼────────────┼────────┤
//! │ Precedence │ Retry       │ nextLink    │ Pages      │ JSON   │
//! │ Scopes     │ Throttle    │ Stream      │ $select    │ Parquet│
//! │ URLs       │ Proxy       │ Loop check  │ $filter    │        │
//! └────────────┴─────────────┴─────────────┴────────────┴────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Options: file, environment and builder
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// OData wire types
pub mod odata;

/// Catalog resolution and scoped overrides
pub mod catalog;

/// nextLink pagination
pub mod pagination;

/// JSON and Parquet output
pub mod output;

/// The client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use catalog::Catalog;
pub use client::{CatalogScope, Client, DataRequest, TableDownload, TableInfo};
pub use config::{Options, DEFAULT_CATALOG_URL, DERDEN_CATALOG_URL};
pub use odata::{DatasetKind, QueryOptions, ResourceLink, Select};
pub use pagination::Pages;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
