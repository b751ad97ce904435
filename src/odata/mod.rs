//! OData wire types
//!
//! Resource names, response pages and query narrowing for the CBS
//! OData services.

mod page;
mod query;

pub use page::{Page, ResourceLink};
pub use query::{QueryOptions, Select, FILTER_PARAM, FORMAT_PARAM, SELECT_PARAM};

use serde::{Deserialize, Serialize};

/// Table metadata entity set
pub const TABLE_INFOS: &str = "TableInfos";

/// Data as published, all values as strings
pub const UNTYPED_DATASET: &str = "UntypedDataSet";

/// Data with numeric columns typed
pub const TYPED_DATASET: &str = "TypedDataSet";

/// Column descriptions
pub const DATA_PROPERTIES: &str = "DataProperties";

/// Catalog resource listing all tables
pub const CATALOG_TABLES: &str = "ODataCatalog/Tables";

/// Which of the two dataset entity sets to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    Untyped,
    Typed,
}

impl DatasetKind {
    /// Entity set name of this dataset
    pub fn resource(self) -> &'static str {
        match self {
            DatasetKind::Untyped => UNTYPED_DATASET,
            DatasetKind::Typed => TYPED_DATASET,
        }
    }

    /// Entity set name of the variant that is skipped
    pub fn other(self) -> &'static str {
        match self {
            DatasetKind::Untyped => TYPED_DATASET,
            DatasetKind::Typed => UNTYPED_DATASET,
        }
    }
}

#[cfg(test)]
mod tests;
