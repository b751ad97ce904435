//! Resolved catalog and URL construction

use crate::error::{Error, Result};
use crate::odata::CATALOG_TABLES;
use crate::types::ApiService;
use std::fmt;
use url::Url;

/// A fully resolved catalog: where one operation sends its requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    host: String,
    use_https: bool,
    service: ApiService,
}

impl Catalog {
    pub fn new(host: impl Into<String>, use_https: bool, service: ApiService) -> Self {
        Self {
            host: host.into(),
            use_https,
            service,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn use_https(&self) -> bool {
        self.use_https
    }

    pub fn service(&self) -> ApiService {
        self.service
    }

    /// `https` or `http`
    pub fn scheme(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }

    /// Root URL of the catalog, always ending in `/`
    ///
    /// A host that already carries a scheme (`http://localhost:8080`) is
    /// used as-is and the scheme flag is ignored.
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim().trim_end_matches('/');
        let base = if host.contains("://") {
            format!("{host}/")
        } else {
            format!("{}://{host}/", self.scheme())
        };
        Ok(Url::parse(&base)?)
    }

    /// `{base}/ODataCatalog/Tables`
    pub fn tables_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(CATALOG_TABLES)?)
    }

    /// `{base}/{service}/{table_id}/`, the table's service document
    pub fn table_url(&self, table_id: &str) -> Result<Url> {
        let table_id = check_table_id(table_id)?;
        let path = format!("{}/{table_id}/", self.service.path());
        Ok(self.base_url()?.join(&path)?)
    }

    /// `{base}/{service}/{table_id}/{resource}`
    pub fn resource_url(&self, table_id: &str, resource: &str) -> Result<Url> {
        let resource = resource.trim_matches('/');
        Ok(self.table_url(table_id)?.join(resource)?)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{} ({})", self.scheme(), self.host, self.service)
    }
}

/// Table identifiers become a path segment, so they must be plain tokens
fn check_table_id(table_id: &str) -> Result<&str> {
    let trimmed = table_id.trim();
    let valid = trimmed.chars().any(|c| c.is_ascii_alphanumeric())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(trimmed)
    } else {
        Err(Error::InvalidTableId {
            table_id: table_id.to_string(),
        })
    }
}
