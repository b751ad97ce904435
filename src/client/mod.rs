//! CBS OData client
//!
//! # Overview
//!
//! [`Client`] ties the pieces together:
//! - resolves the catalog for each call (per-call argument, scoped
//!   override, configured default)
//! - fetches table metadata (`TableInfos`), the catalog table list and any
//!   other metadata entity set
//! - downloads dataset pages, optionally persisting every resource of a
//!   table as JSON
//!
//! All operations are sequential: one request is in flight at a time and
//! each continuation page depends on the previous one.

mod scope;
mod types;

pub use scope::CatalogScope;
pub use types::{DataRequest, TableDownload, TableInfo, REQUIRED_INFO_KEYS};

use crate::catalog::{Catalog, CatalogContext, CatalogOverride};
use crate::config::Options;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::odata::{QueryOptions, ResourceLink, TABLE_INFOS};
use crate::output::JsonStore;
use crate::pagination::Pages;
use crate::types::{ApiService, Record};
use tracing::{debug, info};
use url::Url;

/// Client for the CBS OData catalogs
pub struct Client {
    http: HttpClient,
    context: CatalogContext,
}

impl Client {
    /// Create a client from options
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        let http = HttpClient::with_config(options.http_config())?;
        Ok(Self {
            http,
            context: CatalogContext::new(options),
        })
    }

    /// Create a client with default options
    pub fn with_defaults() -> Result<Self> {
        Self::new(Options::default())
    }

    pub fn options(&self) -> &Options {
        self.context.options()
    }

    /// Change the configured default catalog
    pub fn set_catalog_url(&mut self, catalog_url: impl Into<String>) {
        self.context.options_mut().catalog_url = catalog_url.into();
    }

    /// Change the configured default scheme
    pub fn set_https(&mut self, use_https: bool) {
        self.context.options_mut().use_https = use_https;
    }

    pub fn set_service(&mut self, service: ApiService) {
        self.context.options_mut().service = service;
    }

    /// Replace the options and rebuild the transport
    ///
    /// Active scoped overrides are kept.
    pub fn set_options(&mut self, options: Options) -> Result<()> {
        options.validate()?;
        self.http = HttpClient::with_config(options.http_config())?;
        *self.context.options_mut() = options;
        Ok(())
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Use `catalog_url` for every call made through the returned scope
    pub fn catalog(&mut self, catalog_url: impl Into<String>) -> CatalogScope<'_> {
        CatalogScope::new(self, CatalogOverride::new(catalog_url))
    }

    /// Like [`Client::catalog`], also overriding the scheme
    pub fn catalog_with_scheme(
        &mut self,
        catalog_url: impl Into<String>,
        use_https: bool,
    ) -> CatalogScope<'_> {
        CatalogScope::new(self, CatalogOverride::new(catalog_url).with_https(use_https))
    }

    /// Catalog a call with this `catalog_url` argument would use
    pub fn resolve(&self, catalog_url: Option<&str>) -> Catalog {
        self.context.resolve(catalog_url)
    }

    /// Page through any entity set
    pub fn pages(&self, url: Url, query: &QueryOptions) -> Result<Pages<'_>> {
        Ok(Pages::new(&self.http, url, query.to_params()?))
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Metadata of one table
    pub async fn get_info(&self, table_id: &str, catalog_url: Option<&str>) -> Result<TableInfo> {
        let catalog = self.resolve(catalog_url);
        let url = catalog.resource_url(table_id, TABLE_INFOS)?;

        let mut records = self
            .pages(url, &QueryOptions::default())?
            .collect_all()
            .await?;

        match records.len() {
            0 => Err(Error::TableNotFound {
                table_id: table_id.to_string(),
            }),
            1 => TableInfo::from_record(records.remove(0)),
            count => Err(Error::AmbiguousMetadata {
                table_id: table_id.to_string(),
                count,
            }),
        }
    }

    /// Every table of the catalog, in catalog order
    pub async fn get_table_list(&self, catalog_url: Option<&str>) -> Result<Vec<Record>> {
        self.get_table_list_with(&QueryOptions::default(), catalog_url)
            .await
    }

    /// Catalog table list narrowed by `$select`/`$filter`
    pub async fn get_table_list_with(
        &self,
        query: &QueryOptions,
        catalog_url: Option<&str>,
    ) -> Result<Vec<Record>> {
        let catalog = self.resolve(catalog_url);
        let tables = self.pages(catalog.tables_url()?, query)?.collect_all().await?;
        info!("{} tables in {}", tables.len(), catalog);
        Ok(tables)
    }

    /// Any metadata entity set of a table, e.g. `DataProperties`
    pub async fn get_meta(
        &self,
        table_id: &str,
        name: &str,
        catalog_url: Option<&str>,
    ) -> Result<Vec<Record>> {
        let catalog = self.resolve(catalog_url);
        self.fetch_resource(&catalog, table_id, name, &QueryOptions::default())
            .await
    }

    /// Entity sets listed in a table's service document
    pub async fn get_resources(
        &self,
        table_id: &str,
        catalog_url: Option<&str>,
    ) -> Result<Vec<ResourceLink>> {
        let catalog = self.resolve(catalog_url);
        self.fetch_resources(&catalog, table_id).await
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Dataset pages of a table, fetched lazily
    pub fn data_pages(&self, table_id: &str, request: &DataRequest) -> Result<Pages<'_>> {
        let catalog = self.resolve(request.catalog_url.as_deref());
        let url = catalog.resource_url(table_id, request.dataset.resource())?;
        self.pages(url, &request.query)
    }

    /// Fetch every resource of a table
    ///
    /// The service document decides which resources exist; the dataset
    /// variant that was not requested is skipped and the narrowing only
    /// applies to the dataset itself. With `dir` set, each resource is
    /// stored as `<dir>/<Resource>.json` once it is complete.
    pub async fn download_data(
        &self,
        table_id: &str,
        request: &DataRequest,
    ) -> Result<TableDownload> {
        let catalog = self.resolve(request.catalog_url.as_deref());
        // Reject bad narrowing before anything is fetched
        request.query.to_params()?;

        let store = match &request.dir {
            Some(dir) => Some(JsonStore::create(dir).await?),
            None => None,
        };

        let dataset = request.dataset.resource();
        let mut names: Vec<String> = self
            .fetch_resources(&catalog, table_id)
            .await?
            .into_iter()
            .map(|link| link.name)
            .filter(|name| name != request.dataset.other())
            .collect();
        if !names.iter().any(|name| name == dataset) {
            names.push(dataset.to_string());
        }

        let mut download = TableDownload::new(table_id, request.dataset);
        for name in names {
            let query = if name == dataset {
                request.query.clone()
            } else {
                QueryOptions::default()
            };
            let records = self.fetch_resource(&catalog, table_id, &name, &query).await?;

            if let Some(store) = &store {
                store.write(&name, &records).await?;
            }
            download.push(name, records);
        }

        info!(
            "Downloaded {} resources of {} from {}",
            download.len(),
            table_id,
            catalog
        );
        Ok(download)
    }

    /// Dataset records of a table
    ///
    /// With `dir` set this is [`Client::download_data`] returning only the
    /// dataset; otherwise only the dataset resource is fetched.
    pub async fn get_data(&self, table_id: &str, request: &DataRequest) -> Result<Vec<Record>> {
        if request.dir.is_some() {
            return Ok(self.download_data(table_id, request).await?.into_dataset());
        }
        let records = self.data_pages(table_id, request)?.collect_all().await?;
        debug!("{} records in {}", records.len(), table_id);
        Ok(records)
    }

    async fn fetch_resource(
        &self,
        catalog: &Catalog,
        table_id: &str,
        name: &str,
        query: &QueryOptions,
    ) -> Result<Vec<Record>> {
        let url = catalog.resource_url(table_id, name)?;
        self.pages(url, query)?.collect_all().await
    }

    async fn fetch_resources(&self, catalog: &Catalog, table_id: &str) -> Result<Vec<ResourceLink>> {
        let url = catalog.table_url(table_id)?;
        self.pages(url, &QueryOptions::default())?
            .collect_all()
            .await?
            .iter()
            .map(ResourceLink::from_record)
            .collect()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
