//! Client request and result types

use crate::error::{Error, Result};
use crate::odata::{DatasetKind, QueryOptions, Select, TABLE_INFOS};
use crate::types::{JsonValue, Record};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;

/// Keys every `TableInfos` entry must carry
pub const REQUIRED_INFO_KEYS: [&str; 3] = ["Description", "ID", "Identifier"];

/// Metadata of one table, as served by `TableInfos`
///
/// Derefs to the underlying record, so every field the service sends is
/// available through [`Record::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Record", into = "Record")]
pub struct TableInfo(Record);

impl TableInfo {
    /// Wrap a `TableInfos` entry, checking the required keys
    pub fn from_record(record: Record) -> Result<Self> {
        if let Some(key) = REQUIRED_INFO_KEYS
            .iter()
            .find(|key| !record.contains_key(**key))
        {
            return Err(Error::missing_key(TABLE_INFOS, *key));
        }
        Ok(Self(record))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(JsonValue::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("Description")
    }

    pub fn id(&self) -> Option<&JsonValue> {
        self.0.get("ID")
    }

    /// Table identifier, e.g. `82010NED`
    pub fn identifier(&self) -> Option<&str> {
        self.str_field("Identifier")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("Title")
    }

    /// Raw `DefaultSelection` query string
    pub fn default_selection(&self) -> Option<&str> {
        self.str_field("DefaultSelection")
    }

    /// `DefaultSelection` parsed into query options; empty when absent
    pub fn default_query(&self) -> QueryOptions {
        self.default_selection()
            .map(QueryOptions::parse)
            .unwrap_or_default()
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

impl TryFrom<Record> for TableInfo {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        Self::from_record(record)
    }
}

impl From<TableInfo> for Record {
    fn from(info: TableInfo) -> Self {
        info.0
    }
}

impl Deref for TableInfo {
    type Target = Record;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Arguments of a data download
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRequest {
    /// Store every fetched resource below this directory
    pub dir: Option<PathBuf>,
    /// Catalog host for this call only
    pub catalog_url: Option<String>,
    /// Narrowing applied to the dataset resource
    pub query: QueryOptions,
    /// Dataset variant to fetch
    pub dataset: DatasetKind,
}

impl DataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn catalog_url(mut self, catalog_url: impl Into<String>) -> Self {
        self.catalog_url = Some(catalog_url.into());
        self
    }

    #[must_use]
    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.query = self.query.select(select);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.query = self.query.filter(filter);
        self
    }

    #[must_use]
    pub fn query(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }

    /// Fetch `TypedDataSet` instead of `UntypedDataSet`
    #[must_use]
    pub fn typed(mut self, typed: bool) -> Self {
        self.dataset = if typed {
            DatasetKind::Typed
        } else {
            DatasetKind::Untyped
        };
        self
    }
}

/// Every resource fetched for one table, in service document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDownload {
    table_id: String,
    dataset: DatasetKind,
    resources: Vec<(String, Vec<Record>)>,
}

impl TableDownload {
    pub(crate) fn new(table_id: impl Into<String>, dataset: DatasetKind) -> Self {
        Self {
            table_id: table_id.into(),
            dataset,
            resources: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.resources.push((name.into(), records));
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Resource names in fetch order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.resources
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, records)| records.as_slice())
    }

    /// Records of the dataset resource
    pub fn dataset(&self) -> Option<&[Record]> {
        self.get(self.dataset.resource())
    }

    /// Take the dataset records, dropping the other resources
    pub fn into_dataset(self) -> Vec<Record> {
        let wanted = self.dataset.resource();
        self.resources
            .into_iter()
            .find(|(name, _)| name == wanted)
            .map(|(_, records)| records)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.resources
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
