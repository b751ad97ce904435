//! OData response pages
//!
//! Every CBS OData response is a JSON object with a `value` array and, when
//! more rows are available, a continuation link.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use serde::{Deserialize, Serialize};

/// Continuation link keys, OData v3 verbose and v4 style
const NEXT_LINK_KEYS: [&str; 2] = ["odata.nextLink", "@odata.nextLink"];

/// One page of an entity set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Rows of this page in arrival order
    pub records: Vec<Record>,
    /// Link to the next page, absent on the last page
    pub next_link: Option<String>,
}

impl Page {
    /// Decode a response body
    pub fn from_value(body: JsonValue) -> Result<Self> {
        let JsonValue::Object(mut object) = body else {
            return Err(Error::decode("expected a JSON object response"));
        };

        let next_link = NEXT_LINK_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(JsonValue::as_str))
            .filter(|link| !link.is_empty())
            .map(str::to_string);

        let values = match object.remove("value") {
            Some(JsonValue::Array(values)) => values,
            Some(_) => return Err(Error::decode("'value' is not an array")),
            None => return Err(Error::decode("response has no 'value' array")),
        };

        let records = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                JsonValue::Object(record) => Ok(record),
                other => Err(Error::decode(format!(
                    "value[{i}] is not an object: {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records, next_link })
    }

    /// Decode a response body from text
    pub fn parse(body: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.next_link.is_some()
    }
}

/// Entry of a table's service document: one entity set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub name: String,
    pub url: String,
}

impl ResourceLink {
    /// Read a service document entry (`{"name": ..., "url": ...}`)
    pub fn from_record(record: &Record) -> Result<Self> {
        let field = |key: &str| {
            record
                .get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::missing_key("service document", key))
        };
        Ok(Self {
            name: field("name")?,
            url: field("url")?,
        })
    }
}
