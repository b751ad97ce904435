//! OData query narrowing
//!
//! `$select` and `$filter` are passed through to the service. A select can
//! be given as a raw expression, sent as is, or as a column list, joined
//! with `", "`.

use crate::error::{Error, Result};
use std::fmt;

/// Query parameter names
pub const SELECT_PARAM: &str = "$select";
pub const FILTER_PARAM: &str = "$filter";
pub const FORMAT_PARAM: &str = "$format";

/// Column selection for `$select`
#[derive(Debug, Clone, Eq)]
pub enum Select {
    /// A raw expression, sent unmodified (e.g. `"ID, Perioden"`)
    Raw(String),
    /// An ordered list of column names, joined with `", "`
    Columns(Vec<String>),
}

impl Select {
    /// Build a column selection
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// Value of the `$select` parameter
    pub fn encode(&self) -> String {
        match self {
            Select::Raw(expr) => expr.clone(),
            Select::Columns(columns) => columns.join(", "),
        }
    }

    /// Column names in selection order
    pub fn column_names(&self) -> Vec<String> {
        match self {
            Select::Raw(expr) => expr
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            Select::Columns(columns) => columns.iter().map(|c| c.trim().to_string()).collect(),
        }
    }

    /// Reject selections that would send an empty or blank column
    pub fn validate(&self) -> Result<()> {
        match self {
            Select::Raw(expr) => {
                if expr.trim().is_empty() {
                    return Err(Error::invalid_select("select expression is empty"));
                }
                if expr.split(',').any(|c| c.trim().is_empty()) {
                    return Err(Error::invalid_select(format!(
                        "select expression '{expr}' contains an empty column"
                    )));
                }
            }
            Select::Columns(columns) => {
                if columns.is_empty() {
                    return Err(Error::invalid_select("select column list is empty"));
                }
                if let Some(pos) = columns.iter().position(|c| c.trim().is_empty()) {
                    return Err(Error::invalid_select(format!(
                        "select column {pos} is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Raw and column-list selections are equal when they send the same
/// `$select` value.
impl PartialEq for Select {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&str> for Select {
    fn from(expr: &str) -> Self {
        Self::Raw(expr.to_string())
    }
}

impl From<String> for Select {
    fn from(expr: String) -> Self {
        Self::Raw(expr)
    }
}

impl From<Vec<String>> for Select {
    fn from(columns: Vec<String>) -> Self {
        Self::Columns(columns)
    }
}

impl From<Vec<&str>> for Select {
    fn from(columns: Vec<&str>) -> Self {
        Self::columns(columns)
    }
}

impl From<&[&str]> for Select {
    fn from(columns: &[&str]) -> Self {
        Self::columns(columns.iter().copied())
    }
}

/// Optional `$select` / `$filter` narrowing for a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub select: Option<Select>,
    pub filter: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column selection
    #[must_use]
    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Set the filter expression
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_none() && self.filter.is_none()
    }

    /// Query parameters in wire order (`$select` before `$filter`)
    pub fn to_params(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            select.validate()?;
            params.push((SELECT_PARAM.to_string(), select.encode()));
        }
        if let Some(filter) = &self.filter {
            params.push((FILTER_PARAM.to_string(), filter.clone()));
        }
        Ok(params)
    }

    /// Parse a `DefaultSelection` string such as
    /// `$select=ID, Perioden&$filter=((Perioden eq '2016JJ00'))`.
    ///
    /// Parts other than `$select` and `$filter` are ignored. Values are kept
    /// verbatim, so a parsed select re-encodes to the same string.
    pub fn parse(default_selection: &str) -> Self {
        let mut options = Self::default();
        for part in default_selection.split('&') {
            if let Some(select) = part.strip_prefix("$select=") {
                if !select.trim().is_empty() {
                    options.select = Some(Select::Raw(select.to_string()));
                }
            } else if let Some(filter) = part.strip_prefix("$filter=") {
                if !filter.trim().is_empty() {
                    options.filter = Some(filter.to_string());
                }
            }
        }
        options
    }
}
