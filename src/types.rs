//! Common types used throughout cbsodata
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One row of an OData entity set: column name to scalar value
pub type Record = JsonObject;

// ============================================================================
// OData Service
// ============================================================================

/// Which CBS OData service serves the table resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiService {
    /// `ODataApi/odata`, the regular API
    #[default]
    Api,
    /// `ODataFeed/odata`, the bulk feed
    Feed,
}

impl ApiService {
    /// Path segment of the service below the catalog host
    pub fn path(self) -> &'static str {
        match self {
            ApiService::Api => "ODataApi/odata",
            ApiService::Feed => "ODataFeed/odata",
        }
    }
}

impl fmt::Display for ApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiService::Api => f.write_str("api"),
            ApiService::Feed => f.write_str("feed"),
        }
    }
}

impl FromStr for ApiService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(ApiService::Api),
            "feed" => Ok(ApiService::Feed),
            other => Err(format!("unknown service '{other}', expected 'api' or 'feed'")),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
