//! Output module
//!
//! Persists downloaded resources to disk.
//!
//! # Overview
//!
//! - [`JsonStore`]: one pretty JSON array per resource, written atomically
//! - Arrow schema inference and RecordBatch conversion for flat records
//! - Parquet export of a single resource

mod json;
mod parquet_file;
mod schema;

pub use json::JsonStore;
pub use parquet_file::{write_batch, write_parquet, ParquetOptions};
pub use schema::{infer_schema, records_to_batch};
