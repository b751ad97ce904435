//! CLI module
//!
//! Command-line interface over [`Client`](crate::client::Client).
//!
//! # Commands
//!
//! - `info` - Metadata of a table
//! - `list` - Tables of the catalog
//! - `meta` - Any metadata entity set of a table
//! - `resources` - Entity sets of a table
//! - `data` - Dataset records of a table
//! - `download` - Store every resource of a table as JSON

mod commands;
mod runner;

pub use commands::{Cli, Commands, Compression, OutputFormat, QueryArgs};
pub use runner::Runner;
