//! CLI commands and argument parsing

use crate::odata::{QueryOptions, Select, DATA_PROPERTIES};
use crate::output::ParquetOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Download tables and metadata from the CBS OData catalogs
#[derive(Parser, Debug)]
#[command(name = "cbsodata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog host, e.g. dataderden.cbs.nl
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Use https instead of http
    #[arg(long, global = true)]
    pub https: bool,

    /// Options file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Parquet compression
    #[arg(long, global = true, default_value = "snappy")]
    pub compression: Compression,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the metadata of a table
    Info {
        /// Table identifier, e.g. 82010NED
        table: String,
    },

    /// List the tables of the catalog
    List {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Fetch a metadata entity set of a table (DataProperties, ...)
    Meta {
        table: String,
        /// Entity set name
        #[arg(default_value = DATA_PROPERTIES)]
        name: String,
    },

    /// List the entity sets of a table
    Resources { table: String },

    /// Fetch the data of a table
    Data {
        table: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Fetch TypedDataSet instead of UntypedDataSet
        #[arg(long)]
        typed: bool,

        /// Also store every resource of the table in this directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Write the records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store every resource of a table as JSON files
    Download {
        table: String,

        /// Target directory, created if missing
        #[arg(long)]
        dir: PathBuf,

        #[command(flatten)]
        query: QueryArgs,

        /// Fetch TypedDataSet instead of UntypedDataSet
        #[arg(long)]
        typed: bool,
    },
}

/// `$select` / `$filter` narrowing
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Columns to keep, comma separated
    #[arg(long)]
    pub select: Option<String>,

    /// OData filter expression, passed through as-is
    #[arg(long)]
    pub filter: Option<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> QueryOptions {
        QueryOptions {
            select: self.select.as_deref().map(Select::from),
            filter: self.filter.clone(),
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
    /// Parquet files
    Parquet,
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Compression {
    Snappy,
    Zstd,
    None,
}

impl Compression {
    pub fn parquet_options(self) -> ParquetOptions {
        match self {
            Compression::Snappy => ParquetOptions::new(),
            Compression::Zstd => ParquetOptions::new().zstd(),
            Compression::None => ParquetOptions::new().uncompressed(),
        }
    }
}
