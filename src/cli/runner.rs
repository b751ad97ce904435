//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::client::{Client, DataRequest};
use crate::config::Options;
use crate::error::{Result, ResultExt};
use crate::output::write_parquet;
use crate::types::{JsonValue, Record};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Options from file and environment, overridden by the global flags
    pub fn options(&self) -> Result<Options> {
        let mut options = Options::load(self.cli.config.as_deref())?;
        if let Some(catalog) = &self.cli.catalog {
            options.catalog_url.clone_from(catalog);
        }
        if self.cli.https {
            options.use_https = true;
        }
        options.validate()?;
        Ok(options)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = Client::new(self.options()?)?;

        match &self.cli.command {
            Commands::Info { table } => {
                let info = client.get_info(table, None).await?;
                self.emit(&serde_json::to_value(&info)?)
            }
            Commands::List { query } => {
                let tables = client.get_table_list_with(&query.to_query(), None).await?;
                self.emit_records("Tables", &tables, None)
            }
            Commands::Meta { table, name } => {
                let records = client.get_meta(table, name, None).await?;
                self.emit_records(name, &records, None)
            }
            Commands::Resources { table } => {
                let resources = client.get_resources(table, None).await?;
                self.emit(&serde_json::to_value(&resources)?)
            }
            Commands::Data {
                table,
                query,
                typed,
                dir,
                output,
            } => {
                let request = Self::request(query, *typed, dir.as_deref());
                let records = client.get_data(table, &request).await?;
                self.emit_records(request.dataset.resource(), &records, output.as_deref())
            }
            Commands::Download {
                table,
                dir,
                query,
                typed,
            } => {
                let request = Self::request(query, *typed, Some(dir.as_path()));
                let download = client.download_data(table, &request).await?;
                for (name, records) in download.iter() {
                    self.emit(&json!({
                        "resource": name,
                        "records": records.len(),
                        "path": dir.join(format!("{name}.json")),
                    }))?;
                }
                Ok(())
            }
        }
    }

    fn request(query: &QueryArgs, typed: bool, dir: Option<&Path>) -> DataRequest {
        let mut request = DataRequest::new().query(query.to_query()).typed(typed);
        if let Some(dir) = dir {
            request = request.dir(dir);
        }
        request
    }

    /// Print one JSON value
    fn emit(&self, value: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json | OutputFormat::Parquet => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }

    /// Print or write a resource
    ///
    /// Parquet always goes to a file, `<name>.parquet` unless `output` is
    /// given. JSON goes to `output` when given, else to stdout.
    fn emit_records(&self, name: &str, records: &[Record], output: Option<&Path>) -> Result<()> {
        match self.cli.format {
            OutputFormat::Parquet => {
                let path = output.map_or_else(
                    || PathBuf::from(format!("{name}.parquet")),
                    Path::to_path_buf,
                );
                let options = self.cli.compression.parquet_options();
                let rows = write_parquet(&path, records, &options)?;
                info!("Wrote {} rows to {}", rows, path.display());
                Ok(())
            }
            OutputFormat::Json | OutputFormat::Pretty => {
                if let Some(path) = output {
                    let text = match self.cli.format {
                        OutputFormat::Pretty => serde_json::to_string_pretty(records)?,
                        _ => serde_json::to_string(records)?,
                    };
                    std::fs::write(path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} records to {}", records.len(), path.display());
                    return Ok(());
                }
                match self.cli.format {
                    OutputFormat::Pretty => {
                        println!("{}", serde_json::to_string_pretty(records)?);
                    }
                    _ => {
                        for record in records {
                            println!("{}", serde_json::to_string(record)?);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
