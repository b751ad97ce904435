//! Parquet export of downloaded records

use super::schema::records_to_batch;
use crate::error::{Error, Result};
use crate::types::Record;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetOptions {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetOptions {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
        }
    }
}

impl ParquetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(parquet::basic::ZstdLevel::default());
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write one RecordBatch to a Parquet file, returning the row count
pub fn write_batch(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    options: &ParquetOptions,
) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(options.build_properties()))?;
    writer.write(batch)?;
    writer.close()?;

    debug!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(batch.num_rows())
}

/// Write records to a Parquet file with an inferred schema
pub fn write_parquet(
    path: impl AsRef<Path>,
    records: &[Record],
    options: &ParquetOptions,
) -> Result<usize> {
    if records.is_empty() {
        return Err(Error::output("No records to write"));
    }
    let batch = records_to_batch(records, None)?;
    write_batch(path, &batch, options)
}
