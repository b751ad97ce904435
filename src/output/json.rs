//! JSON persistence of downloaded resources
//!
//! Layout: one `<dir>/<Resource>.json` file per resource holding a
//! pretty-printed JSON array of records.

use crate::error::{Error, Result};
use crate::types::Record;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory of persisted resources
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store, creating the directory (and parents) if absent
    pub async fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::output(format!("Failed to create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a resource file
    pub fn path(&self, resource: &str) -> Result<PathBuf> {
        let valid = !resource.is_empty()
            && resource != "."
            && resource != ".."
            && !resource.contains(['/', '\\']);
        if !valid {
            return Err(Error::output(format!("Invalid resource name '{resource}'")));
        }
        Ok(self.dir.join(format!("{resource}.json")))
    }

    /// Write a resource
    ///
    /// The file is written next to its destination and renamed into place,
    /// so an existing file is either kept or fully replaced.
    pub async fn write(&self, resource: &str, records: &[Record]) -> Result<PathBuf> {
        let path = self.path(resource)?;
        let contents = serde_json::to_string_pretty(records)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::output(format!("Failed to write {}: {e}", temp_path.display())))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::output(format!("Failed to rename {}: {e}", path.display())))?;

        debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Read a previously written resource
    pub async fn read(&self, resource: &str) -> Result<Vec<Record>> {
        let path = self.path(resource)?;
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::output(format!("Failed to read {}: {e}", path.display())))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check whether a resource file exists
    pub fn contains(&self, resource: &str) -> bool {
        self.path(resource).is_ok_and(|p| p.is_file())
    }
}
