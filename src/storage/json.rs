//! JSON checkpoint files
//!
//! Each file holds a plain JSON array of records exactly as they were handed
//! in. Saving overwrites; there is no staleness check.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::config::ensure_parent_dir;

/// Reads and writes one named JSON array file.
#[derive(Debug, Clone)]
pub struct JsonSaver {
    path: PathBuf,
}

impl JsonSaver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `records` as a JSON array, replacing any existing content.
    pub fn save_data<T: Serialize>(&self, records: &[T]) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;

        tracing::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Read the array back.
    pub fn get_data<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let records: Vec<T> = serde_json::from_reader(reader)?;

        tracing::debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
