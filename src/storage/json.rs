//! Pretty-printed JSON array output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use super::{ensure_parent, temp_path_for, StorageError};

/// Writes a whole collection as one JSON array.
///
/// The array goes to a temporary sibling first and is renamed into place, so
/// readers never see a half-written file.
pub struct JsonArrayWriter {
    path: PathBuf,
}

impl JsonArrayWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write `entities`, replacing any existing file.
    pub fn write_all<T: Serialize>(&self, entities: &[T]) -> Result<usize, StorageError> {
        ensure_parent(&self.path)?;
        let temp_path = temp_path_for(&self.path)?;

        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entities)?;
            writeln!(writer)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        info!("Wrote {} records to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}
