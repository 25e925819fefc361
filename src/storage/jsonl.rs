//! JSON Lines output.
//!
//! Each line is one complete JSON object, so the catalog can be streamed
//! into line-oriented tools without loading the whole array.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use super::{ensure_parent, temp_path_for, StorageError};

/// JSONL file writer.
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write entities, replacing the entire file.
    pub fn write_all<T: Serialize>(&self, entities: &[T]) -> Result<usize, StorageError> {
        ensure_parent(&self.path)?;
        let temp_path = temp_path_for(&self.path)?;

        let mut count = 0;
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);

            for entity in entities {
                let json = serde_json::to_string(entity)?;
                writeln!(writer, "{}", json)?;
                count += 1;
            }

            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        info!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}
