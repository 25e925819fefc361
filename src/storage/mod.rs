//! Catalog output files.
//!
//! The catalog is written either as one pretty-printed JSON array (the
//! default artifact) or as JSON Lines, one record per line.

mod json;
mod jsonl;

pub use json::*;
pub use jsonl::*;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ProductRecord;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unknown output format: {0} (expected \"json\" or \"jsonl\")")]
    UnknownFormat(String),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            other => Err(StorageError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Write the catalog to `path` in the given format.
pub fn write_catalog(
    path: &Path,
    format: OutputFormat,
    records: &[ProductRecord],
) -> Result<usize, StorageError> {
    match format {
        OutputFormat::Json => JsonArrayWriter::new(path.to_path_buf()).write_all(records),
        OutputFormat::Jsonl => JsonlWriter::new(path.to_path_buf()).write_all(records),
    }
}

/// Ensure the parent directory of `path` exists.
fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Sibling path used while a file is being written.
fn temp_path_for(path: &Path) -> Result<PathBuf, StorageError> {
    let name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
    let mut temp_name = name.to_os_string();
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}
