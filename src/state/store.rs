//! Durable checkpoint persistence
//!
//! Neither direction is allowed to fail a run: a missing or unreadable
//! checkpoint becomes a fresh default, and a failed write is logged while
//! the in-memory checkpoint stays usable.

use super::Checkpoint;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing the checkpoint file
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid checkpoint JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the checkpoint at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    first_category: Option<String>,
}

impl CheckpointStore {
    /// Creates a store for `path`; `first_category` seeds fresh checkpoints
    pub fn new(path: impl Into<PathBuf>, first_category: Option<&str>) -> Self {
        Self {
            path: path.into(),
            first_category: first_category.map(str::to_string),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a fresh checkpoint pointing at the first known category
    pub fn fresh(&self) -> Checkpoint {
        Checkpoint::new(self.first_category.as_deref())
    }

    /// Loads the persisted checkpoint
    ///
    /// A missing file yields a fresh default. A file that cannot be read or
    /// parsed also yields a fresh default, with the failure logged and
    /// recorded in the default's error log.
    pub fn load(&self) -> Checkpoint {
        if !self.path.exists() {
            tracing::info!("No checkpoint at {}, starting from scratch", self.path.display());
            return self.fresh();
        }

        match self.read() {
            Ok(checkpoint) => {
                tracing::info!(
                    "Checkpoint loaded: {} categories completed, next: {}",
                    checkpoint.completed_categories.len(),
                    checkpoint.next_category.as_deref().unwrap_or("none")
                );
                checkpoint
            }
            Err(e) => {
                tracing::error!("Error reading checkpoint: {}. Starting fresh.", e);
                let mut checkpoint = self.fresh();
                checkpoint.record_error(None, "checkpoint", format!("load failed: {}", e));
                checkpoint
            }
        }
    }

    /// Refreshes the timestamp and persists the checkpoint
    ///
    /// The JSON is written to a sibling temporary file which is then renamed
    /// over the target, so a crash mid-write leaves the previous checkpoint
    /// intact. Returns whether the write succeeded; failures are logged and
    /// appended to the checkpoint's error log.
    pub fn save(&self, checkpoint: &mut Checkpoint) -> bool {
        checkpoint.timestamp = Utc::now();

        match self.write(checkpoint) {
            Ok(()) => {
                tracing::info!(
                    "Checkpoint saved - total records: {}",
                    checkpoint.total_records_scraped
                );
                true
            }
            Err(e) => {
                tracing::error!("Error saving checkpoint: {}", e);
                checkpoint.record_error(None, "checkpoint", format!("save failed: {}", e));
                false
            }
        }
    }

    fn read(&self) -> Result<Checkpoint, CheckpointError> {
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let json = serde_json::to_string_pretty(checkpoint)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, json).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
