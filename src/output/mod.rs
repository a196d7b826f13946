//! Output module for the files a run leaves in its data directory
//!
//! This module handles:
//! - Per-category JSON files (`NNN_<category>.json`)
//! - The consolidated `final_data.json`
//! - The raw HTML dump of the last rendered page
//! - The end-of-run summary printed to stdout

mod json;
pub mod stats;

pub use json::{JsonOutput, FINAL_FILE_NAME, RAW_HTML_FILE_NAME};
pub use stats::{print_summary, CategorySummary, RunSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
