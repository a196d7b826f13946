//! Venuz Scraper: a resumable listing-site harvester
//!
//! This crate fetches a fixed set of listing pages, extracts candidate
//! site/model entries from their HTML, deduplicates them by destination URL,
//! and upserts them into a remote content table. A JSON checkpoint lets a
//! re-run skip categories that already produced results.

pub mod config;
pub mod crawler;
pub mod dedup;
pub mod extract;
pub mod output;
pub mod record;
pub mod sink;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No page loaded in the session")]
    NoPage,

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use dedup::{dedup, dedup_lists};
pub use record::{AffiliateSource, CandidateRecord, RecordDraft, RecordError};
pub use state::{CategoryState, Checkpoint, CheckpointStore};
