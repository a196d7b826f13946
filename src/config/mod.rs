//! Configuration module
//!
//! This module builds the run configuration from the process environment
//! (optionally seeded from a `.env` file) and loads optional extraction rule
//! overrides from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use venuz_scraper::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Writing output to {}", config.data_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ListingConfig, RenderConfig, SinkConfig};

// Re-export parser functions
pub use parser::{build_config, load_config, load_config_from_env, load_rules};
