//! Crawler module for page navigation and run orchestration
//!
//! This module contains the core scraping logic, including:
//! - The page session seam and its HTTP implementation
//! - Redirector link resolution
//! - The fixed category sequence
//! - Overall run coordination

mod categories;
mod coordinator;
mod fetcher;
mod resolver;

pub use categories::{default_categories, CategorySpec};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, HttpSession, PageSession, WaitCondition};
pub use resolver::{LinkResolver, ResolveOutcome, ResolvedLink, MAX_HOPS};

pub use crate::output::RunSummary;

use crate::config::{load_rules, Config};
use crate::extract::ExtractionRules;
use crate::sink::RestSink;
use crate::ScrapeError;
use reqwest::redirect::Policy;

/// Runs a complete scrape
///
/// This is the main entry point for starting a run. It will:
/// 1. Load extraction rules (defaults or the configured TOML file)
/// 2. Build the page session, resolver and sink
/// 3. Walk the category sequence, resuming from the checkpoint
/// 4. Consolidate, upload and return the summary
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `fresh` - Ignore the existing checkpoint
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run finished
/// * `Err(ScrapeError)` - Setup failed or the data directory is unusable
pub async fn run(config: &Config, fresh: bool) -> Result<RunSummary, ScrapeError> {
    let rules = match &config.rules_path {
        Some(path) => {
            tracing::info!("Loading extraction rules from {}", path.display());
            load_rules(path)?
        }
        None => ExtractionRules::default(),
    };

    let categories = default_categories(&config.listing.base_url, &rules)?;
    let session = HttpSession::from_config(&config.http)?;

    let sink_client = build_http_client(&config.http, Policy::none(), config.sink.timeout)?;
    let sink = RestSink::new(&config.sink, sink_client)?;

    let resolver = if config.listing.resolve_redirects {
        Some(LinkResolver::from_config(&config.http, config.listing.domain())?)
    } else {
        tracing::info!("Redirect resolution disabled");
        None
    };

    Coordinator::new(config, session, sink, categories)
        .with_resolver(resolver)
        .fresh(fresh)
        .run()
        .await
}
