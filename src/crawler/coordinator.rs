//! Run coordinator - main scrape orchestration logic
//!
//! This module contains the category loop that coordinates a run:
//! - Loading the checkpoint and skipping completed categories
//! - Navigating, settling and dumping each listing page
//! - Extraction, absolutizing, deduplication and redirect resolution
//! - Per-category output and checkpoint persistence
//! - Consolidation and the final sink write

use crate::config::{Config, RenderConfig};
use crate::crawler::categories::CategorySpec;
use crate::crawler::fetcher::{PageSession, WaitCondition};
use crate::crawler::resolver::{LinkResolver, ResolveOutcome};
use crate::dedup::{dedup, dedup_lists};
use crate::extract::{collapse_whitespace, ExtractContext, ExtractionReport, Extractor};
use crate::output::{CategorySummary, JsonOutput, RunSummary};
use crate::record::CandidateRecord;
use crate::sink::Sink;
use crate::state::{Checkpoint, CheckpointStore, RunState};
use crate::url::absolutize;
use crate::ScrapeError;
use scraper::{Html, Selector};
use url::Url;

/// Main run coordinator structure
///
/// Generic over the page session and the sink so tests can drive a run
/// against mock servers.
pub struct Coordinator<S: PageSession, K: Sink> {
    render: RenderConfig,
    session: S,
    sink: K,
    resolver: Option<LinkResolver>,
    categories: Vec<CategorySpec>,
    store: CheckpointStore,
    output: JsonOutput,
    fresh: bool,
}

impl<S: PageSession, K: Sink> Coordinator<S, K> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `session` - Page session used for navigation
    /// * `sink` - Destination of the consolidated records
    /// * `categories` - Categories to process, in order
    pub fn new(config: &Config, session: S, sink: K, categories: Vec<CategorySpec>) -> Self {
        let first = categories.first().map(|c| c.name.as_str());
        let store = CheckpointStore::new(config.checkpoint_path(), first);

        Self {
            render: config.render.clone(),
            session,
            sink,
            resolver: None,
            categories,
            store,
            output: JsonOutput::new(&config.data_dir),
            fresh: false,
        }
    }

    /// Sets the resolver used for redirector links; `None` disables resolution
    pub fn with_resolver(mut self, resolver: Option<LinkResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Ignores any existing checkpoint when `fresh` is true
    pub fn fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Runs every category, then consolidates and writes to the sink
    ///
    /// Only failing to create the data directory aborts the run. Every
    /// other failure is logged, recorded in the checkpoint, and the run
    /// moves on.
    pub async fn run(&mut self) -> Result<RunSummary, ScrapeError> {
        self.output.ensure_dir()?;

        let mut checkpoint = if self.fresh {
            tracing::info!("Starting fresh run (ignoring previous checkpoint)");
            self.store.fresh()
        } else {
            self.store.load()
        };

        let categories = std::mem::take(&mut self.categories);
        let mut category_records = Vec::with_capacity(categories.len());
        let mut summaries = Vec::with_capacity(categories.len());

        for (position, category) in categories.iter().enumerate() {
            let index = position + 1;

            if checkpoint.is_completed(&category.name) {
                tracing::info!("Skipping completed category: {}", category.name);
                let carried = self.carry_forward(index, category, &mut checkpoint);
                summaries.push(CategorySummary {
                    name: category.name.clone(),
                    records: carried.len(),
                    carried_forward: true,
                });
                category_records.push(carried);
                continue;
            }

            tracing::info!("Scraping category {}: {}", index, category.name);
            checkpoint.set_next(Some(&category.name), category.url.as_ref().map(Url::as_str));
            self.store.save(&mut checkpoint);

            let records = self.scrape_category(category, &mut checkpoint).await;

            if records.is_empty() {
                tracing::warn!("No records extracted for {}", category.name);
                checkpoint.record_error(Some(&category.name), "extract", "no records extracted");
                self.store.save(&mut checkpoint);
                summaries.push(CategorySummary {
                    name: category.name.clone(),
                    records: 0,
                    carried_forward: false,
                });
                continue;
            }

            match self.output.write_category(index, &category.name, &records) {
                Ok(_) => {
                    checkpoint.mark_completed(&category.name, records.len());
                }
                Err(e) => {
                    tracing::warn!("Failed to save {} output: {}", category.name, e);
                    checkpoint.record_error(Some(&category.name), "output", e.to_string());
                }
            }
            self.store.save(&mut checkpoint);

            summaries.push(CategorySummary {
                name: category.name.clone(),
                records: records.len(),
                carried_forward: false,
            });
            category_records.push(records);
        }

        self.categories = categories;

        let unique = dedup_lists(category_records);
        tracing::info!("Total unique records: {}", unique.len());

        if let Err(e) = self.output.write_consolidated(&unique) {
            tracing::warn!("Failed to save consolidated output: {}", e);
            checkpoint.record_error(None, "output", e.to_string());
        }

        let outcome = self.sink.write(&unique).await;
        for failure in outcome.failures() {
            checkpoint.record_error(
                None,
                "sink",
                format!(
                    "batch {} ({} rows): {}",
                    failure.batch + 1,
                    failure.rows,
                    failure.message
                ),
            );
        }

        checkpoint.state = RunState::COMPLETED.to_string();
        checkpoint.set_next(None, None);
        self.store.save(&mut checkpoint);

        tracing::info!(
            "Run completed: {} unique records, {} rows uploaded",
            unique.len(),
            outcome.rows_written()
        );

        Ok(RunSummary {
            categories: summaries,
            total_unique: unique.len(),
            sink: outcome,
            errors: checkpoint.errors.clone(),
        })
    }

    /// Loads a completed category's previous output into the run-wide set
    fn carry_forward(
        &self,
        index: usize,
        category: &CategorySpec,
        checkpoint: &mut Checkpoint,
    ) -> Vec<CandidateRecord> {
        match self.output.read_category(index, &category.name) {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::warn!("Previous output for {} is missing", category.name);
                checkpoint.record_error(
                    Some(&category.name),
                    "carry-forward",
                    "previous output file is missing",
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Cannot read previous output for {}: {}", category.name, e);
                checkpoint.record_error(Some(&category.name), "carry-forward", e.to_string());
                Vec::new()
            }
        }
    }

    /// Produces the final, resolved records for one category
    ///
    /// Returns an empty list when the page could not be loaded.
    async fn scrape_category(
        &mut self,
        category: &CategorySpec,
        checkpoint: &mut Checkpoint,
    ) -> Vec<CandidateRecord> {
        let mut ctx = ExtractContext::new(category.label.clone());
        if let Some(sub) = &category.subcategory {
            ctx = ctx.with_subcategory(sub.clone());
        }

        let (report, base) = if category.extractor.requires_page() {
            let Some(url) = &category.url else {
                checkpoint.record_error(Some(&category.name), "fetch", "no page configured");
                return Vec::new();
            };

            let html = match self.load_page(category, url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Failed to load {} for {}: {}", url, category.name, e);
                    checkpoint.record_error(Some(&category.name), "fetch", e.to_string());
                    return Vec::new();
                }
            };

            if let Err(e) = self.output.write_raw_html(&html) {
                tracing::warn!("Failed to save raw HTML: {}", e);
            }

            let base = self.session.current_url().cloned().unwrap_or_else(|| url.clone());
            let ctx = ctx.with_base_url(base.clone());
            (run_extractor(category.extractor.as_ref(), &html, &ctx), Some(base))
        } else {
            (run_extractor(category.extractor.as_ref(), "", &ctx), None)
        };

        tracing::info!(
            "Extracted {} records from {} ({} skipped, fallback: {})",
            report.record_count(),
            category.extractor.name(),
            report.skipped.len(),
            report.fallback_applied
        );
        for item in &report.skipped {
            tracing::debug!(
                "Skipped {} item {}: {}",
                item.strategy,
                item.href.as_deref().unwrap_or("-"),
                item.reason
            );
        }

        let records = match &base {
            Some(base) => absolutize_records(report.records, base),
            None => report.records,
        };
        let mut records = dedup(records);

        if let Some(resolver) = &self.resolver {
            resolve_records(resolver, &mut records, &category.name, checkpoint).await;
        }

        records
    }

    /// Navigates, follows the section link if any, waits for the page to
    /// settle and returns its HTML
    async fn load_page(&mut self, category: &CategorySpec, url: &Url) -> Result<String, ScrapeError> {
        self.session.goto(url).await?;

        if let Some(terms) = &category.section_link_terms {
            let html = self.session.content()?;
            let base = self.session.current_url().cloned().unwrap_or_else(|| url.clone());

            match find_section_link(&html, &base, terms) {
                Some(link) => {
                    tracing::info!("Following section link {}", link);
                    self.session.goto(&link).await?;
                }
                None => tracing::debug!("No section link matching {:?} on {}", terms, base),
            }
        }

        self.settle(category.ready.as_ref()).await;
        self.session.content()
    }

    /// Waits for the page to become ready, then scrolls to trigger lazy content
    async fn settle(&mut self, ready: Option<&WaitCondition>) {
        let condition = ready.cloned().unwrap_or(WaitCondition::NetworkIdle);
        if !self
            .session
            .wait_for(&condition, self.render.settle_timeout)
            .await
        {
            tracing::debug!("Page did not settle within {:?}", self.render.settle_timeout);
        }

        for _ in 0..self.render.scroll_passes {
            self.session.scroll_by(self.render.scroll_step_px).await;
            self.session
                .wait_for(&WaitCondition::NetworkIdle, self.render.scroll_wait)
                .await;
        }
    }
}

/// Parses the page and runs the extractor over it
fn run_extractor(extractor: &dyn Extractor, html: &str, ctx: &ExtractContext) -> ExtractionReport {
    let document = Html::parse_document(html);
    extractor.extract(&document, ctx)
}

/// Rewrites each record's href to an absolute URL, dropping unusable ones
fn absolutize_records(records: Vec<CandidateRecord>, base: &Url) -> Vec<CandidateRecord> {
    records
        .into_iter()
        .filter_map(|mut record| match absolutize(&record.source_url, base) {
            Ok(url) => {
                record.set_source_url(url.to_string());
                Some(record)
            }
            Err(e) => {
                tracing::debug!("Dropping {}: {}", record.source_url, e);
                None
            }
        })
        .collect()
}

/// Replaces each redirector link's affiliate URL with its destination origin
async fn resolve_records(
    resolver: &LinkResolver,
    records: &mut [CandidateRecord],
    category: &str,
    checkpoint: &mut Checkpoint,
) {
    let mut external = 0;

    for record in records.iter_mut() {
        let resolved = resolver.resolve(&record.source_url).await;
        match resolved.outcome {
            ResolveOutcome::External => {
                record.affiliate_url = resolved.url;
                external += 1;
            }
            ResolveOutcome::Failed(reason) => {
                checkpoint.record_error(
                    Some(category),
                    "resolve",
                    format!("{}: {}", record.source_url, reason),
                );
            }
            ResolveOutcome::NotListing | ResolveOutcome::StayedOnListing => {}
        }
    }

    tracing::info!(
        "Resolved {} of {} links to external destinations",
        external,
        records.len()
    );
}

/// Finds the first link whose text contains every term
fn find_section_link(html: &str, base: &Url, terms: &[String]) -> Option<Url> {
    let selector = Selector::parse("a[href]").ok()?;
    let document = Html::parse_document(html);

    document.select(&selector).find_map(|link| {
        let text = collapse_whitespace(&link.text().collect::<String>());
        if !terms.iter().all(|term| text.contains(term.as_str())) {
            return None;
        }
        absolutize(link.value().attr("href")?, base).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AffiliateSource, RecordDraft};

    fn record(href: &str) -> CandidateRecord {
        RecordDraft::new("Alpha Cams", href, AffiliateSource::Porndude, "webcam")
            .build()
            .unwrap()
    }

    #[test]
    fn test_find_section_link() {
        let html = r#"
            <a href="/top">Top Sites</a>
            <a href="/live-cams">Best Live Cam Sites</a>
            <a href="/cam-live">Cam Live</a>
        "#;
        let base = Url::parse("https://listing.example/").unwrap();
        let terms = vec!["Live".to_string(), "Cam".to_string()];

        let link = find_section_link(html, &base, &terms).unwrap();
        assert_eq!(link.as_str(), "https://listing.example/live-cams");
    }

    #[test]
    fn test_find_section_link_missing() {
        let html = r#"<a href="/top">Top Sites</a>"#;
        let base = Url::parse("https://listing.example/").unwrap();
        let terms = vec!["Live".to_string(), "Cam".to_string()];

        assert!(find_section_link(html, &base, &terms).is_none());
    }

    #[test]
    fn test_absolutize_records() {
        let base = Url::parse("https://listing.example/sites/").unwrap();
        let records = vec![
            record("/go/alpha"),
            record("javascript:void(0)"),
            record("https://beta.example/"),
        ];

        let records = absolutize_records(records, &base);
        let urls: Vec<_> = records.iter().map(|r| r.source_url.as_str()).collect();

        assert_eq!(
            urls,
            vec!["https://listing.example/go/alpha", "https://beta.example/"]
        );
        assert_eq!(records[0].affiliate_url, "https://listing.example/go/alpha");
    }
}
