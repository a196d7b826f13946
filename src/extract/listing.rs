//! Heuristic extractor for listing-directory pages
//!
//! Two strategies run in order:
//!
//! 1. **Anchor pattern**: hyperlinks whose href contains a redirector
//!    substring (`/go/`, `/out/`, ...).
//! 2. **Container pattern**: block elements whose class mentions a listing
//!    keyword (`site`, `card`, ...). Runs only when the first strategy
//!    produced fewer records than the fallback threshold, and its results
//!    are appended to the first strategy's.

use super::rules::{render_template, ExtractionRules};
use super::{
    collapse_whitespace, truncate_chars, ExtractContext, ExtractionReport, Extractor, SkipReason,
    Strategy,
};
use crate::record::{AffiliateSource, CandidateRecord, RecordDraft};
use crate::url::{absolutize, is_absolute_http};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Extractor for a real listing site
#[derive(Debug)]
pub struct ListingExtractor {
    name: String,
    source: AffiliateSource,
    rules: ExtractionRules,
    anchor_selector: Selector,
    image_selector: Selector,
    container_selector: Selector,
    title_selector: Selector,
}

impl ListingExtractor {
    /// Creates an extractor, compiling the selectors the rules describe
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the rules name element tags or
    /// title selectors that do not form valid CSS selectors.
    pub fn new(
        name: impl Into<String>,
        source: AffiliateSource,
        rules: ExtractionRules,
    ) -> Result<Self, ConfigError> {
        let container_css = rules
            .container
            .element_tags
            .iter()
            .map(|tag| format!("{}[class]", tag))
            .collect::<Vec<_>>()
            .join(", ");
        let title_css = rules.container.title_selectors.join(", ");

        Ok(Self {
            name: name.into(),
            source,
            anchor_selector: compile("a[href]")?,
            image_selector: compile("img")?,
            container_selector: compile(&container_css)?,
            title_selector: compile(&title_css)?,
            rules,
        })
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Scans every hyperlink and keeps the redirector-looking ones
    ///
    /// Each href is considered once; repeated links to the same destination
    /// are reported as duplicates.
    fn anchor_pass(
        &self,
        document: &Html,
        ctx: &ExtractContext,
        seen: &mut HashSet<String>,
        report: &mut ExtractionReport,
    ) {
        let mut matched = 0;

        for link in document.select(&self.anchor_selector) {
            let href = link.value().attr("href").unwrap_or_default();
            if !self.rules.anchor.matches(href) {
                continue;
            }
            matched += 1;

            if !seen.insert(href.to_string()) {
                report.skip(Strategy::Anchor, Some(href), SkipReason::Duplicate);
                continue;
            }

            let image = link.select(&self.image_selector).next();
            let raw_title = [
                Some(element_text(&link)),
                link.value().attr("title").map(collapse_whitespace),
                image
                    .and_then(|img| img.value().attr("alt"))
                    .map(collapse_whitespace),
            ]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| self.rules.fallback_title.clone());

            let outcome = self.candidate(
                Strategy::Anchor,
                &raw_title,
                href,
                self.image_source(image, ctx),
                ctx,
                report.records.len(),
            );
            push_outcome(report, Strategy::Anchor, href, outcome);
        }

        tracing::debug!(
            "{}: anchor strategy matched {} links, kept {}",
            self.name,
            matched,
            report.records.len()
        );
    }

    /// Scans listing-like containers and reads the first link inside each
    ///
    /// Hrefs already taken by either pass are skipped.
    fn container_pass(
        &self,
        document: &Html,
        ctx: &ExtractContext,
        seen: &mut HashSet<String>,
        report: &mut ExtractionReport,
    ) {
        let before = report.records.len();
        let mut containers = 0;

        for container in document.select(&self.container_selector) {
            let class_attr = container.value().attr("class").unwrap_or_default();
            if !self.rules.container.matches_class(class_attr) {
                continue;
            }
            containers += 1;

            let Some(link) = container.select(&self.anchor_selector).next() else {
                report.skip(Strategy::Container, None, SkipReason::MissingLink);
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default();
            if seen.contains(href) {
                report.skip(Strategy::Container, Some(href), SkipReason::Duplicate);
                continue;
            }

            let raw_title = container
                .select(&self.title_selector)
                .next()
                .map(|heading| element_text(&heading))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| element_text(&link));

            let image = container.select(&self.image_selector).next();
            let outcome = self.candidate(
                Strategy::Container,
                &raw_title,
                href,
                self.image_source(image, ctx),
                ctx,
                report.records.len(),
            );
            if outcome.is_ok() {
                seen.insert(href.to_string());
            }
            push_outcome(report, Strategy::Container, href, outcome);
        }

        tracing::debug!(
            "{}: container strategy scanned {} containers, added {}",
            self.name,
            containers,
            report.records.len() - before
        );
    }

    /// Applies the shared title rules and builds the record
    fn candidate(
        &self,
        strategy: Strategy,
        raw_title: &str,
        href: &str,
        image_url: Option<String>,
        ctx: &ExtractContext,
        produced: usize,
    ) -> Result<CandidateRecord, SkipReason> {
        if produced >= self.rules.max_records {
            return Err(SkipReason::LimitReached);
        }

        let title = collapse_whitespace(raw_title);
        if title.chars().count() < self.rules.min_title_chars {
            return Err(SkipReason::TitleTooShort(title));
        }
        let title = truncate_chars(&title, self.rules.max_title_chars);

        let (template, premium, rating) = match strategy {
            Strategy::Container => (
                &self.rules.container.description_template,
                self.rules.container.premium,
                self.rules.container.rating,
            ),
            _ => (
                &self.rules.anchor.description_template,
                self.rules.anchor.premium,
                self.rules.anchor.rating,
            ),
        };

        RecordDraft::new(title.clone(), href, self.source, ctx.category.clone())
            .description(render_template(template, &title))
            .image_url(image_url)
            .subcategory(ctx.subcategory.clone())
            .verified(true)
            .premium(premium)
            .rating(rating)
            .build()
            .map_err(SkipReason::Invalid)
    }

    /// Reads `src`, then `data-src`, and returns it as an absolute URL
    ///
    /// Relative sources are resolved against the page URL when one is known;
    /// anything unusable yields `None` so the record gets the placeholder.
    fn image_source(&self, image: Option<ElementRef<'_>>, ctx: &ExtractContext) -> Option<String> {
        let image = image?;
        let raw = ["src", "data-src"]
            .into_iter()
            .filter_map(|attr| image.value().attr(attr))
            .map(str::trim)
            .find(|s| !s.is_empty())?;

        if is_absolute_http(raw) {
            return Some(raw.to_string());
        }

        let base = ctx.base_url.as_ref()?;
        absolutize(raw, base).ok().map(|url| url.to_string())
    }
}

impl Extractor for ListingExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, document: &Html, ctx: &ExtractContext) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        let mut seen = HashSet::new();

        self.anchor_pass(document, ctx, &mut seen, &mut report);

        if report.records.len() < self.rules.fallback_threshold {
            tracing::debug!(
                "{}: {} anchor records is below {}, applying container strategy",
                self.name,
                report.records.len(),
                self.rules.fallback_threshold
            );
            report.fallback_applied = true;
            self.container_pass(document, ctx, &mut seen, &mut report);
        }

        report
    }
}

fn compile(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::Validation(format!("invalid selector '{}': {:?}", css, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn push_outcome(
    report: &mut ExtractionReport,
    strategy: Strategy,
    href: &str,
    outcome: Result<CandidateRecord, SkipReason>,
) {
    match outcome {
        Ok(record) => report.records.push(record),
        Err(reason) => report.skip(strategy, Some(href), reason),
    }
}
