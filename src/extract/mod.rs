//! Candidate extraction from listing pages
//!
//! Listing-site markup is unversioned and drifts often, so extraction uses
//! broad heuristics with a coverage-based fallback instead of one precise
//! selector. Every source, real or simulated, sits behind the [`Extractor`]
//! trait so the coordinator never needs to know which one it is driving.
//!
//! # Components
//!
//! - [`ListingExtractor`]: anchor-pattern and container-pattern strategies
//! - [`SyntheticExtractor`]: deterministic simulated entries
//! - [`ExtractionRules`]: keyword lists and thresholds, overridable from TOML

mod listing;
mod rules;
mod synthetic;

pub use listing::ListingExtractor;
pub use rules::{AnchorRules, ContainerRules, ExtractionRules};
pub use synthetic::SyntheticExtractor;

use crate::record::{CandidateRecord, RecordError};
use scraper::Html;
use std::fmt;
use url::Url;

/// Caller-supplied context for one extraction pass
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Category label stamped on every record
    pub category: String,

    /// Optional subcategory label
    pub subcategory: Option<String>,

    /// URL of the page being read, used to absolutize image sources
    pub base_url: Option<Url>,
}

impl ExtractContext {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
            base_url: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// Which heuristic produced (or rejected) an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Anchor,
    Container,
    Synthetic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Anchor => "anchor",
            Self::Container => "container",
            Self::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

/// Why a candidate element did not become a record
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Derived title was shorter than the minimum length
    TitleTooShort(String),

    /// Container had no hyperlink inside it
    MissingLink,

    /// Record validation rejected the candidate
    Invalid(RecordError),

    /// The per-pass record bound was already reached
    LimitReached,

    /// The href was already taken earlier in the pass
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleTooShort(title) => write!(f, "title too short: {:?}", title),
            Self::MissingLink => write!(f, "no hyperlink in container"),
            Self::Invalid(e) => write!(f, "invalid record: {}", e),
            Self::LimitReached => write!(f, "record limit reached"),
            Self::Duplicate => write!(f, "duplicate href"),
        }
    }
}

/// A candidate that was looked at and rejected
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub strategy: Strategy,
    pub href: Option<String>,
    pub reason: SkipReason,
}

/// Outcome of one extraction pass: accepted records plus every rejection
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub records: Vec<CandidateRecord>,
    pub skipped: Vec<SkippedItem>,

    /// Whether the container-pattern fallback ran
    pub fallback_applied: bool,
}

impl ExtractionReport {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn skip(&mut self, strategy: Strategy, href: Option<&str>, reason: SkipReason) {
        self.skipped.push(SkippedItem {
            strategy,
            href: href.map(str::to_string),
            reason,
        });
    }
}

/// A source of candidate records
pub trait Extractor {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Whether the coordinator must load a page before calling [`Extractor::extract`]
    fn requires_page(&self) -> bool {
        true
    }

    /// Produces a bounded list of candidates from a parsed document
    fn extract(&self, document: &Html, ctx: &ExtractContext) -> ExtractionReport;
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters (not bytes)
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Alpha \n\t Cams  "), "Alpha Cams");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ñññññ", 2), "ññ");
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::TitleTooShort("Go".to_string());
        assert_eq!(reason.to_string(), "title too short: \"Go\"");
        assert_eq!(SkipReason::LimitReached.to_string(), "record limit reached");
    }
}
