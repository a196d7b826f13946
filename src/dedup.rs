//! Deduplication by natural key
//!
//! Extraction passes and pages can report the same destination more than
//! once. These helpers keep the first record seen for each `source_url`
//! and preserve the order in which keys first appeared.

use crate::record::CandidateRecord;
use std::collections::HashSet;

/// Collapses a single list to one record per distinct `source_url`
///
/// # Examples
///
/// ```
/// use venuz_scraper::{dedup, AffiliateSource, RecordDraft};
///
/// let a = RecordDraft::new("Alpha", "/go/alpha", AffiliateSource::Porndude, "webcam").build().unwrap();
/// let b = RecordDraft::new("Beta", "/out/beta", AffiliateSource::Porndude, "webcam").build().unwrap();
///
/// let unique = dedup(vec![a.clone(), a, b]);
/// assert_eq!(unique.len(), 2);
/// ```
pub fn dedup(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    dedup_lists([records])
}

/// Collapses any number of lists into one, first-seen order across all lists
pub fn dedup_lists<I>(lists: I) -> Vec<CandidateRecord>
where
    I: IntoIterator<Item = Vec<CandidateRecord>>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for record in lists.into_iter().flatten() {
        if seen.insert(record.source_url.clone()) {
            unique.push(record);
        }
    }

    unique
}
