//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use venuz_scraper::config::{build_config, Config};
use venuz_scraper::{AffiliateSource, CandidateRecord, RecordDraft};

/// Builds a configuration pointing at a mock listing site and a temp data dir
pub fn test_config(data_dir: &Path, listing_url: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "SCRAPE_DATA_DIR".to_string(),
        data_dir.to_string_lossy().to_string(),
    );
    vars.insert("LISTING_BASE_URL".to_string(), listing_url.to_string());
    vars.insert("RESOLVE_TIMEOUT_SECS".to_string(), "5".to_string());
    vars.insert("PAGE_TIMEOUT_SECS".to_string(), "5".to_string());
    vars.insert("SETTLE_TIMEOUT_MS".to_string(), "10".to_string());
    vars.insert("SCROLL_WAIT_MS".to_string(), "10".to_string());
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    build_config(|key| vars.get(key).cloned()).expect("test config should be valid")
}

/// A valid listing record with the given source URL
pub fn record(source_url: &str) -> CandidateRecord {
    RecordDraft::new("Some Site", source_url, AffiliateSource::Porndude, "general")
        .build()
        .expect("record should be valid")
}
