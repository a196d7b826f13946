use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Generic thumbnail used when a listing entry has no usable image
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1557682250-33bd709cbe85?w=800&q=80";

/// Errors raised when a record fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("title is empty")]
    EmptyTitle,

    #[error("source URL is empty")]
    EmptySourceUrl,

    #[error("image URL is not an absolute http(s) URL: {0}")]
    RelativeImageUrl(String),

    #[error("category is empty")]
    EmptyCategory,

    #[error("rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),
}

/// The site a record was harvested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateSource {
    /// The listing directory crawled through its redirector links
    Porndude,
    /// The simulated live-model source
    Camsoda,
}

impl AffiliateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Porndude => "porndude",
            Self::Camsoda => "camsoda",
        }
    }
}

impl fmt::Display for AffiliateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered listing entry
///
/// `source_url` is the natural key: deduplication and the remote upsert
/// both use it, so it is unique within a run's output once deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub source_url: String,
    pub affiliate_url: String,
    pub affiliate_source: AffiliateSource,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_verified: bool,
    pub is_premium: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CandidateRecord {
    /// Replaces the natural key, keeping `affiliate_url` in step when it
    /// still pointed at the old value
    pub fn set_source_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if self.affiliate_url == self.source_url {
            self.affiliate_url = url.clone();
        }
        self.source_url = url;
    }
}
