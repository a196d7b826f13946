//! Row shape of the remote `content` table

use crate::record::CandidateRecord;
use serde::Serialize;

/// One row as the REST endpoint expects it
///
/// Fields that are optional on the record side are given concrete values
/// here so the remote columns never receive nulls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRow {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub source_url: String,
    pub affiliate_url: String,
    pub affiliate_source: String,
    pub category: String,
    pub location: String,
    pub is_verified: bool,
    pub active: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub is_premium: bool,
    pub rating: f64,
    pub likes: u64,
    pub views: u64,
}

impl From<&CandidateRecord> for ContentRow {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
            source_url: record.source_url.clone(),
            affiliate_url: record.affiliate_url.clone(),
            affiliate_source: record.affiliate_source.to_string(),
            category: record.category.clone(),
            location: record.location.clone(),
            is_verified: record.is_verified,
            active: record.active,
            latitude: record.latitude,
            longitude: record.longitude,
            is_premium: record.is_premium,
            rating: record.rating.unwrap_or(0.0),
            likes: record.likes,
            views: record.views,
        }
    }
}
