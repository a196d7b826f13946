use super::types::{AffiliateSource, CandidateRecord, RecordError, PLACEHOLDER_IMAGE_URL};
use crate::url::is_absolute_http;
use chrono::Utc;

/// Location used for online-only entries
pub const ONLINE_LOCATION: &str = "Online";

/// Builder for [`CandidateRecord`]
///
/// Optional fields fall back to the placeholder values used for online
/// entries: no geolocation, no likes or views, active.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    title: String,
    source_url: String,
    affiliate_source: AffiliateSource,
    category: String,
    description: Option<String>,
    image_url: Option<String>,
    affiliate_url: Option<String>,
    subcategory: Option<String>,
    location: String,
    is_verified: bool,
    is_premium: bool,
    rating: Option<f64>,
    active: bool,
}

impl RecordDraft {
    pub fn new(
        title: impl Into<String>,
        source_url: impl Into<String>,
        affiliate_source: AffiliateSource,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_url: source_url.into(),
            affiliate_source,
            category: category.into(),
            description: None,
            image_url: None,
            affiliate_url: None,
            subcategory: None,
            location: ONLINE_LOCATION.to_string(),
            is_verified: false,
            is_premium: false,
            rating: None,
            active: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn affiliate_url(mut self, affiliate_url: impl Into<String>) -> Self {
        self.affiliate_url = Some(affiliate_url.into());
        self
    }

    pub fn subcategory(mut self, subcategory: Option<String>) -> Self {
        self.subcategory = subcategory;
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }

    pub fn premium(mut self, is_premium: bool) -> Self {
        self.is_premium = is_premium;
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Validates the draft and stamps the capture time
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] for an empty title, source URL or category,
    /// an image that is not an absolute http(s) URL, or a rating outside 0..=5.
    pub fn build(self) -> Result<CandidateRecord, RecordError> {
        // Titles are stored as given; callers normalize whitespace and length
        let title = self.title;
        if title.trim().is_empty() {
            return Err(RecordError::EmptyTitle);
        }

        let source_url = self.source_url.trim().to_string();
        if source_url.is_empty() {
            return Err(RecordError::EmptySourceUrl);
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(RecordError::EmptyCategory);
        }

        let image_url = match self.image_url.filter(|s| !s.trim().is_empty()) {
            Some(url) if is_absolute_http(&url) => url,
            Some(url) => return Err(RecordError::RelativeImageUrl(url)),
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        };

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(RecordError::RatingOutOfRange(rating));
            }
        }

        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Discover {}", title));

        Ok(CandidateRecord {
            affiliate_url: self.affiliate_url.unwrap_or_else(|| source_url.clone()),
            title,
            description,
            image_url,
            source_url,
            affiliate_source: self.affiliate_source,
            category,
            subcategory: self.subcategory,
            location: self.location,
            latitude: 0.0,
            longitude: 0.0,
            is_verified: self.is_verified,
            is_premium: self.is_premium,
            rating: self.rating,
            likes: 0,
            views: 0,
            active: self.active,
            created_at: Utc::now(),
        })
    }
}
