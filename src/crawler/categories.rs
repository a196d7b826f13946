//! The fixed category sequence a run walks through

use crate::crawler::fetcher::WaitCondition;
use crate::extract::{ExtractionRules, Extractor, ListingExtractor, SyntheticExtractor};
use crate::record::AffiliateSource;
use crate::ConfigError;
use url::Url;

/// Path of the listing's tube-site ranking page
const TUBES_PATH: &str = "/best-porn-sites";

/// One unit of work in a run
pub struct CategorySpec {
    /// Checkpoint key and output file suffix
    pub name: String,

    /// Category label stamped on records
    pub label: String,

    pub subcategory: Option<String>,

    /// Page to navigate to; `None` for sources that need no page
    pub url: Option<Url>,

    /// When set, follow the first link whose text contains all of these
    /// terms before extracting
    pub section_link_terms: Option<Vec<String>>,

    /// Condition marking the page as ready for extraction
    pub ready: Option<WaitCondition>,

    pub extractor: Box<dyn Extractor>,
}

impl std::fmt::Debug for CategorySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategorySpec")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("subcategory", &self.subcategory)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("extractor", &self.extractor.name())
            .finish()
    }
}

/// Builds the category sequence for a listing site
///
/// # Arguments
///
/// * `listing_base` - Home page of the listing site
/// * `rules` - Extraction rules shared by every listing category
///
/// # Returns
///
/// `webcams`, `general`, `tubes` and `camsoda`, in that order
pub fn default_categories(
    listing_base: &Url,
    rules: &ExtractionRules,
) -> Result<Vec<CategorySpec>, ConfigError> {
    let listing = |name: &str| {
        ListingExtractor::new(name, AffiliateSource::Porndude, rules.clone())
            .map(|e| Box::new(e) as Box<dyn Extractor>)
    };
    let ready = Some(WaitCondition::Selector("a[href]".to_string()));

    let tubes_url = listing_base
        .join(TUBES_PATH)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}{}: {}", listing_base, TUBES_PATH, e)))?;

    Ok(vec![
        CategorySpec {
            name: "webcams".to_string(),
            label: "webcam".to_string(),
            subcategory: Some("live".to_string()),
            url: Some(listing_base.clone()),
            section_link_terms: Some(vec!["Live".to_string(), "Cam".to_string()]),
            ready: ready.clone(),
            extractor: listing("webcams")?,
        },
        CategorySpec {
            name: "general".to_string(),
            label: "general".to_string(),
            subcategory: None,
            url: Some(listing_base.clone()),
            section_link_terms: None,
            ready: ready.clone(),
            extractor: listing("general")?,
        },
        CategorySpec {
            name: "tubes".to_string(),
            label: "tubes".to_string(),
            subcategory: None,
            url: Some(tubes_url),
            section_link_terms: None,
            ready,
            extractor: listing("tubes")?,
        },
        CategorySpec {
            name: "camsoda".to_string(),
            label: "webcam".to_string(),
            subcategory: None,
            url: None,
            section_link_terms: None,
            ready: None,
            extractor: Box::new(SyntheticExtractor::default()),
        },
    ])
}
