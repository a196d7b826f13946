use super::{ExtractContext, ExtractionReport, Extractor, SkipReason, Strategy};
use crate::record::{AffiliateSource, RecordDraft};
use scraper::Html;

/// Simulated live-model source
///
/// Stands in for an integration that has no public endpoint. It never reads
/// the document, so the coordinator does not navigate anywhere for it.
#[derive(Debug, Clone)]
pub struct SyntheticExtractor {
    count: usize,
    subcategories: Vec<String>,
}

impl SyntheticExtractor {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            subcategories: ["couple", "female", "trans"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for SyntheticExtractor {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Extractor for SyntheticExtractor {
    fn name(&self) -> &str {
        "camsoda"
    }

    fn requires_page(&self) -> bool {
        false
    }

    fn extract(&self, _document: &Html, ctx: &ExtractContext) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for i in 0..self.count {
            let subcategory = self
                .subcategories
                .get(i % self.subcategories.len().max(1))
                .cloned();
            let source_url = format!("https://www.camsoda.com/model-{}", i);

            let draft = RecordDraft::new(
                format!("CamSoda Model {}", i + 1),
                source_url.clone(),
                AffiliateSource::Camsoda,
                ctx.category.clone(),
            )
            .description(format!(
                "Live show happening now in {} category.",
                subcategory.as_deref().unwrap_or("live")
            ))
            .image_url(Some(format!(
                "https://images.unsplash.com/photo-{}?w=800",
                1_500_000_000_000u64 + i as u64
            )))
            .subcategory(subcategory)
            .verified(true)
            .premium(true)
            .rating(4.8);

            match draft.build() {
                Ok(record) => report.records.push(record),
                Err(e) => report.skip(Strategy::Synthetic, Some(&source_url), SkipReason::Invalid(e)),
            }
        }

        report
    }
}
