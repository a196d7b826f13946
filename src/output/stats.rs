//! End-of-run summary
//!
//! This module collects what a run did per category and prints it in a
//! fixed layout once the run finishes.

use crate::sink::SinkOutcome;
use crate::state::RecordedError;

/// What happened to one category during the run
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,

    /// Records in the category's output after deduplication
    pub records: usize,

    /// Whether the category was skipped because an earlier run completed it
    pub carried_forward: bool,
}

/// Summary returned by a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub categories: Vec<CategorySummary>,

    /// Records in the consolidated, deduplicated output
    pub total_unique: usize,

    /// Records written to the remote sink
    pub sink: SinkOutcome,

    /// Errors recorded in the checkpoint over all runs
    pub errors: Vec<RecordedError>,
}

impl RunSummary {
    /// Categories scraped in this run rather than carried forward
    pub fn scraped_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| !c.carried_forward)
            .count()
    }

    pub fn find(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Categories:");
    for category in &summary.categories {
        let note = if category.carried_forward {
            " (from previous run)"
        } else {
            ""
        };
        println!("  {}: {} records{}", category.name, category.records, note);
    }
    println!();

    println!("Total unique records: {}", summary.total_unique);

    match &summary.sink {
        SinkOutcome::Skipped => println!("Upload: skipped (no credential configured)"),
        SinkOutcome::Written(report) => {
            println!(
                "Upload: {} rows in {} batches ({} failed)",
                report.rows_written,
                report.batches_ok + report.batches_failed,
                report.batches_failed
            );
        }
    }

    if !summary.errors.is_empty() {
        println!();
        println!("Errors ({}):", summary.errors.len());
        for error in &summary.errors {
            println!(
                "  [{}] {}: {}",
                error.category.as_deref().unwrap_or("-"),
                error.stage,
                error.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraped_count_excludes_carried_forward() {
        let summary = RunSummary {
            categories: vec![
                CategorySummary {
                    name: "webcams".to_string(),
                    records: 12,
                    carried_forward: true,
                },
                CategorySummary {
                    name: "general".to_string(),
                    records: 30,
                    carried_forward: false,
                },
            ],
            total_unique: 40,
            sink: SinkOutcome::Skipped,
            errors: vec![],
        };

        assert_eq!(summary.scraped_count(), 1);
        assert_eq!(summary.find("webcams").map(|c| c.records), Some(12));
        assert!(summary.find("tubes").is_none());
    }
}
