use super::CategoryState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-text status labels written into the checkpoint
pub struct RunState;

impl RunState {
    pub const STARTED: &'static str = "started";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const COMPLETED: &'static str = "completed";
}

/// One failure recorded during a run, kept for later inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedError {
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Pipeline step that failed (`fetch`, `resolve`, `sink`, ...)
    pub stage: String,
    pub message: String,
}

/// Run-level progress record
///
/// Loaded at process start, mutated after each category completes and
/// persisted after every mutation. There is only ever one writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Last write time; refreshed on every save
    pub timestamp: DateTime<Utc>,

    /// Free-text status label, see [`RunState`]
    pub state: String,

    /// Category name -> number of records produced for it
    #[serde(default)]
    pub completed_categories: BTreeMap<String, usize>,

    /// Running sum across completed categories
    #[serde(default)]
    pub total_records_scraped: usize,

    #[serde(default)]
    pub next_category: Option<String>,

    #[serde(default)]
    pub next_url: Option<String>,

    #[serde(default)]
    pub errors: Vec<RecordedError>,
}

impl Checkpoint {
    /// Creates a fresh checkpoint pointing at the first known category
    pub fn new(first_category: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            state: RunState::STARTED.to_string(),
            completed_categories: BTreeMap::new(),
            total_records_scraped: 0,
            next_category: first_category.map(str::to_string),
            next_url: None,
            errors: Vec::new(),
        }
    }

    pub fn category_state(&self, category: &str) -> CategoryState {
        if self.completed_categories.contains_key(category) {
            CategoryState::Completed
        } else {
            CategoryState::Pending
        }
    }

    pub fn is_completed(&self, category: &str) -> bool {
        self.category_state(category) == CategoryState::Completed
    }

    /// Moves a category to completed with its record count
    ///
    /// Empty results leave the category pending. Re-marking a completed
    /// category replaces its count and keeps the running total consistent.
    /// Returns whether the category is now completed.
    pub fn mark_completed(&mut self, category: &str, count: usize) -> bool {
        if count == 0 {
            return false;
        }

        if let Some(previous) = self.completed_categories.insert(category.to_string(), count) {
            self.total_records_scraped = self.total_records_scraped.saturating_sub(previous);
        }
        self.total_records_scraped += count;
        self.state = RunState::IN_PROGRESS.to_string();
        true
    }

    /// Points the resumption cursor at the given category
    pub fn set_next(&mut self, category: Option<&str>, url: Option<&str>) {
        self.next_category = category.map(str::to_string);
        self.next_url = url.map(str::to_string);
    }

    /// Appends a failure to the error log
    pub fn record_error(
        &mut self,
        category: Option<&str>,
        stage: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(RecordedError {
            at: Utc::now(),
            category: category.map(str::to_string),
            stage: stage.into(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checkpoint_defaults() {
        let checkpoint = Checkpoint::new(Some("webcams"));

        assert_eq!(checkpoint.state, "started");
        assert_eq!(checkpoint.next_category.as_deref(), Some("webcams"));
        assert_eq!(checkpoint.total_records_scraped, 0);
        assert!(checkpoint.completed_categories.is_empty());
        assert!(checkpoint.errors.is_empty());
    }

    #[test]
    fn test_mark_completed_updates_totals() {
        let mut checkpoint = Checkpoint::new(Some("webcams"));

        assert!(checkpoint.mark_completed("webcams", 12));
        assert!(checkpoint.mark_completed("tubes", 8));

        assert_eq!(checkpoint.total_records_scraped, 20);
        assert_eq!(checkpoint.category_state("webcams"), CategoryState::Completed);
        assert_eq!(checkpoint.state, "in_progress");
    }

    #[test]
    fn test_empty_result_stays_pending() {
        let mut checkpoint = Checkpoint::new(None);

        assert!(!checkpoint.mark_completed("webcams", 0));
        assert_eq!(checkpoint.category_state("webcams"), CategoryState::Pending);
        assert_eq!(checkpoint.total_records_scraped, 0);
    }

    #[test]
    fn test_remark_replaces_count() {
        let mut checkpoint = Checkpoint::new(None);
        checkpoint.mark_completed("webcams", 10);
        checkpoint.mark_completed("webcams", 4);

        assert_eq!(checkpoint.completed_categories["webcams"], 4);
        assert_eq!(checkpoint.total_records_scraped, 4);
    }

    #[test]
    fn test_record_error_keeps_order() {
        let mut checkpoint = Checkpoint::new(None);
        checkpoint.record_error(Some("webcams"), "fetch", "timeout");
        checkpoint.record_error(None, "sink", "batch 2 failed");

        assert_eq!(checkpoint.errors.len(), 2);
        assert_eq!(checkpoint.errors[0].stage, "fetch");
        assert_eq!(checkpoint.errors[1].category, None);
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let checkpoint: Checkpoint =
            serde_json::from_str(r#"{"timestamp":"2024-01-01T00:00:00Z","state":"started"}"#)
                .unwrap();

        assert_eq!(checkpoint.total_records_scraped, 0);
        assert!(checkpoint.next_category.is_none());
    }
}
