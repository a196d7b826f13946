/// Category state definitions for resumable runs
use std::fmt;

/// Progress of a single category across runs
///
/// A category is pending until the coordinator records a non-empty result
/// for it. There is no partial state: a category is fetched in full or not
/// at all during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryState {
    /// Not yet produced any records; will be fetched on the next run
    Pending,

    /// Produced records in an earlier pass; skipped from now on
    Completed,
}

impl CategoryState {
    /// Returns true if the category should be fetched
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CategoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
