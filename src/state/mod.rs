//! State module for tracking run progress
//!
//! This module provides the durable checkpoint that lets an interrupted or
//! repeated run skip categories which already produced results.
//!
//! # Components
//!
//! - `Checkpoint`: the run-level progress record persisted as JSON
//! - `CategoryState`: whether a category is still pending or completed
//! - `CheckpointStore`: load/save with safe defaults and atomic writes

mod category_state;
mod checkpoint;
mod store;

// Re-export main types
pub use category_state::CategoryState;
pub use checkpoint::{Checkpoint, RecordedError, RunState};
pub use store::{CheckpointError, CheckpointStore};
