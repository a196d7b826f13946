//! Sink module for pushing harvested records to the remote content table
//!
//! This module handles:
//! - Mapping `CandidateRecord` values onto the remote row shape
//! - Batched upserts keyed on `source_url`
//! - Reporting per-batch failures without aborting the run

mod rest;
mod schema;
mod traits;

pub use rest::RestSink;
pub use schema::ContentRow;
pub use traits::{BatchFailure, Sink, SinkError, SinkOutcome, SinkReport, SinkResult};
