//! Candidate record types
//!
//! A [`CandidateRecord`] is one discovered listing entry. Records are only
//! created through [`RecordDraft::build`], which validates every field and
//! refuses to produce a record with an empty title or a relative image URL.

mod draft;
mod types;

pub use draft::{RecordDraft, ONLINE_LOCATION};
pub use types::{AffiliateSource, CandidateRecord, RecordError, PLACEHOLDER_IMAGE_URL};
