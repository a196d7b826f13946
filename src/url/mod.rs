//! URL handling module
//!
//! This module provides href absolutization, domain extraction and
//! listing-domain membership checks used by the extractor, the link
//! resolver and the orchestrator.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{belongs_to_domain, extract_domain, origin_of};
pub use normalize::{absolutize, is_absolute_http};
