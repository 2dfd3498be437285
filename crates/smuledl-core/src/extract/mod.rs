//! Field extraction from performance pages.
//!
//! Two sources: the share-card meta tags (parsed with `scraper`) and the
//! embedded JSON state (searched with `regex`, since it sits inside inline
//! scripts that are not worth parsing as a whole).

mod fields;
mod meta;

pub use fields::{
    extract_candidates, extract_field, extract_performance_type, Candidate, MediaField,
};
pub use meta::{extract_meta, PageMeta};
