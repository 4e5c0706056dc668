//! Intent tagging.
//!
//! A [`TagMapping`] says which tags an intent column contributes when it is
//! present on a lead. A [`TagPolicy`] decides how the fired tags collapse into
//! the lead's `tags` value:
//! - `Union`: all fired tags, sorted and deduplicated, joined by `", "`
//! - `Priority`: the single fired tag ranked highest in a [`PriorityList`]

pub mod mapping;
pub mod policy;

pub use mapping::{PriorityList, TagMapping, parse_tags};
pub use policy::{TagPolicy, Tagger, fired_tags, priority_tag, union_tags};
