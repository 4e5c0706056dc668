//! Lead processing pipeline.
//!
//! A loaded [`LeadTable`](crate::leads::LeadTable) flows through:
//! 1. `LeadPipeline::prepare()`: column check, email normalization, filter, hoist
//! 2. `LeadPipeline::tag()`: intent tagging with a validated `Tagger`
//! 3. Export (`csv_io`) or submission (`mailchimp::submit_batch`)
//!
//! Only a missing required column stops a run. Everything per-record
//! degrades to "no value".

pub mod processor;
pub mod types;

pub use processor::{LEADING_COLUMNS, LeadPipeline, TAGGED_LEADING_COLUMNS};
pub use types::{LeadOutput, PreparedLeads, TaggedLeads};
