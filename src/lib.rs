//! Lead Tagger: normalize Real Intent lead exports and tag them for Mailchimp.

pub mod config;
pub mod csv_io;
pub mod error;
pub mod leads;
pub mod mailchimp;
pub mod pipeline;
pub mod tagging;
