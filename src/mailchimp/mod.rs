//! Mailchimp submission.
//!
//! Tagged leads become list members:
//! 1. `MemberPayload::from_record()`: email, status, merge fields, tags
//! 2. `MemberSink::add_member()`: one request per member
//! 3. `submit_batch()`: collects successes, skips and failures
//!
//! There is no retry; a rejected member shows up in the report.

pub mod client;
pub mod payload;
pub mod submit;

pub use client::{AudienceList, MailchimpClient};
pub use payload::{MemberAddress, MemberPayload, MemberStatus, MergeFields, format_phone, split_tags};
pub use submit::{MemberSink, SubmissionFailure, SubmissionReport, submit_batch};
