//! Email normalization: one output record per usable email address.

use tracing::debug;

use crate::leads::record::{EMAIL, LeadRecord, NormalizedRecord};

/// Raw email columns, in the order their emails are emitted.
pub const EMAIL_SLOTS: [&str; 3] = ["email_1", "email_2", "email_3"];

/// Expand every record into zero or more single-email records.
///
/// Output keeps input order, and within one lead the `email_1` record comes
/// before `email_2` and `email_3`.
pub fn normalize(records: &[LeadRecord], retain_emailless: bool) -> Vec<NormalizedRecord> {
    let out: Vec<NormalizedRecord> = records
        .iter()
        .flat_map(|record| normalize_record(record, retain_emailless))
        .collect();
    debug!(
        input = records.len(),
        output = out.len(),
        retain_emailless,
        "Normalized emails"
    );
    out
}

/// Expand a single record.
///
/// A slot counts only if it holds a value that is non-empty after trimming.
/// With no usable slot the lead yields one record with a null `email` when
/// `retain_emailless` is set, and nothing otherwise.
pub fn normalize_record(record: &LeadRecord, retain_emailless: bool) -> Vec<NormalizedRecord> {
    let base = record.without(&EMAIL_SLOTS);
    let emails: Vec<&str> = EMAIL_SLOTS
        .iter()
        .filter_map(|slot| record.get(slot))
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .collect();

    if emails.is_empty() {
        return if retain_emailless {
            vec![NormalizedRecord::new(base.with_field(EMAIL, None))]
        } else {
            Vec::new()
        };
    }

    emails
        .into_iter()
        .map(|email| NormalizedRecord::new(base.clone().with_field(EMAIL, Some(email.to_string()))))
        .collect()
}
