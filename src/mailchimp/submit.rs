//! Batch submission of tagged leads to a list-member sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::MailchimpError;
use crate::leads::record::TaggedRecord;
use crate::mailchimp::client::MailchimpClient;
use crate::mailchimp::payload::{MemberPayload, MemberStatus};

/// Destination for list members. Pure I/O, no pipeline logic.
#[async_trait]
pub trait MemberSink: Send + Sync {
    /// Add one member to `list_id`. An error rejects only this member.
    async fn add_member(&self, list_id: &str, member: &MemberPayload) -> Result<(), MailchimpError>;
}

#[async_trait]
impl MemberSink for MailchimpClient {
    async fn add_member(&self, list_id: &str, member: &MemberPayload) -> Result<(), MailchimpError> {
        MailchimpClient::add_member(self, list_id, member).await
    }
}

/// A member the sink rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    /// Email address of the rejected member.
    pub identifier: String,
    pub message: String,
}

/// Outcome of a batch; failures never stop the batch.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub list_id: String,
    pub submitted: usize,
    /// Records without an email address, never sent.
    pub skipped: usize,
    pub failures: Vec<SubmissionFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SubmissionReport {
    pub fn attempted(&self) -> usize {
        self.submitted + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Submit every record with an email to `list_id`, one at a time.
///
/// Records are independent: a failure is recorded against the member's
/// email address and the batch moves on.
pub async fn submit_batch<S>(
    sink: &S,
    list_id: &str,
    records: &[TaggedRecord],
    status: MemberStatus,
) -> SubmissionReport
where
    S: MemberSink + ?Sized,
{
    let started_at = Utc::now();
    info!(list_id, count = records.len(), %status, "Submitting leads");

    let mut submitted = 0;
    let mut skipped = 0;
    let mut failures = Vec::new();

    for record in records {
        let Some(member) = MemberPayload::from_record(record, status) else {
            skipped += 1;
            continue;
        };
        match sink.add_member(list_id, &member).await {
            Ok(()) => {
                debug!(email = %member.email_address, "Member added");
                submitted += 1;
            }
            Err(e) => {
                warn!(email = %member.email_address, error = %e, "Member rejected");
                failures.push(SubmissionFailure {
                    identifier: member.email_address,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        list_id,
        submitted,
        skipped,
        failed = failures.len(),
        "Submission complete"
    );

    SubmissionReport {
        list_id: list_id.to_string(),
        submitted,
        skipped,
        failures,
        started_at,
        finished_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::leads::normalize::normalize_record;
    use crate::leads::record::LeadRecord;

    /// Sink that rejects one address and records the rest.
    struct RecordingSink {
        reject: &'static str,
        seen: Mutex<Vec<MemberPayload>>,
    }

    #[async_trait]
    impl MemberSink for RecordingSink {
        async fn add_member(&self, _list_id: &str, member: &MemberPayload) -> Result<(), MailchimpError> {
            if member.email_address == self.reject {
                return Err(MailchimpError::Api {
                    status: 400,
                    title: "Invalid Resource".into(),
                    detail: "looks fake".into(),
                });
            }
            self.seen.lock().unwrap().push(member.clone());
            Ok(())
        }
    }

    fn tagged(email: Option<&str>, tags: &str) -> TaggedRecord {
        let lead = LeadRecord::from_pairs([("first_name", Some("Ada")), ("email_1", email)]);
        TaggedRecord::new(&normalize_record(&lead, true).remove(0), tags.to_string())
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let sink = RecordingSink {
            reject: "bad@x.com",
            seen: Mutex::new(Vec::new()),
        };
        let records = vec![
            tagged(Some("a@x.com"), "Pool"),
            tagged(Some("bad@x.com"), ""),
            tagged(None, "Pool"),
            tagged(Some("c@x.com"), "Garage, Pool"),
        ];

        let report = submit_batch(&sink, "list-1", &records, MemberStatus::Subscribed).await;

        assert_eq!(report.submitted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.attempted(), 3);
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].identifier, "bad@x.com");
        assert!(report.failures[0].message.contains("looks fake"));

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen[1].tags, ["Garage", "Pool"]);
    }

    #[tokio::test]
    async fn empty_batch_is_clean() {
        let sink = RecordingSink {
            reject: "",
            seen: Mutex::new(Vec::new()),
        };
        let report = submit_batch(&sink, "list-1", &[], MemberStatus::Pending).await;
        assert_eq!(report.attempted(), 0);
        assert!(report.is_clean());
        assert!(report.finished_at >= report.started_at);
    }
}
