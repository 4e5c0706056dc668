//! Mailchimp list-member payloads built from tagged leads.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::leads::record::TaggedRecord;

/// Subscription status of a list member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
    Transactional,
}

impl MemberStatus {
    pub const ALL: [MemberStatus; 5] = [
        Self::Subscribed,
        Self::Unsubscribed,
        Self::Cleaned,
        Self::Pending,
        Self::Transactional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Cleaned => "cleaned",
            Self::Pending => "pending",
            Self::Transactional => "transactional",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(MemberStatus::as_str).collect();
                format!("unknown member status {s:?} (expected one of: {})", valid.join(", "))
            })
    }
}

/// Mailchimp ADDRESS merge field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberAddress {
    pub addr1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Merge fields sent with every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeFields {
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
    #[serde(rename = "PHONE")]
    pub phone: String,
    #[serde(rename = "BIRTHDAY")]
    pub birthday: String,
    #[serde(rename = "ADDRESS", skip_serializing_if = "Option::is_none")]
    pub address: Option<MemberAddress>,
}

/// Body of `POST /lists/{list_id}/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPayload {
    pub email_address: String,
    pub status: MemberStatus,
    pub merge_fields: MergeFields,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

const DEFAULT_COUNTRY: &str = "US";

impl MemberPayload {
    /// Build the payload for a tagged lead; `None` when it has no email.
    pub fn from_record(record: &TaggedRecord, status: MemberStatus) -> Option<Self> {
        let email = record.email()?.trim();
        if email.is_empty() {
            return None;
        }
        let fields = record.record();
        let text = |name: &str| fields.get(name).map(str::trim).unwrap_or_default().to_string();

        // Mailchimp rejects a partial address, so it is all or nothing.
        let address = MemberAddress {
            addr1: text("address"),
            city: text("city"),
            state: text("state"),
            zip: text("zip_code"),
            country: DEFAULT_COUNTRY.to_string(),
        };
        let complete = [&address.addr1, &address.city, &address.state, &address.zip]
            .iter()
            .all(|part| !part.is_empty());
        let address = complete.then_some(address);

        Some(Self {
            email_address: email.to_string(),
            status,
            merge_fields: MergeFields {
                first_name: text("first_name"),
                last_name: text("last_name"),
                phone: fields.get("phone_1").map(format_phone).unwrap_or_default(),
                birthday: fields
                    .get("birth_month_and_year")
                    .map(format_birthday)
                    .unwrap_or_default(),
                address,
            },
            tags: split_tags(record.tags()),
        })
    }
}

/// `5551234567` → `(555) 123 - 4567`. Anything without exactly ten digits
/// yields an empty string.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return String::new();
    }
    format!("({}) {} - {}", &digits[..3], &digits[3..6], &digits[6..])
}

static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/]?(\d{1,2})(?:[-/](\d{1,2}))?$").unwrap());
static MONTH_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").unwrap());

/// Render a birth month (and year) as Mailchimp's `MM/DD` birthday.
///
/// Accepts `YYYY-MM`, `YYYYMM`, `MM/YYYY` and full `YYYY-MM-DD`. When only
/// the month is known the day is `01`. Unparseable input yields "".
pub fn format_birthday(raw: &str) -> String {
    let raw = raw.trim();
    let parts = if let Some(caps) = YEAR_FIRST.captures(raw) {
        Some((caps.get(1), caps.get(2), caps.get(3)))
    } else {
        MONTH_FIRST
            .captures(raw)
            .map(|caps| (caps.get(2), caps.get(1), None))
    };

    let Some((Some(year), Some(month), day)) = parts else {
        return String::new();
    };
    let parse = |m: regex::Match<'_>| m.as_str().parse::<u32>().ok();
    let (Some(year), Some(month)) = (parse(year), parse(month)) else {
        return String::new();
    };
    let day = day.and_then(parse).unwrap_or(1);

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .map(|date| date.format("%m/%d").to_string())
        .unwrap_or_default()
}

/// Split a tag string on commas, trimming and dropping empty entries.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
