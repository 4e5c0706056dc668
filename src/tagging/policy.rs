//! Tagging policies and the validated tagger that applies them.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::TagError;
use crate::leads::record::{NormalizedRecord, TaggedRecord};
use crate::tagging::mapping::{PriorityList, TagMapping};

/// How the fired tags of a lead are turned into its tag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPolicy {
    /// Every fired tag, deduplicated, sorted, joined with `", "`.
    Union,
    /// Only the fired tag ranked highest in the priority order.
    Priority(PriorityList),
}

impl TagPolicy {
    /// Display name shown to the user when picking a policy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Union => "Standard Tagger",
            Self::Priority(_) => "Priority Tagger",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Union => {
                "Tags leads based on the intent columns provided, adding multiple tags if multiple intents are detected."
            }
            Self::Priority(_) => {
                "Tags leads with a single tag; when multiple intents are detected, the tag ranked highest in the priority order wins."
            }
        }
    }
}

/// Union of the tags of every mapped column present in `record`.
pub fn fired_tags<'m>(record: &NormalizedRecord, mapping: &'m TagMapping) -> BTreeSet<&'m str> {
    mapping
        .iter()
        .filter(|(column, _)| record.record().is_present(column))
        .flat_map(|(_, tags)| tags.iter().map(String::as_str))
        .collect()
}

/// Union tagging: sorted, deduplicated tags joined by `", "`.
pub fn union_tags(record: &NormalizedRecord, mapping: &TagMapping) -> String {
    fired_tags(record, mapping)
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Priority tagging: the fired tag ranked first in `priority`.
///
/// Tags without a rank sort after every ranked tag (ties broken
/// lexicographically). [`Tagger::new`] rejects such mappings, so through a
/// `Tagger` this never matters.
pub fn priority_tag(record: &NormalizedRecord, mapping: &TagMapping, priority: &PriorityList) -> String {
    fired_tags(record, mapping)
        .into_iter()
        .min_by_key(|tag| (priority.rank(tag).unwrap_or(usize::MAX), *tag))
        .map(str::to_string)
        .unwrap_or_default()
}

/// A tag policy bound to a mapping that has been checked against it.
#[derive(Debug, Clone)]
pub struct Tagger {
    policy: TagPolicy,
    mapping: TagMapping,
}

impl Tagger {
    /// Bind `policy` to `mapping`.
    ///
    /// For the priority policy every tag in the mapping must be ranked;
    /// otherwise all unranked tags are reported and nothing is tagged.
    pub fn new(policy: TagPolicy, mapping: TagMapping) -> Result<Self, TagError> {
        if let TagPolicy::Priority(priority) = &policy {
            let mut unranked: Vec<String> = mapping
                .tags()
                .into_iter()
                .filter(|tag| priority.rank(tag).is_none())
                .map(str::to_string)
                .collect();
            if !unranked.is_empty() {
                unranked.sort();
                return Err(TagError::UnrankedTags { tags: unranked });
            }
        }
        debug!(
            policy = policy.name(),
            mapped_columns = mapping.len(),
            "Tagger ready"
        );
        Ok(Self { policy, mapping })
    }

    pub fn policy(&self) -> &TagPolicy {
        &self.policy
    }

    pub fn mapping(&self) -> &TagMapping {
        &self.mapping
    }

    /// Tag string for one record; empty when no mapped column is present.
    pub fn tag(&self, record: &NormalizedRecord) -> String {
        match &self.policy {
            TagPolicy::Union => union_tags(record, &self.mapping),
            TagPolicy::Priority(priority) => priority_tag(record, &self.mapping, priority),
        }
    }

    /// Tag every record. Emailless records are tagged like any other.
    pub fn apply(&self, records: &[NormalizedRecord]) -> Vec<TaggedRecord> {
        let tagged: Vec<TaggedRecord> = records
            .iter()
            .map(|r| TaggedRecord::new(r, self.tag(r)))
            .collect();
        let with_tags = tagged.iter().filter(|r| !r.tags().is_empty()).count();
        info!(
            policy = self.policy.name(),
            records = tagged.len(),
            with_tags,
            "Applied tags"
        );
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::normalize::normalize_record;
    use crate::leads::record::LeadRecord;

    fn record(pool: Option<&str>, garage: Option<&str>) -> NormalizedRecord {
        let lead = LeadRecord::from_pairs([
            ("first_name", Some("Ada")),
            ("email_1", Some("a@x.com")),
            ("wants_pool", pool),
            ("wants_garage", garage),
        ]);
        normalize_record(&lead, false).remove(0)
    }

    fn mapping() -> TagMapping {
        TagMapping::new()
            .with("wants_pool", ["Pool"])
            .with("wants_garage", ["Garage"])
    }

    #[test]
    fn union_sorts_and_joins() {
        let r = record(Some("1"), Some("yes"));
        assert_eq!(union_tags(&r, &mapping()), "Garage, Pool");
    }

    #[test]
    fn union_deduplicates_across_columns() {
        let m = TagMapping::new()
            .with("wants_pool", ["Outdoor", "Pool"])
            .with("wants_garage", ["Outdoor", "Garage"]);
        let r = record(Some("1"), Some("1"));
        assert_eq!(union_tags(&r, &m), "Garage, Outdoor, Pool");
    }

    #[test]
    fn union_is_independent_of_insertion_order() {
        let reversed = TagMapping::new()
            .with("wants_garage", ["Garage"])
            .with("wants_pool", ["Pool"]);
        let r = record(Some("1"), Some("1"));
        assert_eq!(union_tags(&r, &reversed), union_tags(&r, &mapping()));
    }

    #[test]
    fn empty_string_value_still_fires() {
        // Present-but-empty is non-null; only null cells are absent.
        let r = record(Some(""), None);
        assert_eq!(union_tags(&r, &mapping()), "Pool");
    }

    #[test]
    fn priority_picks_highest_ranked() {
        let r = record(Some("1"), Some("1"));
        let p = PriorityList::parse("Pool, Garage").unwrap();
        assert_eq!(priority_tag(&r, &mapping(), &p), "Pool");

        let p = PriorityList::parse("Garage, Pool").unwrap();
        assert_eq!(priority_tag(&r, &mapping(), &p), "Garage");
    }

    #[test]
    fn priority_unranked_tag_loses_to_ranked() {
        let r = record(Some("1"), Some("1"));
        let p = PriorityList::parse("Garage").unwrap();
        assert_eq!(priority_tag(&r, &mapping(), &p), "Garage");
    }

    #[test]
    fn nothing_fired_yields_empty_string() {
        let r = record(None, None);
        let p = PriorityList::parse("Pool, Garage").unwrap();
        assert_eq!(union_tags(&r, &mapping()), "");
        assert_eq!(priority_tag(&r, &mapping(), &p), "");
    }

    #[test]
    fn tagger_rejects_unranked_mapping() {
        let p = PriorityList::parse("Pool").unwrap();
        let m = mapping().with("wants_spa", ["Spa"]);
        let err = Tagger::new(TagPolicy::Priority(p), m).unwrap_err();
        match err {
            TagError::UnrankedTags { tags } => assert_eq!(tags, ["Garage", "Spa"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tagger_apply_adds_tags_column() {
        let p = PriorityList::parse("Pool, Garage").unwrap();
        let tagger = Tagger::new(TagPolicy::Priority(p), mapping()).unwrap();
        let tagged = tagger.apply(&[record(Some("1"), Some("1")), record(None, None)]);
        assert_eq!(tagged[0].tags(), "Pool");
        assert_eq!(tagged[1].tags(), "");
        assert!(tagged[1].record().has_column("tags"));
    }

    #[test]
    fn policy_names_and_descriptions() {
        assert_eq!(TagPolicy::Union.name(), "Standard Tagger");
        assert!(TagPolicy::Union.description().contains("multiple tags"));
        assert_eq!(TagPolicy::Priority(PriorityList::default()).name(), "Priority Tagger");
    }
}
