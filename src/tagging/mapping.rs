//! Tag mapping (intent column → tags) and priority order.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::TagError;

/// Split user tag input on commas, trimming and dropping empty entries.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Intent column → tags to attach when that column is present.
///
/// Backed by a `BTreeMap`, so iteration order never depends on how the
/// mapping was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    columns: BTreeMap<String, Vec<String>>,
}

impl TagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `column` to `tags`. Tags are trimmed and empties dropped; a
    /// column left with no tags is not mapped at all.
    pub fn insert<I, S>(&mut self, column: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let column = column.into();
        if tags.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, tags);
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<I, S>(mut self, column: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(column, tags);
        self
    }

    /// Parse a `column=Tag A, Tag B` entry as given on the command line.
    pub fn insert_entry(&mut self, entry: &str) -> Result<(), TagError> {
        let (column, tags) = entry.split_once('=').ok_or_else(|| TagError::InvalidMapping {
            entry: entry.to_string(),
            reason: "expected column=Tag[, Tag...]".into(),
        })?;
        let column = column.trim();
        if column.is_empty() {
            return Err(TagError::InvalidMapping {
                entry: entry.to_string(),
                reason: "column name is empty".into(),
            });
        }
        self.insert(column, parse_tags(tags));
        Ok(())
    }

    /// Load a JSON object of the form `{"column": ["Tag", ...]}`.
    pub fn from_json_file(path: &Path) -> Result<Self, TagError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, TagError> {
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)?;
        let mut mapping = Self::new();
        for (column, tags) in parsed {
            mapping.insert(column, tags);
        }
        Ok(mapping)
    }

    /// Mapped columns with their tags, ordered by column name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns.iter().map(|(c, t)| (c.as_str(), t.as_slice()))
    }

    /// Every distinct tag referenced by the mapping.
    pub fn tags(&self) -> HashSet<&str> {
        self.columns
            .values()
            .flat_map(|tags| tags.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Ranking of tags; the first entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityList {
    order: Vec<String>,
}

impl PriorityList {
    /// Build a priority list. Entries are trimmed, empties dropped, and a
    /// repeated tag is rejected.
    pub fn new<I, S>(tags: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }
            if !seen.insert(tag.to_string()) {
                return Err(TagError::DuplicatePriority {
                    tag: tag.to_string(),
                });
            }
            order.push(tag.to_string());
        }
        Ok(Self { order })
    }

    /// Parse a comma-separated priority order, highest first.
    pub fn parse(input: &str) -> Result<Self, TagError> {
        Self::new(parse_tags(input))
    }

    /// Position of `tag`, 0 being the highest priority.
    pub fn rank(&self, tag: &str) -> Option<usize> {
        self.order.iter().position(|t| t == tag)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
