//! Shared types for the lead pipeline.

use crate::leads::record::{LeadRecord, NormalizedRecord, TaggedRecord};

/// Leads after validation, normalization, filtering and reordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedLeads {
    /// Output column order (`email, first_name, last_name, ...`).
    pub columns: Vec<String>,
    /// Columns the user may map to tags, in column order.
    pub intent_columns: Vec<String>,
    pub records: Vec<NormalizedRecord>,
}

/// Leads with a `tags` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedLeads {
    /// Output column order (`email, tags, first_name, last_name, ...`).
    pub columns: Vec<String>,
    pub records: Vec<TaggedRecord>,
}

/// Result of a full pipeline run, ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutput {
    Normalized(PreparedLeads),
    Tagged(TaggedLeads),
}

impl LeadOutput {
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Normalized(p) => &p.columns,
            Self::Tagged(t) => &t.columns,
        }
    }

    /// Records in output order.
    pub fn records(&self) -> Vec<&LeadRecord> {
        match self {
            Self::Normalized(p) => p.records.iter().map(NormalizedRecord::record).collect(),
            Self::Tagged(t) => t.records.iter().map(TaggedRecord::record).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Normalized(p) => p.records.len(),
            Self::Tagged(t) => t.records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normalized(_) => "normalized",
            Self::Tagged(_) => "tagged",
        }
    }
}
