//! Lead pipeline: validates, normalizes and tags a lead table.
//!
//! Flow:
//! 1. Required column check (the only fatal condition)
//! 2. Email normalization (one record per email)
//! 3. Optional emailless filter
//! 4. Column hoist (`email, first_name, last_name` first)
//! 5. Known/intent column partition
//! 6. Tagging (hoists `tags` right after `email`)

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::leads::columns::{hoist, missing_required};
use crate::leads::normalize::{EMAIL_SLOTS, normalize};
use crate::leads::record::{EMAIL, FIRST_NAME, LAST_NAME, LeadTable, TAGS};
use crate::pipeline::types::{LeadOutput, PreparedLeads, TaggedLeads};
use crate::tagging::Tagger;

/// Leading columns of a normalized export.
pub const LEADING_COLUMNS: [&str; 3] = [EMAIL, FIRST_NAME, LAST_NAME];

/// Leading columns of a tagged export.
pub const TAGGED_LEADING_COLUMNS: [&str; 4] = [EMAIL, TAGS, FIRST_NAME, LAST_NAME];

/// Orchestrates the normalization and tagging stages.
///
/// Every stage builds new records; the input table is never modified.
pub struct LeadPipeline {
    config: PipelineConfig,
}

impl LeadPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fail when any required identity column is missing from the header.
    pub fn validate(&self, table: &LeadTable) -> Result<(), PipelineError> {
        let missing = missing_required(&table.columns);
        if missing.is_empty() {
            Ok(())
        } else {
            warn!(missing = ?missing, "Input is missing required columns");
            Err(PipelineError::MissingColumns { columns: missing })
        }
    }

    /// Run every stage up to (not including) tagging.
    pub fn prepare(&self, table: &LeadTable) -> Result<PreparedLeads, PipelineError> {
        self.validate(table)?;

        let mut records = normalize(&table.records, self.config.retain_emailless);
        if self.config.drop_emailless {
            let before = records.len();
            records.retain(|r| r.email().is_some());
            debug!(dropped = before - records.len(), "Dropped emailless records");
        }

        let normalized_columns: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !EMAIL_SLOTS.contains(&c.as_str()) && c.as_str() != EMAIL)
            .cloned()
            .chain(std::iter::once(EMAIL.to_string()))
            .collect();
        let columns = hoist(&normalized_columns, &LEADING_COLUMNS);
        let records = records.iter().map(|r| r.reordered(&LEADING_COLUMNS)).collect::<Vec<_>>();

        let partition = self
            .config
            .known_columns
            .partition(columns.iter().map(String::as_str));

        info!(
            input = table.records.len(),
            output = records.len(),
            intent_columns = partition.intent.len(),
            "Prepared leads"
        );

        Ok(PreparedLeads {
            columns,
            intent_columns: partition.intent,
            records,
        })
    }

    /// Tag prepared leads and hoist `tags` next to `email`.
    pub fn tag(&self, prepared: &PreparedLeads, tagger: &Tagger) -> TaggedLeads {
        for (column, _) in tagger.mapping().iter() {
            if !prepared.intent_columns.iter().any(|c| c == column) {
                warn!(column, "Mapped column is not an intent column of this input");
            }
        }

        let mut columns = prepared.columns.clone();
        if !columns.iter().any(|c| c == TAGS) {
            columns.push(TAGS.to_string());
        }
        let columns = hoist(&columns, &TAGGED_LEADING_COLUMNS);

        let records = tagger
            .apply(&prepared.records)
            .iter()
            .map(|r| r.reordered(&TAGGED_LEADING_COLUMNS))
            .collect();

        TaggedLeads { columns, records }
    }

    /// Prepare, then tag when a tagger is given.
    pub fn run(&self, table: &LeadTable, tagger: Option<&Tagger>) -> Result<LeadOutput, PipelineError> {
        let prepared = self.prepare(table)?;
        let output = match tagger {
            Some(tagger) => LeadOutput::Tagged(self.tag(&prepared, tagger)),
            None => LeadOutput::Normalized(prepared),
        };
        debug!(kind = output.label(), records = output.len(), "Pipeline run complete");
        Ok(output)
    }
}

impl Default for LeadPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
