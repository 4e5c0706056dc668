//! Lead record types: one row of a lead export at each pipeline stage.

/// Name of the single email column produced by normalization.
pub const EMAIL: &str = "email";
/// Name of the column holding the computed tags.
pub const TAGS: &str = "tags";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";

/// One input row: an ordered mapping from column name to value.
///
/// `None` is a null cell. Values are kept as the text that was read,
/// no numeric inference is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRecord {
    fields: Vec<(String, Option<String>)>,
}

impl LeadRecord {
    /// Build a record from `(column, value)` pairs in column order.
    pub fn new(fields: Vec<(String, Option<String>)>) -> Self {
        Self { fields }
    }

    /// Convenience constructor for literals; empty strings stay empty strings.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
        }
    }

    /// Value of `name`, or `None` when the column is absent or null.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// True when the column exists and is non-null.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.fields.iter().map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record with the named columns removed.
    pub fn without(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(k, _)| !names.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Set `name` to `value`, replacing in place or appending a new column.
    pub fn with_field(mut self, name: &str, value: Option<String>) -> Self {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
        self
    }

    /// Move `leading` columns to the front (in that order); the remaining
    /// columns keep their relative order. Leading names not in the record
    /// are ignored.
    pub fn reordered(&self, leading: &[&str]) -> Self {
        let mut fields = Vec::with_capacity(self.fields.len());
        for name in leading {
            if let Some(field) = self.fields.iter().find(|(k, _)| k == *name) {
                fields.push(field.clone());
            }
        }
        fields.extend(
            self.fields
                .iter()
                .filter(|(k, _)| !leading.contains(&k.as_str()))
                .cloned(),
        );
        Self { fields }
    }
}

/// A lead with `email_1..3` collapsed into a single `email` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    record: LeadRecord,
}

impl NormalizedRecord {
    /// Wrap a record that already has the email slots removed.
    pub(crate) fn new(record: LeadRecord) -> Self {
        Self { record }
    }

    pub fn email(&self) -> Option<&str> {
        self.record.get(EMAIL)
    }

    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    pub fn into_record(self) -> LeadRecord {
        self.record
    }

    /// Same record with its columns reordered.
    pub fn reordered(&self, leading: &[&str]) -> Self {
        Self {
            record: self.record.reordered(leading),
        }
    }
}

/// A normalized lead carrying a `tags` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    record: LeadRecord,
}

impl TaggedRecord {
    pub(crate) fn new(normalized: &NormalizedRecord, tags: String) -> Self {
        Self {
            record: normalized.record.clone().with_field(TAGS, Some(tags)),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.record.get(EMAIL)
    }

    /// The tag string; empty when no intent column fired.
    pub fn tags(&self) -> &str {
        self.record.get(TAGS).unwrap_or_default()
    }

    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    pub fn into_record(self) -> LeadRecord {
        self.record
    }

    pub fn reordered(&self, leading: &[&str]) -> Self {
        Self {
            record: self.record.reordered(leading),
        }
    }
}

/// Parsed input: the header row plus every record.
///
/// The header is kept separately so column checks also work on a file
/// with no data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadTable {
    pub columns: Vec<String>,
    pub records: Vec<LeadRecord>,
}

impl LeadTable {
    pub fn new(columns: Vec<String>, records: Vec<LeadRecord>) -> Self {
        Self { columns, records }
    }
}
