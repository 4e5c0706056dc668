//! CSV load and export for lead files.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info, warn};

use crate::error::CsvError;
use crate::leads::record::{LeadRecord, LeadTable};

/// Export file name for normalized leads.
pub const NORMALIZED_FILE_NAME: &str = "real-intent-mailchimp-leads.csv";
/// Export file name for tagged leads.
pub const TAGGED_FILE_NAME: &str = "real-intent-mailchimp-leads-tagged.csv";

/// Cell values read as null, in addition to the empty cell. Matched exactly.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a lead CSV from disk.
pub fn read_leads(path: &Path) -> Result<LeadTable, CsvError> {
    let file = File::open(path)?;
    let table = read_leads_from(file)?;
    info!(
        path = %path.display(),
        rows = table.records.len(),
        columns = table.columns.len(),
        "Loaded leads"
    );
    Ok(table)
}

/// Read a lead CSV from any reader.
///
/// The header row is required. Empty cells and [`NA_VALUES`] become null,
/// and rows shorter than the header are padded with nulls. A repeated header
/// name gets a `.N` suffix (`interest`, `interest.1`, ...).
pub fn read_leads_from<R: Read>(reader: R) -> Result<LeadTable, CsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = dedupe_headers(
        reader
            .headers()
            .map_err(|e| CsvError::Headers(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string()),
    );

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| CsvError::Parse {
            row: index + 1,
            reason: e.to_string(),
        })?;
        if row.len() > columns.len() {
            debug!(row = index + 1, extra = row.len() - columns.len(), "Ignoring extra cells");
        }
        let fields = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = row.get(i).filter(|v| !is_na(v)).map(str::to_string);
                (name.clone(), value)
            })
            .collect();
        records.push(LeadRecord::new(fields));
    }

    Ok(LeadTable::new(columns, records))
}

fn is_na(value: &str) -> bool {
    value.is_empty() || NA_VALUES.contains(&value)
}

fn dedupe_headers(headers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::new();
    for name in headers {
        let mut column = name.clone();
        while seen.contains(&column) {
            let n = suffixes.entry(name.clone()).or_insert(0);
            *n += 1;
            column = format!("{name}.{n}");
        }
        if column != name {
            warn!(header = %name, renamed = %column, "Duplicate header renamed");
        }
        seen.insert(column.clone());
        columns.push(column);
    }
    columns
}

/// Write records to `path` with the given column order.
pub fn write_leads<'a, I>(path: &Path, columns: &[String], records: I) -> Result<usize, CsvError>
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let file = File::create(path)?;
    let written = write_leads_to(file, columns, records)?;
    info!(path = %path.display(), rows = written, "Exported leads");
    Ok(written)
}

/// Write a header row and one row per record. Nulls and columns a record
/// lacks are written as empty cells. Returns the number of data rows.
pub fn write_leads_to<'a, W, I>(writer: W, columns: &[String], records: I) -> Result<usize, CsvError>
where
    W: Write,
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer
        .write_record(columns)
        .map_err(|e| CsvError::Write(e.to_string()))?;

    let mut written = 0;
    for record in records {
        let row = columns.iter().map(|c| record.get(c).unwrap_or_default());
        writer
            .write_record(row)
            .map_err(|e| CsvError::Write(e.to_string()))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
