//! End-to-end tests: lead CSV on disk → pipeline → exported CSV.

use std::fs;

use tempfile::TempDir;

use lead_tagger::config::PipelineConfig;
use lead_tagger::csv_io::{TAGGED_FILE_NAME, read_leads, write_leads};
use lead_tagger::error::PipelineError;
use lead_tagger::leads::KnownColumns;
use lead_tagger::pipeline::{LeadOutput, LeadPipeline};
use lead_tagger::tagging::{PriorityList, TagMapping, TagPolicy, Tagger};

const LEADS: &str = "\
first_name,last_name,email_1,email_2,email_3,city,wants_pool,wants_garage
Ada,Lovelace,a@x.com,,b@x.com ,London,1,1
Alan,Turing,,,,Wilmslow,,1
Grace,Hopper,  ,grace@x.com,,Arlington,,
";

fn write_input(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("leads.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn mapping() -> TagMapping {
    TagMapping::new()
        .with("wants_pool", ["Pool"])
        .with("wants_garage", ["Garage"])
}

#[test]
fn normalized_export_has_one_row_per_email() {
    let dir = TempDir::new().unwrap();
    let table = read_leads(&write_input(&dir, LEADS)).unwrap();

    let output = LeadPipeline::default().run(&table, None).unwrap();
    let out_path = dir.path().join("normalized.csv");
    let written = write_leads(&out_path, output.columns(), output.records()).unwrap();
    assert_eq!(written, 4);

    let csv = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "email,first_name,last_name,city,wants_pool,wants_garage"
    );
    assert_eq!(lines[1], "a@x.com,Ada,Lovelace,London,1,1");
    assert_eq!(lines[2], "b@x.com,Ada,Lovelace,London,1,1");
    assert_eq!(lines[3], ",Alan,Turing,Wilmslow,,1");
    assert_eq!(lines[4], "grace@x.com,Grace,Hopper,Arlington,,");
}

#[test]
fn tagged_export_with_union_policy() {
    let dir = TempDir::new().unwrap();
    let table = read_leads(&write_input(&dir, LEADS)).unwrap();

    let tagger = Tagger::new(TagPolicy::Union, mapping()).unwrap();
    let output = LeadPipeline::default().run(&table, Some(&tagger)).unwrap();
    let out_path = dir.path().join(TAGGED_FILE_NAME);
    write_leads(&out_path, output.columns(), output.records()).unwrap();

    let csv = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "email,tags,first_name,last_name,city,wants_pool,wants_garage"
    );
    assert_eq!(lines[1], "a@x.com,\"Garage, Pool\",Ada,Lovelace,London,1,1");
    assert_eq!(lines[3], ",Garage,Alan,Turing,Wilmslow,,1");
    assert_eq!(lines[4], "grace@x.com,,Grace,Hopper,Arlington,,");
}

#[test]
fn excluding_emailless_leads() {
    let dir = TempDir::new().unwrap();
    let table = read_leads(&write_input(&dir, LEADS)).unwrap();

    let pipeline = LeadPipeline::new(PipelineConfig {
        drop_emailless: true,
        ..PipelineConfig::default()
    });
    let priority = PriorityList::parse("Garage, Pool").unwrap();
    let tagger = Tagger::new(TagPolicy::Priority(priority), mapping()).unwrap();
    let LeadOutput::Tagged(tagged) = pipeline.run(&table, Some(&tagger)).unwrap() else {
        panic!("expected tagged output");
    };

    let rows: Vec<_> = tagged
        .records
        .iter()
        .map(|r| (r.email().unwrap(), r.tags()))
        .collect();
    assert_eq!(
        rows,
        [("a@x.com", "Garage"), ("b@x.com", "Garage"), ("grace@x.com", "")]
    );
}

#[test]
fn custom_known_columns_change_intent_columns() {
    let dir = TempDir::new().unwrap();
    let table = read_leads(&write_input(&dir, LEADS)).unwrap();

    let pipeline = LeadPipeline::new(PipelineConfig {
        known_columns: KnownColumns::new(["email", "first_name", "last_name", "wants_pool"]),
        ..PipelineConfig::default()
    });
    let prepared = pipeline.prepare(&table).unwrap();
    assert_eq!(prepared.intent_columns, ["city", "wants_garage"]);
}

#[test]
fn missing_first_name_halts_before_output() {
    let dir = TempDir::new().unwrap();
    let input = "last_name,email_1,email_2,email_3\nLovelace,a@x.com,,\n";
    let table = read_leads(&write_input(&dir, input)).unwrap();

    let err = LeadPipeline::default().run(&table, None).unwrap_err();
    let PipelineError::MissingColumns { columns } = &err;
    assert_eq!(columns, &["first_name"]);
    assert!(err.to_string().contains("first_name"));
}

#[test]
fn na_tokens_neither_emit_emails_nor_fire_tags() {
    let dir = TempDir::new().unwrap();
    let input = "\
first_name,last_name,email_1,email_2,email_3,wants_pool
Ada,Lovelace,NULL,N/A,a@x.com,NaN
";
    let table = read_leads(&write_input(&dir, input)).unwrap();

    let tagger = Tagger::new(TagPolicy::Union, TagMapping::new().with("wants_pool", ["Pool"])).unwrap();
    let LeadOutput::Tagged(tagged) = LeadPipeline::default().run(&table, Some(&tagger)).unwrap() else {
        panic!("expected tagged output");
    };

    let rows: Vec<_> = tagged.records.iter().map(|r| (r.email(), r.tags())).collect();
    assert_eq!(rows, [(Some("a@x.com"), "")]);
}

#[test]
fn repeated_headers_keep_both_values_on_export() {
    let dir = TempDir::new().unwrap();
    let input = "\
first_name,last_name,email_1,email_2,email_3,interest,interest
Ada,L,a@x.com,,,first,second
";
    let table = read_leads(&write_input(&dir, input)).unwrap();

    let output = LeadPipeline::default().run(&table, None).unwrap();
    let out_path = dir.path().join("normalized.csv");
    write_leads(&out_path, output.columns(), output.records()).unwrap();

    let csv = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "email,first_name,last_name,interest,interest.1");
    assert_eq!(lines[1], "a@x.com,Ada,L,first,second");
}
