use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use lead_tagger::config::{MailchimpConfig, PipelineConfig};
use lead_tagger::csv_io::{self, NORMALIZED_FILE_NAME, TAGGED_FILE_NAME};
use lead_tagger::error::Result;
use lead_tagger::leads::LeadTable;
use lead_tagger::mailchimp::{MailchimpClient, MemberStatus, submit_batch};
use lead_tagger::pipeline::{LeadOutput, LeadPipeline};
use lead_tagger::tagging::{PriorityList, TagMapping, TagPolicy, Tagger};

#[derive(Parser)]
#[command(name = "lead-tagger", version, about = "Normalize and tag lead exports for Mailchimp")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show default and intent columns of an input file.
    Columns(InputArgs),
    /// Write a normalized CSV (one row per email).
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value = NORMALIZED_FILE_NAME)]
        output: PathBuf,
    },
    /// Write a tagged CSV.
    Tag {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        tagging: TaggingArgs,
        #[arg(short, long, default_value = TAGGED_FILE_NAME)]
        output: PathBuf,
    },
    /// Verify Mailchimp credentials.
    Ping,
    /// List Mailchimp audiences.
    Lists,
    /// Tag leads and add them to a Mailchimp audience.
    Submit {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        tagging: TaggingArgs,
        /// Target audience id (see `lists`).
        #[arg(long)]
        list_id: String,
        #[arg(long, default_value = "subscribed")]
        status: MemberStatus,
        /// Also write the tagged CSV here before submitting.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Lead CSV export.
    input: PathBuf,
    /// Leave out leads that have no email address.
    #[arg(long)]
    exclude_emailless: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// All fired tags, comma-joined.
    Union,
    /// Single highest-priority tag.
    Priority,
}

#[derive(Args)]
struct TaggingArgs {
    /// `column=Tag A, Tag B`; repeatable.
    #[arg(short, long = "map", value_name = "COLUMN=TAGS")]
    mappings: Vec<String>,
    /// JSON object of column → tag list.
    #[arg(long)]
    mapping_file: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "union")]
    policy: PolicyArg,
    /// Comma-separated tag order, highest first (priority policy only).
    #[arg(long)]
    priority: Option<String>,
}

impl InputArgs {
    fn pipeline(&self) -> LeadPipeline {
        LeadPipeline::new(PipelineConfig {
            drop_emailless: self.exclude_emailless,
            ..PipelineConfig::default()
        })
    }

    fn load(&self) -> anyhow::Result<LeadTable> {
        csv_io::read_leads(&self.input)
            .with_context(|| format!("Failed to load {}", self.input.display()))
    }
}

impl TaggingArgs {
    fn tagger(&self) -> anyhow::Result<Tagger> {
        let mut mapping = match &self.mapping_file {
            Some(path) => TagMapping::from_json_file(path)
                .with_context(|| format!("Failed to load mapping {}", path.display()))?,
            None => TagMapping::new(),
        };
        for entry in &self.mappings {
            mapping.insert_entry(entry)?;
        }
        if mapping.is_empty() {
            eprintln!("Warning: no intent columns mapped; every lead gets an empty tag.");
        }

        let policy = match self.policy {
            PolicyArg::Union => TagPolicy::Union,
            PolicyArg::Priority => {
                let Some(order) = &self.priority else {
                    bail!("--priority is required with --policy priority");
                };
                TagPolicy::Priority(PriorityList::parse(order)?)
            }
        };
        eprintln!("{}: {}", policy.name(), policy.description());
        Ok(Tagger::new(policy, mapping)?)
    }
}

fn mailchimp_client() -> Result<MailchimpClient> {
    let config = MailchimpConfig::from_env()?;
    Ok(MailchimpClient::new(&config)?)
}

fn export(path: &Path, output: &LeadOutput) -> Result<()> {
    let written = csv_io::write_leads(path, output.columns(), output.records())?;
    eprintln!("Wrote {} rows to {}", written, path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Columns(input) => {
            let prepared = input.pipeline().prepare(&input.load()?)?;
            println!("Intent columns ({}):", prepared.intent_columns.len());
            for column in &prepared.intent_columns {
                println!("  {column}");
            }
            let known: Vec<_> = prepared
                .columns
                .iter()
                .filter(|c| !prepared.intent_columns.contains(*c))
                .map(String::as_str)
                .collect();
            println!("Default columns ({}): {}", known.len(), known.join(", "));
        }
        Command::Export { input, output } => {
            let result = input.pipeline().run(&input.load()?, None)?;
            export(&output, &result)?;
        }
        Command::Tag {
            input,
            tagging,
            output,
        } => {
            let tagger = tagging.tagger()?;
            let result = input.pipeline().run(&input.load()?, Some(&tagger))?;
            export(&output, &result)?;
        }
        Command::Ping => {
            let health = mailchimp_client()?.ping().await?;
            println!("Mailchimp credentials verified: {health}");
        }
        Command::Lists => {
            let lists = mailchimp_client()?.lists().await?;
            if lists.is_empty() {
                bail!("No lists found in your Mailchimp account.");
            }
            for list in lists {
                println!("{}\t{}", list.id, list.name);
            }
        }
        Command::Submit {
            input,
            tagging,
            list_id,
            status,
            output,
        } => {
            let client = mailchimp_client()?;
            let tagger = tagging.tagger()?;
            let pipeline = input.pipeline();
            let prepared = pipeline.prepare(&input.load()?)?;
            let tagged = pipeline.tag(&prepared, &tagger);

            if let Some(path) = &output {
                export(path, &LeadOutput::Tagged(tagged.clone()))?;
            }

            let report = submit_batch(&client, &list_id, &tagged.records, status).await;
            println!(
                "Submitted {} of {} leads to list {} ({} without email skipped)",
                report.submitted,
                report.attempted(),
                report.list_id,
                report.skipped
            );
            if !report.is_clean() {
                println!("{} failed:", report.failures.len());
                for failure in &report.failures {
                    println!("  {}: {}", failure.identifier, failure.message);
                }
            }
        }
    }

    Ok(())
}
