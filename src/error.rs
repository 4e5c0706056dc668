//! Error types for the lead tagger.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Tagging error: {0}")]
    Tag(#[from] TagError),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Mailchimp error: {0}")]
    Mailchimp(#[from] MailchimpError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Pipeline-halting errors.
///
/// Per-record problems never end up here; they degrade to "no value".
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Input is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

/// Tag mapping / priority configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("Tags missing from the priority order: {}", .tags.join(", "))]
    UnrankedTags { tags: Vec<String> },

    #[error("Tag {tag:?} appears more than once in the priority order")]
    DuplicatePriority { tag: String },

    #[error("Invalid tag mapping entry {entry:?}: {reason}")]
    InvalidMapping { entry: String, reason: String },

    #[error("Failed to read tag mapping: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse tag mapping: {0}")]
    Json(#[from] serde_json::Error),
}

/// CSV load/export errors.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV headers: {0}")]
    Headers(String),

    #[error("Failed to parse CSV row {row}: {reason}")]
    Parse { row: usize, reason: String },

    #[error("Failed to write CSV: {0}")]
    Write(String),
}

/// Mailchimp API errors.
#[derive(Debug, thiserror::Error)]
pub enum MailchimpError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Mailchimp rejected the request ({status}): {title} - {detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Result type alias for the lead tagger.
pub type Result<T> = std::result::Result<T, Error>;
