//! Configuration types.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::leads::columns::KnownColumns;

/// Lead pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Columns treated as default (non-intent) columns.
    pub known_columns: KnownColumns,
    /// Keep one record with a null email for leads that have no email.
    pub retain_emailless: bool,
    /// Drop records whose email is null after normalization.
    pub drop_emailless: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            known_columns: KnownColumns::real_intent(),
            retain_emailless: true,
            drop_emailless: false,
        }
    }
}

/// Default request timeout for Mailchimp calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mailchimp Marketing API configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct MailchimpConfig {
    pub api_key: SecretString,
    /// Data-center prefix, e.g. `us7`.
    pub server_prefix: String,
    /// Overrides the URL derived from `server_prefix` when set.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl MailchimpConfig {
    /// Build a config from a key, deriving the server prefix from the key's
    /// `-<dc>` suffix when `server_prefix` is `None`.
    pub fn new(api_key: SecretString, server_prefix: Option<String>) -> Result<Self, ConfigError> {
        let server_prefix = match server_prefix.filter(|p| !p.trim().is_empty()) {
            Some(prefix) => prefix.trim().to_string(),
            None => server_prefix_from_key(api_key.expose_secret()).ok_or_else(|| {
                ConfigError::MissingRequired {
                    key: "MAILCHIMP_SERVER_PREFIX".into(),
                    hint: "Set it (e.g. us7) or use an API key ending in -<dc>.".into(),
                }
            })?,
        };
        Ok(Self {
            api_key,
            server_prefix,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read `MAILCHIMP_API_KEY`, `MAILCHIMP_SERVER_PREFIX`,
    /// `MAILCHIMP_BASE_URL` and `MAILCHIMP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("MAILCHIMP_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("MAILCHIMP_API_KEY".into()))?;

        let mut config = Self::new(
            SecretString::from(api_key),
            std::env::var("MAILCHIMP_SERVER_PREFIX").ok(),
        )?;

        config.base_url = std::env::var("MAILCHIMP_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        if let Ok(raw) = std::env::var("MAILCHIMP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "MAILCHIMP_TIMEOUT_SECS".into(),
                message: format!("{e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// API root, e.g. `https://us7.api.mailchimp.com/3.0`.
    pub fn api_root(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.mailchimp.com/3.0", self.server_prefix),
        }
    }
}

/// `abc123-us7` → `us7`.
fn server_prefix_from_key(key: &str) -> Option<String> {
    let (_, dc) = key.trim().rsplit_once('-')?;
    (!dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric())).then(|| dc.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_defaults_keep_emailless() {
        let config = PipelineConfig::default();
        assert!(config.retain_emailless);
        assert!(!config.drop_emailless);
        assert!(config.known_columns.contains("birth_month_and_year"));
    }

    #[test]
    fn prefix_derived_from_key_suffix() {
        let config = MailchimpConfig::new(SecretString::from("0123abcd-us7"), None).unwrap();
        assert_eq!(config.server_prefix, "us7");
        assert_eq!(config.api_root(), "https://us7.api.mailchimp.com/3.0");
    }

    #[test]
    fn explicit_prefix_wins() {
        let config =
            MailchimpConfig::new(SecretString::from("0123abcd-us7"), Some(" us21 ".into())).unwrap();
        assert_eq!(config.server_prefix, "us21");
    }

    #[test]
    fn key_without_suffix_needs_prefix() {
        let err = MailchimpConfig::new(SecretString::from("0123abcd"), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn base_url_override_trims_slash() {
        let mut config = MailchimpConfig::new(SecretString::from("k-us1"), None).unwrap();
        config.base_url = Some("http://127.0.0.1:9000/3.0/".into());
        assert_eq!(config.api_root(), "http://127.0.0.1:9000/3.0");
    }
}
