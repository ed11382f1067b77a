use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;
use thiserror::Error;

use crate::dedup::DedupPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingSecret(&'static str),

    #[error("invalid environment configuration: {0}")]
    Invalid(#[from] envy::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Deserialize)]
struct LogSettings {
    #[serde(default)]
    log_format: LogFormat,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` on its own, so the format still applies when the
    /// rest of the configuration is unusable. Bad values fall back to the
    /// default.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, LogSettings>(vars)
            .map(|settings| settings.log_format)
            .unwrap_or_default()
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub relay_secret: String,
    #[serde(default)]
    pub gh_pat: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_github_repo")]
    pub github_repo: String,
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    #[serde(default = "default_event_type")]
    pub dispatch_event_type: String,
    #[serde(default = "default_user_agent")]
    pub relay_user_agent: String,
    #[serde(default = "default_dispatch_timeout_seconds")]
    pub dispatch_timeout_seconds: u64,

    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,
    #[serde(default)]
    pub dedup_policy: DedupPolicy,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_port() -> u16 {
    4000
}

fn default_github_repo() -> String {
    "OliAjonjoli/redcudi.org-astro".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_event_type() -> String {
    "strapi-content-published".to_string()
}

fn default_user_agent() -> String {
    "redcudi-relay".to_string()
}

fn default_dispatch_timeout_seconds() -> u64 {
    10
}

fn default_dedup_window_ms() -> u64 {
    5000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Config {
    /// Reads the process environment, after merging an optional `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Builds a config from arbitrary `KEY=value` pairs.
    ///
    /// Fails when either secret is absent or empty, so the caller never
    /// reaches the point of binding a listener.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)?;

        if config.gh_pat.is_empty() {
            return Err(ConfigError::MissingSecret("GH_PAT"));
        }
        if config.relay_secret.is_empty() {
            return Err(ConfigError::MissingSecret("RELAY_SECRET"));
        }

        Ok(config)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_seconds)
    }

    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/dispatches",
            self.github_api_url.trim_end_matches('/'),
            self.github_repo
        )
    }
}
