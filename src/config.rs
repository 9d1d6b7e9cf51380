//! Action configuration loaded from environment variables.
//!
//! Action inputs arrive as `INPUT_*` variables, run metadata as `GITHUB_*`
//! variables. Blank values are treated as unset.

use std::env;
use std::path::Path;

use secrecy::SecretString;
use tracing::debug;

use crate::models::GitHubContext;
use crate::services::filter::TestFilter;
use crate::services::report::has_include_pattern;
use crate::services::webhook::WebhookSettings;

/// Default values.
pub mod defaults {
    pub const GITHUB_API_URL: &str = "https://api.github.com";
}

/// Settings for talking to the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    /// REST API base URL (from GITHUB_API_URL)
    pub api_url: String,
    /// Token used to create check runs
    pub token: SecretString,
    /// Raw build matrix JSON, used in the check run name
    pub matrix: Option<String>,
}

/// Action configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Glob pattern of JUnit report files
    pub reports_path: String,
    /// Which results are listed in the check summary
    pub filter: TestFilter,
    /// Webhook delivery settings
    pub webhook: WebhookSettings,
    /// URL of the remote configuration document
    pub configuration_url: Option<String>,
    /// GitHub API settings
    pub github: GitHubSettings,
    /// Run metadata
    pub context: GitHubContext,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `INPUT_TOKEN`: GitHub token - REQUIRED
    /// - `INPUT_PATH`: Glob patterns of report files, one per line - REQUIRED
    /// - `INPUT_MATRIX`: Build matrix as JSON
    /// - `INPUT_FILTER`: `all`, `failures` or `failures-and-skipped` (default: all)
    /// - `INPUT_WEBHOOK-URL`: Webhook endpoint
    /// - `INPUT_WEBHOOK-MESSAGE-SIZE`: Byte budget per webhook message (default: 0, disabled)
    /// - `INPUT_CONFIGURATION-URL`: Remote configuration document
    /// - `GITHUB_API_URL`: REST API base (default: https://api.github.com)
    /// - `GITHUB_REPOSITORY`, `GITHUB_SHA`, `GITHUB_REF`, `GITHUB_ACTION`, `GITHUB_JOB`,
    ///   `GITHUB_RUN_NUMBER`, `GITHUB_RUN_ID`, `GITHUB_EVENT_PATH`: run metadata
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = var("INPUT_TOKEN")
            .map(SecretString::from)
            .ok_or(ConfigError::MissingEnvVar("INPUT_TOKEN"))?;

        let reports_path = var("INPUT_PATH").ok_or(ConfigError::MissingEnvVar("INPUT_PATH"))?;
        if !has_include_pattern(&reports_path) {
            return Err(ConfigError::InvalidValue("INPUT_PATH"));
        }

        let filter = TestFilter::parse(var("INPUT_FILTER").as_deref());

        // Unparsable sizes disable delivery rather than failing the run
        let max_message_size = var("INPUT_WEBHOOK-MESSAGE-SIZE")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let webhook = WebhookSettings {
            url: var("INPUT_WEBHOOK-URL"),
            max_message_size,
        };

        let github = GitHubSettings {
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| defaults::GITHUB_API_URL.to_string()),
            token,
            matrix: var("INPUT_MATRIX"),
        };

        let context = GitHubContext {
            sha: var("GITHUB_SHA"),
            git_ref: var("GITHUB_REF"),
            action: var("GITHUB_ACTION"),
            job: var("GITHUB_JOB"),
            run_number: var("GITHUB_RUN_NUMBER").and_then(|v| v.trim().parse().ok()),
            run_id: var("GITHUB_RUN_ID").and_then(|v| v.trim().parse().ok()),
            pull_request_head_sha: var("GITHUB_EVENT_PATH")
                .and_then(|path| pull_request_head_sha(Path::new(&path))),
            ..GitHubContext::default().with_repository(&var("GITHUB_REPOSITORY").unwrap_or_default())
        };

        Ok(Config {
            reports_path,
            filter,
            webhook,
            configuration_url: var("INPUT_CONFIGURATION-URL"),
            github,
            context,
        })
    }
}

/// Head SHA of the pull request in a workflow event payload, if any.
fn pull_request_head_sha(event_path: &Path) -> Option<String> {
    let payload = std::fs::read_to_string(event_path)
        .map_err(|e| debug!("Unable to read event payload {}: {}", event_path.display(), e))
        .ok()?;
    let event: serde_json::Value = serde_json::from_str(&payload).ok()?;

    event
        .pointer("/pull_request/head/sha")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),
}
