//! Check run creation through the GitHub REST API.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GitHubSettings;
use crate::error::{AppError, AppResult};
use crate::models::{CheckRun, Conclusion, GitHubContext};
use crate::services::filter::TestFilter;
use crate::services::formatter;
use crate::services::matrix;
use crate::services::report::TestReport;

/// Maximum summary size accepted by the checks API, in bytes.
pub const SUMMARY_LIMIT: usize = 65000;

/// Prefix of every check run name.
pub const CHECK_NAME_PREFIX: &str = "JUnit Report";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cut `text` to at most `limit` bytes without splitting a character.
pub fn truncate_utf8(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// `success` only when there are tests and all of them succeeded.
pub fn conclusion(report: &dyn TestReport) -> Conclusion {
    if report.has_tests() && report.is_successful() {
        Conclusion::Success
    } else {
        Conclusion::Failure
    }
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    title: &'a str,
    summary: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateCheckRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    head_sha: Option<&'a str>,
    status: &'static str,
    conclusion: Conclusion,
    output: CheckOutput<'a>,
}

#[derive(Debug, Deserialize)]
struct CheckSuiteRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct CreateCheckResponse {
    id: u64,
    node_id: String,
    #[serde(default)]
    check_suite: Option<CheckSuiteRef>,
}

/// Client creating completed check runs for a report.
pub struct CheckClient {
    http_client: reqwest::Client,
    api_url: String,
    token: SecretString,
    matrix: Option<String>,
    context: GitHubContext,
}

impl CheckClient {
    pub fn new(settings: &GitHubSettings, context: GitHubContext) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            matrix: settings.matrix.clone(),
            context,
        })
    }

    /// Display name of the check run for this job.
    pub fn check_name(&self) -> String {
        matrix::check_name(
            CHECK_NAME_PREFIX,
            self.context.job.as_deref(),
            self.matrix.as_deref(),
        )
    }

    /// Render the report and publish it as a completed check run.
    pub async fn create(&self, report: &dyn TestReport, filter: TestFilter) -> AppResult<CheckRun> {
        let markdown = formatter::render(report, filter);
        let summary = truncate_utf8(&markdown, SUMMARY_LIMIT);
        let name = self.check_name();
        let conclusion = conclusion(report);

        let request = CreateCheckRequest {
            name: &name,
            head_sha: self.context.head_sha(),
            status: "completed",
            conclusion,
            output: CheckOutput {
                title: &name,
                summary,
            },
        };

        debug!("{}", serde_json::to_string_pretty(&request)?);

        let url = format!(
            "{}/repos/{}/{}/check-runs",
            self.api_url, self.context.owner, self.context.repo
        );
        let response: CreateCheckResponse = self
            .http_client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(
            "Created check run {} ({}) with conclusion {}",
            response.id, name, conclusion
        );

        Ok(CheckRun {
            id: response.id,
            node_id: response.node_id,
            check_suite_id: response.check_suite.map(|suite| suite.id),
            conclusion,
        })
    }
}
