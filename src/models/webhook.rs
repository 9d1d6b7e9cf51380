//! Webhook payload models.

use serde::{Deserialize, Serialize};

use super::{CheckRun, Disposition, GitHubContext, TestCase};

/// Result reported for a single test case. Errors and failures both map to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Successful,
    Skipped,
    Failed,
}

impl From<Disposition> for ResultKind {
    fn from(disposition: Disposition) -> Self {
        match disposition {
            Disposition::Successful => Self::Successful,
            Disposition::Skipped => Self::Skipped,
            Disposition::Error | Disposition::Failure => Self::Failed,
        }
    }
}

/// Per-test-case entry carried in `testResults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultEntry {
    pub name: String,
    pub classname: String,
    pub result: ResultKind,
}

impl From<&TestCase> for TestResultEntry {
    fn from(case: &TestCase) -> Self {
        TestResultEntry {
            name: case.trimmed_name().to_string(),
            classname: case.trimmed_classname().to_string(),
            result: case.disposition().into(),
        }
    }
}

/// One part of a chunked webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub check_run: CheckRun,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub run_number: Option<u64>,
    pub run_id: Option<u64>,
    /// Envelope creation time, epoch milliseconds
    pub created: i64,
    pub part: usize,
    pub last: bool,
    pub test_results: Vec<TestResultEntry>,
}

impl WebhookMessage {
    /// Build the empty envelope (`part: 0`, `last: false`) shared by all parts.
    pub fn envelope(context: &GitHubContext, check_run: &CheckRun, created: i64) -> Self {
        WebhookMessage {
            owner: context.owner.clone(),
            repo: context.repo.clone(),
            sha: context.sha.clone(),
            check_run: check_run.clone(),
            git_ref: context.git_ref.clone(),
            action: context.action.clone(),
            run_number: context.run_number,
            run_id: context.run_id,
            created,
            part: 0,
            last: false,
            test_results: Vec::new(),
        }
    }
}
