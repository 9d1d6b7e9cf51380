//! GitHub Actions context model for CI/CD metadata.

use serde::{Deserialize, Serialize};

/// GitHub Actions run metadata.
/// All fields are optional to support runs outside of Actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubContext {
    /// Repository owner (from GITHUB_REPOSITORY)
    pub owner: String,

    /// Repository name (from GITHUB_REPOSITORY)
    pub repo: String,

    /// Full commit SHA (from GITHUB_SHA)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// Git ref (from GITHUB_REF)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    /// Action identifier (from GITHUB_ACTION)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Job identifier (from GITHUB_JOB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,

    /// Workflow run number (from GITHUB_RUN_NUMBER)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<u64>,

    /// Workflow run ID (from GITHUB_RUN_ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<u64>,

    /// Head SHA of the pull request that triggered the run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_head_sha: Option<String>,
}

impl GitHubContext {
    /// Split an `owner/repo` string. Missing parts are left empty.
    pub fn with_repository(mut self, repository: &str) -> Self {
        let (owner, repo) = repository.split_once('/').unwrap_or((repository, ""));
        self.owner = owner.to_string();
        self.repo = repo.to_string();
        self
    }

    /// Commit a check run should be attached to: the PR head, else the run SHA.
    pub fn head_sha(&self) -> Option<&str> {
        self.pull_request_head_sha
            .as_deref()
            .or(self.sha.as_deref())
    }
}
