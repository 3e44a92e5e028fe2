use std::fmt;

use serde::{Deserialize, Serialize};

// GitHub `pull_request` webhook, only the fields the relay consumes
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequestPayload {
    pub action: String,
    pub pull_request: GitHubPullRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    pub user: GitHubUser,
    pub statuses_url: String,
    pub html_url: String,
    pub comments_url: String,
    pub url: String,
    pub title: String,
    pub base: GitHubBase,
    /// `null` while GitHub is still computing mergeability.
    #[serde(default)]
    pub mergeable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubBase {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub repo: GitHubRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub clone_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Synchronize,
    Reopened,
    Other(String),
}

impl From<&str> for PullRequestAction {
    fn from(action: &str) -> Self {
        match action {
            "opened" => Self::Opened,
            "synchronize" => Self::Synchronize,
            "reopened" => Self::Reopened,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => f.write_str("opened"),
            Self::Synchronize => f.write_str("synchronize"),
            Self::Reopened => f.write_str("reopened"),
            Self::Other(action) => f.write_str(action),
        }
    }
}

impl PullRequestAction {
    /// Whether this action should start a validation pipeline.
    pub fn triggers_pipeline(&self) -> bool {
        matches!(self, Self::Opened | Self::Synchronize | Self::Reopened)
    }
}

/// Flattened view of a pull request webhook, handed to the gate and dispatcher.
#[derive(Debug, Clone)]
pub struct PullRequestEvent {
    pub number: u64,
    pub author: String,
    pub statuses_url: String,
    pub html_url: String,
    pub comments_url: String,
    pub url: String,
    pub title: String,
    pub repo_clone_url: String,
    pub base_branch: String,
    pub mergeable: Option<bool>,
    pub action: PullRequestAction,
}

impl From<GitHubPullRequestPayload> for PullRequestEvent {
    fn from(payload: GitHubPullRequestPayload) -> Self {
        let pr = payload.pull_request;
        Self {
            number: pr.number,
            author: pr.user.login,
            statuses_url: pr.statuses_url,
            html_url: pr.html_url,
            comments_url: pr.comments_url,
            url: pr.url,
            title: pr.title,
            repo_clone_url: pr.base.repo.clone_url,
            base_branch: pr.base.ref_name,
            mergeable: pr.mergeable,
            action: PullRequestAction::from(payload.action.as_str()),
        }
    }
}

/// Commit status states accepted by the GitHub statuses API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    Pending,
    Success,
    Failure,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateStatusRequest<'a> {
    pub state: CommitState,
    pub target_url: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePullRequestState {
    pub state: &'static str,
}
