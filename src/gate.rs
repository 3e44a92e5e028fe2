use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;

use crate::github_client::StatusReporter;
use crate::models::github::PullRequestEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// The PR was commented on and closed; nothing else should happen for it.
    Rejected { status: StatusCode, message: String },
}

/// Restricts pull requests to a single base branch when one is configured.
pub struct BranchGate {
    authorized_branch: Option<String>,
    reporter: Arc<dyn StatusReporter>,
}

impl BranchGate {
    pub fn new(authorized_branch: Option<String>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            authorized_branch,
            reporter,
        }
    }

    pub async fn check(&self, event: &PullRequestEvent) -> Result<GateDecision> {
        let Some(branch) = &self.authorized_branch else {
            return Ok(GateDecision::Allowed);
        };
        if event.base_branch == *branch {
            return Ok(GateDecision::Allowed);
        }

        let message = format!("Pull requests are only allowed on the {} branch.", branch);
        tracing::info!(
            pr = event.number,
            base = %event.base_branch,
            authorized = %branch,
            "Rejecting pull request on unauthorized branch"
        );
        self.reporter
            .add_comment(&event.comments_url, &message)
            .await?;
        self.reporter.close_pull_request(&event.url).await?;

        Ok(GateDecision::Rejected {
            status: StatusCode::UNAUTHORIZED,
            message,
        })
    }
}
