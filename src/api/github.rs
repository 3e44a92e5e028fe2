use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::dispatcher::DispatchOutcome;
use crate::gate::GateDecision;
use crate::models::github::{CommitState, GitHubPullRequestPayload, PullRequestEvent};
use crate::AppState;

use super::internal_error;

const PENDING_DESCRIPTION: &str = "Pull Request submitted for CI testing";

/// POST /GitHubWebhook - start validation for an opened or updated pull request
///
/// The pending status is only set once a pipeline was scheduled; after an
/// exhausted dispatch the `error` status set by the dispatcher stays.
pub async fn github_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), (StatusCode, String)> {
    let payload: GitHubPullRequestPayload = serde_json::from_slice(&body)
        .map_err(|e| internal_error("invalid pull request payload", e))?;
    let event = PullRequestEvent::from(payload);

    if event.mergeable == Some(false) {
        tracing::info!(pr = event.number, "Ignoring unmergeable pull request");
        return Ok((StatusCode::OK, "PR is not mergeable.".to_string()));
    }

    if !event.action.triggers_pipeline() {
        tracing::info!(pr = event.number, action = %event.action, "Ignoring pull request action");
        return Ok((
            StatusCode::OK,
            format!("PR action \"{}\" does not trigger pipelines.", event.action),
        ));
    }

    match state
        .gate
        .check(&event)
        .await
        .map_err(|e| internal_error("failed to reject pull request", format!("{e:#}")))?
    {
        GateDecision::Allowed => {}
        GateDecision::Rejected { status, message } => return Ok((status, message)),
    }

    match state.dispatcher.start(&event).await {
        DispatchOutcome::Started { pipeline_url } => {
            state
                .reporter
                .set_status(
                    &event.statuses_url,
                    CommitState::Pending,
                    &pipeline_url,
                    PENDING_DESCRIPTION,
                )
                .await
                .map_err(|e| internal_error("failed to set pending status", format!("{e:#}")))?;
            Ok((StatusCode::OK, PENDING_DESCRIPTION.to_string()))
        }
        DispatchOutcome::Exhausted { pipeline_url } => {
            tracing::warn!(
                pr = event.number,
                %pipeline_url,
                "Pipeline could not be started, leaving error status in place"
            );
            Ok((
                StatusCode::OK,
                "Pull Request testing could not be started.".to_string(),
            ))
        }
    }
}
