use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::models::github::CommitState;
use crate::models::go::PipelineResultEvent;
use crate::slack_client::{ChatColor, ChatMessage};
use crate::AppState;

use super::internal_error;

/// POST /GoWebhook - relay a finished pipeline run back to the pull request
pub async fn go_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let event: PipelineResultEvent = serde_json::from_slice(&body)
        .map_err(|e| internal_error("invalid pipeline result payload", e))?;
    tracing::info!(pr = event.pull_number, status = ?event.status, "Pipeline finished");

    state
        .reporter
        .set_status(
            &event.pull_status_url,
            event.status,
            &event.go_job_console_url,
            &event.go_description,
        )
        .await
        .map_err(|e| internal_error("failed to set commit status", format!("{e:#}")))?;

    match event.status {
        CommitState::Failure => {
            let comment = format!(
                "Your Pull Request {} has failed automated testing. Please see {} for more information.",
                event.pull_number, event.go_job_console_url
            );
            state
                .reporter
                .add_comment(&event.pull_comments_url, &comment)
                .await
                .map_err(|e| internal_error("failed to comment on pull request", format!("{e:#}")))?;
        }
        CommitState::Success => {
            let message = ChatMessage {
                title: format!(
                    "PR#{} by {} passed validation and is ready for review.",
                    event.pull_number, event.pull_author
                ),
                author: event.pull_author.clone(),
                link: event.pull_html_url.clone(),
                body: event.pull_title.clone(),
                color: ChatColor::Good,
            };
            state
                .notifier
                .notify(message)
                .await
                .map_err(|e| internal_error("failed to notify chat", format!("{e:#}")))?;
        }
        CommitState::Pending | CommitState::Error => {}
    }

    Ok(StatusCode::OK)
}
