use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::models::github::{
    CommitState, CreateCommentRequest, CreateStatusRequest, UpdatePullRequestState,
};

/// Outbound calls the relay makes against a pull request.
///
/// URLs come straight from the webhook payloads and are used as-is.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn set_status(
        &self,
        statuses_url: &str,
        state: CommitState,
        target_url: &str,
        description: &str,
    ) -> Result<()>;

    async fn add_comment(&self, comments_url: &str, body: &str) -> Result<()>;

    async fn close_pull_request(&self, pull_url: &str) -> Result<()>;
}

/// Minimal GitHub REST client for commit statuses and PR comments
#[derive(Debug)]
pub struct GitHubClient {
    token: SecretString,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(token: SecretString) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ci-relay"));

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;
        Ok(Self { token, http })
    }

    async fn post_unit(&self, url: &str, body: impl Serialize) -> Result<()> {
        self.http
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl StatusReporter for GitHubClient {
    async fn set_status(
        &self,
        statuses_url: &str,
        state: CommitState,
        target_url: &str,
        description: &str,
    ) -> Result<()> {
        tracing::debug!(url = statuses_url, ?state, "Setting commit status");
        self.post_unit(
            statuses_url,
            CreateStatusRequest {
                state,
                target_url,
                description,
            },
        )
        .await
        .context("failed to set commit status")
    }

    async fn add_comment(&self, comments_url: &str, body: &str) -> Result<()> {
        self.post_unit(comments_url, CreateCommentRequest { body })
            .await
            .context("failed to add pull request comment")
    }

    async fn close_pull_request(&self, pull_url: &str) -> Result<()> {
        self.post_unit(pull_url, UpdatePullRequestState { state: "closed" })
            .await
            .context("failed to close pull request")
    }
}
