use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::models::go::PipelineVariables;

/// Something that can start a run of a named pipeline.
#[async_trait]
pub trait PipelineScheduler: Send + Sync {
    async fn schedule(&self, pipeline: &str, variables: &PipelineVariables) -> Result<()>;

    /// Human-facing page for the pipeline, used as the status target URL.
    fn history_url(&self, pipeline: &str) -> String;
}

/// GoCD pipeline API client authenticated with HTTP basic auth.
#[derive(Debug)]
pub struct GoClient {
    api_url: String,
    history_url: String,
    user: String,
    pass: SecretString,
    http: reqwest::Client,
}

impl GoClient {
    pub fn new(
        api_url: impl AsRef<str>,
        history_url: impl AsRef<str>,
        user: impl AsRef<str>,
        pass: SecretString,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            api_url: api_url.as_ref().to_string(),
            history_url: history_url.as_ref().to_string(),
            user: user.as_ref().to_string(),
            pass,
            http,
        })
    }

    fn schedule_url(&self, pipeline: &str) -> String {
        format!("{}{}/schedule", self.api_url, pipeline)
    }
}

#[async_trait]
impl PipelineScheduler for GoClient {
    async fn schedule(&self, pipeline: &str, variables: &PipelineVariables) -> Result<()> {
        self.http
            .post(self.schedule_url(pipeline))
            .basic_auth(&self.user, Some(self.pass.expose_secret()))
            .form(&variables.form_fields())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn history_url(&self, pipeline: &str) -> String {
        format!("{}{}", self.history_url, pipeline)
    }
}
