use std::time::Duration;

use anyhow::{Context, Result, ensure};
use config::{Config as ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

use crate::dispatcher::{DispatchPolicy, PipelinePool};

#[derive(Debug, Deserialize)]
pub struct Config {
    // GoCD server and the credentials used to schedule pipelines
    pub go_user: String,
    pub go_pass: SecretString,
    pub go_server: String,
    /// Comma separated list of pipeline names that can validate a PR.
    #[serde(alias = "go_pipeline")]
    pub go_pipelines: String,
    // GitHub token used for statuses, comments and closing PRs
    pub github_token: SecretString,
    // Slack Incoming Webhook URL; notifications are skipped when unset
    #[serde(alias = "slack_url")]
    pub slack_webhook_url: Option<String>,
    #[serde(default = "default_slack_username")]
    pub slack_username: String,
    // Only PRs against this base branch are accepted when set
    pub authorized_branch: Option<String>,
    #[serde(default = "default_dispatch_max_attempts")]
    pub dispatch_max_attempts: u32,
    #[serde(default = "default_dispatch_retry_interval")]
    pub dispatch_retry_interval_secs: u64,
}

fn default_slack_username() -> String {
    "Chef CI".to_string()
}

fn default_dispatch_max_attempts() -> u32 {
    20
}

fn default_dispatch_retry_interval() -> u64 {
    15
}

impl Config {
    pub fn load() -> Result<Self> {
        #[cfg(debug_assertions)]
        let _ = dotenvy::from_filename(".env.local");

        let config = ConfigBuilder::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default().separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.dispatch_max_attempts >= 1,
            "dispatch_max_attempts must be at least 1"
        );
        self.pipeline_pool()?;
        Ok(())
    }

    pub fn pipeline_pool(&self) -> Result<PipelinePool> {
        PipelinePool::parse(&self.go_pipelines)
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            max_attempts: self.dispatch_max_attempts,
            retry_interval: Duration::from_secs(self.dispatch_retry_interval_secs),
        }
    }

    /// Base of the pipeline scheduling API, `{base}{pipeline}/schedule`.
    pub fn go_api_url(&self) -> String {
        format!("http://{}/go/api/pipelines/", self.go_server)
    }

    /// Base of the pipeline history pages, `{base}{pipeline}`.
    pub fn go_history_url(&self) -> String {
        format!("http://{}/go/tab/pipeline/history/", self.go_server)
    }
}
