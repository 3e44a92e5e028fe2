pub mod api;
pub mod config;
pub mod dispatcher;
pub mod gate;
pub mod github_client;
pub mod go_client;
pub mod models;
pub mod slack_client;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

pub use config::Config;
pub use dispatcher::*;
pub use gate::*;
pub use github_client::*;
pub use go_client::*;
pub use slack_client::*;

/// Components shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<BranchGate>,
    pub dispatcher: Arc<PipelineDispatcher>,
    pub reporter: Arc<dyn StatusReporter>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: &Config,
        scheduler: Arc<dyn PipelineScheduler>,
        reporter: Arc<dyn StatusReporter>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let dispatcher = PipelineDispatcher::new(
            config.pipeline_pool()?,
            config.dispatch_policy(),
            scheduler,
            reporter.clone(),
            notifier.clone(),
        );
        let gate = BranchGate::new(config.authorized_branch.clone(), reporter.clone());

        Ok(Self {
            gate: Arc::new(gate),
            dispatcher: Arc::new(dispatcher),
            reporter,
            notifier,
        })
    }

    /// Wires the real GoCD, GitHub and Slack clients.
    pub fn from_config(config: &Config) -> Result<Self> {
        let scheduler = GoClient::new(
            config.go_api_url(),
            config.go_history_url(),
            &config.go_user,
            SecretString::from(config.go_pass.expose_secret()),
        )?;
        let reporter = GitHubClient::new(SecretString::from(config.github_token.expose_secret()))?;
        let notifier =
            SlackWebhookClient::new(config.slack_webhook_url.as_deref(), &config.slack_username)?;
        if !notifier.is_enabled() {
            tracing::info!("slack_webhook_url not set, chat notifications disabled");
        }
        if config.authorized_branch.is_none() {
            tracing::info!("authorized_branch not set, branch gate disabled");
        }

        Self::new(
            config,
            Arc::new(scheduler),
            Arc::new(reporter),
            Arc::new(notifier),
        )
    }
}
