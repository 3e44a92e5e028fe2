use std::{sync::Arc, time::Duration};

use anyhow::{Result, bail};
use rand::seq::IndexedRandom;

use crate::github_client::StatusReporter;
use crate::go_client::PipelineScheduler;
use crate::models::github::{CommitState, PullRequestEvent};
use crate::models::go::PipelineVariables;
use crate::slack_client::{ChatColor, ChatMessage, Notifier};

/// Pipelines able to validate a pull request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePool {
    ids: Vec<String>,
}

impl PipelinePool {
    /// Parses a comma separated list, ignoring blank and repeated entries.
    pub fn parse(list: &str) -> Result<Self> {
        let mut ids: Vec<String> = Vec::new();
        for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|known| known == id) {
                ids.push(id.to_string());
            }
        }
        if ids.is_empty() {
            bail!("pipeline list {:?} contains no pipeline names", list);
        }
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub max_attempts: u32,
    pub retry_interval: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            retry_interval: Duration::from_secs(15),
        }
    }
}

/// State of one dispatch sequence: the remaining budget and the candidates
/// still preferred for the next try.
#[derive(Debug, Clone)]
pub struct DispatchAttempt {
    remaining: u32,
    candidates: Vec<String>,
    last_pipeline_url: Option<String>,
}

impl DispatchAttempt {
    pub fn new(pool: &PipelinePool, policy: &DispatchPolicy) -> Self {
        Self {
            remaining: policy.max_attempts.max(1),
            candidates: pool.ids().to_vec(),
            last_pipeline_url: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn last_pipeline_url(&self) -> Option<&str> {
        self.last_pipeline_url.as_deref()
    }

    /// Picks the next pipeline uniformly at random.
    pub fn choose(&self) -> String {
        let mut rng = rand::rng();
        self.candidates
            .choose(&mut rng)
            .cloned()
            .expect("candidate list is never empty")
    }

    fn record_target(&mut self, pipeline_url: String) {
        self.last_pipeline_url = Some(pipeline_url);
    }

    fn target(&self) -> String {
        self.last_pipeline_url().unwrap_or_default().to_string()
    }

    /// Consumes one attempt after `pipeline` failed. Returns whether another
    /// try is allowed. The failed pipeline is dropped from the candidates
    /// unless it is the last one left.
    pub fn record_failure(&mut self, pipeline: &str) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return false;
        }
        if self.candidates.len() > 1
            && let Some(pos) = self.candidates.iter().position(|c| c == pipeline)
        {
            self.candidates.remove(pos);
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Started { pipeline_url: String },
    /// Every attempt failed; chat and commit status were already told.
    Exhausted { pipeline_url: String },
}

impl DispatchOutcome {
    pub fn pipeline_url(&self) -> &str {
        match self {
            DispatchOutcome::Started { pipeline_url } => pipeline_url,
            DispatchOutcome::Exhausted { pipeline_url } => pipeline_url,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, DispatchOutcome::Started { .. })
    }
}

/// Starts a validation pipeline for a pull request, retrying across the pool.
pub struct PipelineDispatcher {
    pool: PipelinePool,
    policy: DispatchPolicy,
    scheduler: Arc<dyn PipelineScheduler>,
    reporter: Arc<dyn StatusReporter>,
    notifier: Arc<dyn Notifier>,
}

impl PipelineDispatcher {
    pub fn new(
        pool: PipelinePool,
        policy: DispatchPolicy,
        scheduler: Arc<dyn PipelineScheduler>,
        reporter: Arc<dyn StatusReporter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pool,
            policy,
            scheduler,
            reporter,
            notifier,
        }
    }

    /// Never fails: exhaustion is reported to chat and as an `error` commit status.
    pub async fn start(&self, event: &PullRequestEvent) -> DispatchOutcome {
        let variables = PipelineVariables {
            pull_number: event.number,
            pull_status_url: event.statuses_url.clone(),
            pull_html_url: event.html_url.clone(),
            pull_comments_url: event.comments_url.clone(),
            pull_url: event.url.clone(),
            pull_title: event.title.clone(),
            pull_author: event.author.clone(),
            pull_repo_url: event.repo_clone_url.clone(),
        };
        let mut attempt = DispatchAttempt::new(&self.pool, &self.policy);

        loop {
            let pipeline = attempt.choose();
            attempt.record_target(self.scheduler.history_url(&pipeline));

            let err = match self.scheduler.schedule(&pipeline, &variables).await {
                Ok(()) => {
                    tracing::info!(pr = event.number, %pipeline, "Scheduled pipeline");
                    return DispatchOutcome::Started {
                        pipeline_url: attempt.target(),
                    };
                }
                Err(err) => err,
            };

            let error = format!("{err:#}");
            if attempt.record_failure(&pipeline) {
                tracing::warn!(
                    pr = event.number,
                    %pipeline,
                    retries_left = attempt.remaining(),
                    %error,
                    "Failed to schedule pipeline, retrying"
                );
                tokio::time::sleep(self.policy.retry_interval).await;
                continue;
            }

            tracing::error!(
                pr = event.number,
                %pipeline,
                %error,
                "Giving up scheduling pipeline"
            );
            let pipeline_url = attempt.target();
            self.report_exhausted(event, &pipeline_url, error).await;
            return DispatchOutcome::Exhausted { pipeline_url };
        }
    }

    async fn report_exhausted(
        &self,
        event: &PullRequestEvent,
        pipeline_url: &str,
        error: String,
    ) {
        let message = ChatMessage {
            title: format!("Pull Request {} Could Not Be Tested", event.number),
            author: event.author.clone(),
            link: event.html_url.clone(),
            body: error,
            color: ChatColor::Danger,
        };
        if let Err(e) = self.notifier.notify(message).await {
            tracing::error!(error = %e, pr = event.number, "Failed to notify chat");
        }

        if let Err(e) = self
            .reporter
            .set_status(
                &event.statuses_url,
                CommitState::Error,
                pipeline_url,
                "Pull Request testing could not be started.",
            )
            .await
        {
            tracing::error!(error = %e, pr = event.number, "Failed to set error status");
        }
    }
}
