//! In-memory stand-ins for the outbound clients, recording every call.

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::github_client::StatusReporter;
use crate::go_client::PipelineScheduler;
use crate::models::github::{CommitState, PullRequestAction, PullRequestEvent};
use crate::models::go::PipelineVariables;
use crate::slack_client::{ChatMessage, Notifier};

pub fn pull_request_event() -> PullRequestEvent {
    PullRequestEvent {
        number: 42,
        author: "octocat".into(),
        statuses_url: "https://api.github.com/repos/o/r/statuses/abc".into(),
        html_url: "https://github.com/o/r/pull/42".into(),
        comments_url: "https://api.github.com/repos/o/r/issues/42/comments".into(),
        url: "https://api.github.com/repos/o/r/pulls/42".into(),
        title: "Add widget".into(),
        repo_clone_url: "https://github.com/o/r.git".into(),
        base_branch: "main".into(),
        mergeable: Some(true),
        action: PullRequestAction::Opened,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterCall {
    Status {
        url: String,
        state: CommitState,
        target_url: String,
        description: String,
    },
    Comment {
        url: String,
        body: String,
    },
    Close {
        url: String,
    },
}

#[derive(Default)]
pub struct FakeReporter {
    calls: Mutex<Vec<ReporterCall>>,
    fail: bool,
}

impl FakeReporter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ReporterCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ReporterCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(anyhow!("github unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl StatusReporter for FakeReporter {
    async fn set_status(
        &self,
        statuses_url: &str,
        state: CommitState,
        target_url: &str,
        description: &str,
    ) -> Result<()> {
        self.record(ReporterCall::Status {
            url: statuses_url.into(),
            state,
            target_url: target_url.into(),
            description: description.into(),
        })
    }

    async fn add_comment(&self, comments_url: &str, body: &str) -> Result<()> {
        self.record(ReporterCall::Comment {
            url: comments_url.into(),
            body: body.into(),
        })
    }

    async fn close_pull_request(&self, pull_url: &str) -> Result<()> {
        self.record(ReporterCall::Close {
            url: pull_url.into(),
        })
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    messages: Mutex<Vec<ChatMessage>>,
    fail: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, message: ChatMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        if self.fail {
            return Err(anyhow!("slack unavailable"));
        }
        Ok(())
    }
}

/// Fails the first `failures` schedule calls, then succeeds.
pub struct FakeScheduler {
    failures: usize,
    calls: Mutex<Vec<(String, PipelineVariables)>>,
}

impl FakeScheduler {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, PipelineVariables)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineScheduler for FakeScheduler {
    async fn schedule(&self, pipeline: &str, variables: &PipelineVariables) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((pipeline.to_string(), variables.clone()));
        if calls.len() <= self.failures {
            return Err(anyhow!("scheduler unavailable"));
        }
        Ok(())
    }

    fn history_url(&self, pipeline: &str) -> String {
        format!("http://go/history/{}", pipeline)
    }
}
