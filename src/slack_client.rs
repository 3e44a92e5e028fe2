use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::models::slack::{SlackAttachment, SlackWebhookMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatColor {
    Good,
    Danger,
}

impl ChatColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatColor::Good => "good",
            ChatColor::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub title: String,
    pub author: String,
    pub link: String,
    pub body: String,
    pub color: ChatColor,
}

/// Team chat channel the relay reports to.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: ChatMessage) -> Result<()>;
}

/// Slack Incoming Webhook sender. Without a webhook URL every send is skipped.
#[derive(Clone, Debug)]
pub struct SlackWebhookClient {
    client: Client,
    webhook_url: Option<Url>,
    username: String,
}

impl SlackWebhookClient {
    pub fn new(webhook_url: Option<&str>, username: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build http client")?;
        let webhook_url = webhook_url
            .map(Url::parse)
            .transpose()
            .context("invalid slack webhook url")?;

        Ok(Self {
            client,
            webhook_url,
            username: username.into(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    fn build_message(&self, message: ChatMessage) -> SlackWebhookMessage {
        SlackWebhookMessage {
            username: self.username.clone(),
            attachments: vec![SlackAttachment {
                author_name: message.author,
                fallback: message.title.clone(),
                title: message.title,
                title_link: message.link,
                text: message.body,
                color: message.color.as_str().to_string(),
            }],
        }
    }
}

#[async_trait]
impl Notifier for SlackWebhookClient {
    async fn notify(&self, message: ChatMessage) -> Result<()> {
        let Some(webhook_url) = &self.webhook_url else {
            tracing::debug!(title = %message.title, "Slack disabled, skipping notification");
            return Ok(());
        };

        self.client
            .post(webhook_url.clone())
            .json(&self.build_message(message))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ChatMessage {
        ChatMessage {
            title: "PR#42 by octocat passed validation and is ready for review.".into(),
            author: "octocat".into(),
            link: "https://github.com/o/r/pull/42".into(),
            body: "Add widget".into(),
            color: ChatColor::Good,
        }
    }

    #[test]
    fn builds_attachment_payload() {
        let client = SlackWebhookClient::new(Some("https://hooks.slack.com/services/x"), "Chef CI")
            .unwrap();
        let json = serde_json::to_value(client.build_message(message())).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "username": "Chef CI",
                "attachments": [{
                    "author_name": "octocat",
                    "fallback": "PR#42 by octocat passed validation and is ready for review.",
                    "title": "PR#42 by octocat passed validation and is ready for review.",
                    "title_link": "https://github.com/o/r/pull/42",
                    "text": "Add widget",
                    "color": "good",
                }]
            })
        );
    }

    #[tokio::test]
    async fn disabled_client_is_a_noop() {
        let client = SlackWebhookClient::new(None, "Chef CI").unwrap();

        assert!(!client.is_enabled());
        assert!(client.notify(message()).await.is_ok());
    }

    #[test]
    fn rejects_invalid_webhook_url() {
        assert!(SlackWebhookClient::new(Some("not a url"), "Chef CI").is_err());
    }
}
