use serde::Serialize;

/// Incoming Webhook message with legacy attachments.
#[derive(Debug, Clone, Serialize)]
pub struct SlackWebhookMessage {
    pub username: String,
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlackAttachment {
    pub author_name: String,
    pub fallback: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
    pub color: String,
}
