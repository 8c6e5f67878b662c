use async_trait::async_trait;
use serde::Serialize;

use super::ChatNotifier;
use crate::error::NotifyError;

pub struct DiscordWebhook {
    url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

#[async_trait]
impl ChatNotifier for DiscordWebhook {
    async fn send(&self, content: &str) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(&WebhookMessage { content })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_content_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/webhooks/1/abc"))
            .and(body_json(serde_json::json!({ "content": "**Action:** get failed." })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let webhook = DiscordWebhook::new(format!("{}/api/webhooks/1/abc", mock_server.uri()));
        webhook.send("**Action:** get failed.").await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let webhook = DiscordWebhook::new(mock_server.uri());
        let err = webhook.send("hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Webhook(_)));
    }
}
