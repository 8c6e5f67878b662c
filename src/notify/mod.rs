//! Best-effort outcome notifications: a message bus topic and a chat webhook.
//!
//! Nothing here ever fails the caller. Missing sinks are skipped with a
//! warning and delivery errors are logged.

pub mod discord;
pub mod sns;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::NotifyError;

#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, message: &str) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn send(&self, content: &str) -> Result<(), NotifyError>;
}

/// Status object published to the topic when an action fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage<'a> {
    pub status: &'a str,
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> StatusMessage<'a> {
    pub fn error(action: &'a str, error: &'a str) -> Self {
        Self {
            status: "Error",
            action,
            error: Some(error),
        }
    }
}

#[derive(Clone, Default)]
pub struct Notifications {
    topic: Option<Arc<dyn TopicPublisher>>,
    chat: Option<Arc<dyn ChatNotifier>>,
}

impl Notifications {
    pub fn new(
        topic: Option<Arc<dyn TopicPublisher>>,
        chat: Option<Arc<dyn ChatNotifier>>,
    ) -> Self {
        Self { topic, chat }
    }

    pub async fn chat(&self, content: &str) {
        let Some(chat) = &self.chat else {
            tracing::warn!("Chat webhook is not configured; skipping notification");
            return;
        };
        match chat.send(content).await {
            Ok(()) => tracing::info!("Chat notification sent"),
            Err(e) => tracing::error!(error = %e, "Failed to send chat notification"),
        }
    }

    pub async fn publish_status(&self, message: &StatusMessage<'_>) {
        let Some(topic) = &self.topic else {
            tracing::warn!("SNS topic is not configured; skipping status message");
            return;
        };
        let encoded = match serde_json::to_string(message) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "Could not encode status message");
                return;
            }
        };
        if let Err(e) = topic.publish(&encoded).await {
            tracing::error!(error = %e, "Error publishing status message");
        }
    }
}

#[cfg(test)]
pub(crate) mod testutils {
    use super::*;
    use std::sync::Mutex;

    /// Records every delivery. Optionally fails after recording.
    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<String>>,
        pub should_fail: bool,
    }

    impl RecordingSink {
        pub fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        pub fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn record(&self, message: &str) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message.to_string());
            if self.should_fail {
                return Err(NotifyError::Publish("Mock failure".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TopicPublisher for RecordingSink {
        async fn publish(&self, message: &str) -> Result<(), NotifyError> {
            self.record(message)
        }
    }

    #[async_trait]
    impl ChatNotifier for RecordingSink {
        async fn send(&self, content: &str) -> Result<(), NotifyError> {
            self.record(content)
        }
    }
}
