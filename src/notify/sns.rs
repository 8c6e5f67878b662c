use async_trait::async_trait;

use super::TopicPublisher;
use crate::error::NotifyError;

pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl TopicPublisher for SnsPublisher {
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Publish(e.to_string()))?;

        tracing::info!(message_id = output.message_id().unwrap_or_default(), "SNS message published");
        Ok(())
    }
}
